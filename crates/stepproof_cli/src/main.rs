use std::io::{self, Read};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;

use stepproof::CalculusKind;

mod request;

use request::{parse_kind, CliResult};

#[derive(Parser)]
#[clap(
    name = "stepproof",
    about = "Validate and apply single proof moves on sealed proof states",
    long_about = "Every command reads a complete proof state, does its work and prints the result as JSON.\n\nStates are sealed: a state that was modified after it was printed is rejected.",
    version = env!("CARGO_PKG_VERSION")
)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a clause set such as "a,b;!a;!b" and print the initial state
    Parse {
        #[clap(long, value_parser = parse_kind)]
        calculus: CalculusKind,
        #[clap(long)]
        formula: String,
        /// Calculus parameters as JSON
        #[clap(long)]
        params: Option<String>,
    },
    /// Apply a move to a state and print the new state
    Move {
        #[clap(long, value_parser = parse_kind)]
        calculus: CalculusKind,
        /// State JSON, "@path" to read a file or "-" for stdin
        #[clap(long)]
        state: String,
        /// Move JSON, e.g. {"type":"tableaux-expand","id1":0,"id2":0}
        #[clap(long = "move")]
        k_move: String,
    },
    /// Check whether a state is a closed proof
    Close {
        #[clap(long, value_parser = parse_kind)]
        calculus: CalculusKind,
        #[clap(long)]
        state: String,
    },
    /// Check the seal of a state
    Validate {
        #[clap(long, value_parser = parse_kind)]
        calculus: CalculusKind,
        #[clap(long)]
        state: String,
    },
}

fn read_input(arg: &str) -> CliResult<String> {
    if arg == "-" {
        let mut s = String::new();
        io::stdin().read_to_string(&mut s)?;
        Ok(s)
    } else if let Some(path) = arg.strip_prefix('@') {
        Ok(std::fs::read_to_string(path)?)
    } else {
        Ok(arg.to_string())
    }
}

fn run(command: Command) -> CliResult<String> {
    match command {
        Command::Parse {
            calculus,
            formula,
            params,
        } => request::parse(calculus, &read_input(&formula)?, params.as_deref()),
        Command::Move {
            calculus,
            state,
            k_move,
        } => request::apply_move(calculus, &read_input(&state)?, &k_move),
        Command::Close { calculus, state } => request::check_close(calculus, &read_input(&state)?),
        Command::Validate { calculus, state } => request::validate(calculus, &read_input(&state)?),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    match run(args.command) {
        Ok(out) => {
            println!("{}", out);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
