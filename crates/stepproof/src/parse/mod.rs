use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clause::ClauseSet;
use crate::Symbol;

pub mod clause_set;

pub use clause_set::parse_prop_clause_set;

pub type ParseResult<T> = Result<T, ParseErr>;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ParseErr {
    #[error("Expected {0} but got {1}")]
    Expected(String, String),
    #[error("Unexpected character '{0}' at position {1}. Please use alphanumeric variables only, separate atoms with ',' and clauses with ';'.")]
    InvalidChar(char, usize),
    #[error("The clause set is empty")]
    Empty,
}

/// How a general formula would be brought into clause form.
///
/// The clause-set notation is already in clause form, so the strategy has
/// no effect on it; it is still part of every proof's parameters.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize, Serialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CNFStrategy {
    Naive,
    Tseytin,
    #[default]
    Optimal,
}

/// Reads `formula` into a propositional clause set.
pub fn parse_prop_clauses(formula: &str, _strategy: CNFStrategy) -> ParseResult<ClauseSet<Symbol>> {
    parse_prop_clause_set(formula)
}
