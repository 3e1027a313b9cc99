use std::convert::TryFrom;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::util::{build_clause, filter_clause, get_auto_res_candidate, UtilErr};
use crate::clause::ClauseSet;
use crate::parse::{parse_prop_clauses, CNFStrategy, ParseErr};
use crate::tamper_protect::ProtectedState;
use crate::{Calculus, CloseMsg, ErrorKind, Symbol};

pub type PropResResult<T> = Result<T, Err>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Err {
    #[error(transparent)]
    Parse(#[from] ParseErr),
    #[error("Invalid tamper protection seal, the proof state has been modified")]
    IntegrityViolation,
    #[error("There is no clause with id {0}")]
    InvalidClauseId(usize),
    #[error("Both ids refer to the same clause {0}")]
    SameIds(usize),
    #[error("Cannot resolve clauses {0} and {1}: {2}")]
    Resolve(usize, usize, UtilErr<Symbol>),
}

impl Err {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Err::Parse(_) => ErrorKind::Parse,
            Err::IntegrityViolation => ErrorKind::IntegrityViolation,
            _ => ErrorKind::InvalidMove,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct Params {
    pub cnf_strategy: CNFStrategy,
}

/// A resolution proof: the clause list only ever grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    clause_set: ClauseSet<Symbol>,
    newest_node: Option<usize>,
    last_move: Option<Move>,
    seal: String,
}

impl State {
    pub fn new(clause_set: ClauseSet<Symbol>) -> Self {
        let mut state = Self {
            clause_set,
            newest_node: None,
            last_move: None,
            seal: String::new(),
        };
        state.compute_seal();
        state
    }

    pub fn clause_set(&self) -> &ClauseSet<Symbol> {
        &self.clause_set
    }

    /// Id of the most recent resolvent.
    pub fn newest_node(&self) -> Option<usize> {
        self.newest_node
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.last_move.as_ref()
    }
}

impl ProtectedState for State {
    fn compute_seal_info(&self) -> String {
        format!(
            "resolutionstate|{}|{}|{}",
            self.clause_set,
            self.newest_node.map_or(-1, |n| n as i64),
            self.last_move
                .as_ref()
                .map_or_else(|| "-".to_string(), Move::to_string)
        )
    }

    fn seal(&self) -> &str {
        &self.seal
    }

    fn set_seal(&mut self, seal: String) {
        self.seal = seal;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMove", into = "RawMove")]
pub enum Move {
    /// Resolve two clauses, optionally on a given atom name.
    Resolve(usize, usize, Option<Symbol>),
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Resolve(c1, c2, Some(lit)) => write!(f, "Resolve({},{},{})", c1, c2, lit),
            Move::Resolve(c1, c2, None) => write!(f, "Resolve({},{},-)", c1, c2),
        }
    }
}

/// Wire shape: `{"type": "res-resolve", "c1": 0, "c2": 1, "literal": "a"}`.
#[derive(Serialize, Deserialize)]
struct RawMove {
    #[serde(rename = "type")]
    ty: String,
    c1: usize,
    c2: usize,
    #[serde(default)]
    literal: Option<Symbol>,
}

impl TryFrom<RawMove> for Move {
    type Error = String;

    fn try_from(raw: RawMove) -> Result<Self, Self::Error> {
        match raw.ty.as_str() {
            "res-resolve" => Ok(Move::Resolve(raw.c1, raw.c2, raw.literal)),
            ty => Err(format!("Unknown move type '{}'", ty)),
        }
    }
}

impl From<Move> for RawMove {
    fn from(m: Move) -> Self {
        match m {
            Move::Resolve(c1, c2, literal) => RawMove {
                ty: "res-resolve".to_string(),
                c1,
                c2,
                literal,
            },
        }
    }
}

pub struct PropResolution;

impl<'f> Calculus<'f> for PropResolution {
    type Params = Params;
    type State = State;
    type Move = Move;
    type Error = Err;

    fn parse_formula(formula: &'f str, params: Option<Self::Params>) -> PropResResult<Self::State> {
        let params = params.unwrap_or_default();
        let parsed = parse_prop_clauses(formula, params.cnf_strategy)?;
        Ok(State::new(parsed))
    }

    fn validate(state: &Self::State) -> bool {
        state.verify_seal()
    }

    fn apply_move(state: &Self::State, k_move: Self::Move) -> PropResResult<Self::State> {
        if !state.verify_seal() {
            return Err(Err::IntegrityViolation);
        }
        debug!(
            "applying {} to clause list of size {}",
            k_move,
            state.clause_set.size()
        );

        let mut state = match k_move {
            Move::Resolve(c1, c2, lit) => apply_resolve(state.clone(), c1, c2, lit)?,
        };
        state.last_move = Some(k_move);
        state.compute_seal();
        Ok(state)
    }

    fn check_close(state: &Self::State) -> PropResResult<CloseMsg> {
        if !state.verify_seal() {
            return Err(Err::IntegrityViolation);
        }
        let closed = state.clause_set.has_empty_clause();
        let msg = if closed {
            "The proof is closed"
        } else {
            "The proof is not closed"
        };
        Ok(CloseMsg {
            closed,
            msg: msg.to_string(),
        })
    }
}

fn apply_resolve(
    mut state: State,
    c1_id: usize,
    c2_id: usize,
    lit: Option<Symbol>,
) -> PropResResult<State> {
    if c1_id == c2_id {
        return Err(Err::SameIds(c1_id));
    }
    let c1 = state
        .clause_set
        .get(c1_id)
        .ok_or(Err::InvalidClauseId(c1_id))?;
    let c2 = state
        .clause_set
        .get(c2_id)
        .ok_or(Err::InvalidClauseId(c2_id))?;

    let (a1, a2) = match lit {
        Some(l) => filter_clause(c1, c2, &l),
        None => get_auto_res_candidate(c1, c2),
    }
    .map_err(|e| Err::Resolve(c1_id, c2_id, e))?;

    let resolvent = build_clause(c1, &a1, c2, &a2);
    debug!("resolved {} and {} on {} into {}", c1, c2, a1, resolvent);

    // The resolvent takes the place of c2, pushing c2 and later clauses up.
    state.clause_set.insert(c2_id, resolvent);
    state.newest_node = Some(c2_id);

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session;

    fn parse(formula: &str) -> State {
        PropResolution::parse_formula(formula, None).expect(formula)
    }

    fn resolve(state: &State, c1: usize, c2: usize, lit: Option<&str>) -> PropResResult<State> {
        let lit = lit.map(Symbol::intern);
        PropResolution::apply_move(state, Move::Resolve(c1, c2, lit))
    }

    #[test]
    fn auto_resolvent_replaces_second_position() {
        session(|| {
            let state = parse("a,b;!a");
            let state = resolve(&state, 0, 1, None).unwrap();

            assert_eq!("{a, b}, {b}, {!a}", state.clause_set.to_string());
            assert_eq!(Some(1), state.newest_node());
            assert_eq!(
                Some(&Move::Resolve(0, 1, None)),
                state.last_move()
            );
        })
    }

    #[test]
    fn insertion_shifts_later_ids() {
        session(|| {
            let state = parse("a;!a,b;!b;c");
            let state = resolve(&state, 0, 1, None).unwrap();
            // {a}, {b}, {!a, b}, {!b}, {c}
            assert_eq!("{a}, {b}, {!a, b}, {!b}, {c}", state.clause_set.to_string());

            let state = resolve(&state, 1, 3, None).unwrap();
            assert_eq!(
                "{a}, {b}, {!a, b}, {}, {!b}, {c}",
                state.clause_set.to_string()
            );
            assert_eq!(Some(3), state.newest_node());
        })
    }

    #[test]
    fn deterministic() {
        session(|| {
            let state = parse("c,!b,a,b;b,!a,!c;d");
            let first = resolve(&state, 0, 1, None).unwrap();
            for _ in 0..5 {
                let again = resolve(&state, 0, 1, None).unwrap();
                assert_eq!(first.clause_set, again.clause_set);
                assert_eq!(first.seal, again.seal);
            }
            // c is the first atom of clause 0 with a complement in clause 1
            assert_eq!("{!b, a, b, !a}", first.clause_set.clauses()[1].to_string());
        })
    }

    #[test]
    fn explicit_literal() {
        session(|| {
            let state = parse("a,b;!a,!b");
            let state = resolve(&state, 0, 1, Some("b")).unwrap();
            assert_eq!("{a, !a}", state.clause_set.clauses()[1].to_string());
        })
    }

    #[test]
    fn duplicates_removed() {
        session(|| {
            let state = parse("a,b;!a,b");
            let state = resolve(&state, 0, 1, None).unwrap();
            assert_eq!("{b}", state.clause_set.clauses()[1].to_string());
        })
    }

    #[test]
    fn invalid() {
        session(|| {
            let state = parse("a,b;a;!c;b,c");

            assert_eq!(Err::SameIds(1), resolve(&state, 1, 1, None).unwrap_err());
            assert_eq!(Err::InvalidClauseId(4), resolve(&state, 0, 4, None).unwrap_err());
            assert_eq!(Err::InvalidClauseId(7), resolve(&state, 7, 0, None).unwrap_err());

            assert!(matches!(
                resolve(&state, 0, 2, None),
                Err(Err::Resolve(0, 2, UtilErr::NoCommonLits(..)))
            ));
            assert!(matches!(
                resolve(&state, 0, 1, None),
                Err(Err::Resolve(0, 1, UtilErr::NoCommonPosNegLits(..)))
            ));
            assert!(matches!(
                resolve(&state, 0, 2, Some("c")),
                Err(Err::Resolve(0, 2, UtilErr::DoesNotContain(..)))
            ));
            assert!(matches!(
                resolve(&state, 0, 1, Some("a")),
                Err(Err::Resolve(0, 1, UtilErr::DoNotContainPosNeg(..)))
            ));

            let err = resolve(&state, 0, 2, None).unwrap_err();
            assert_eq!(ErrorKind::InvalidMove, err.kind());
            assert_eq!(
                "Cannot resolve clauses 0 and 2: Clauses '{a, b}' and '{!c}' contain no common literals",
                err.to_string()
            );
        })
    }

    #[test]
    fn failed_move_leaves_state_untouched() {
        session(|| {
            let state = parse("a;b");
            let before = serde_json::to_string(&state).unwrap();
            assert!(resolve(&state, 0, 2, None).is_err());
            assert_eq!(before, serde_json::to_string(&state).unwrap());
        })
    }

    #[test]
    fn close() {
        session(|| {
            let state = parse("a,b;!a;!b");
            let msg = PropResolution::check_close(&state).unwrap();
            assert!(!msg.closed);
            assert_eq!("The proof is not closed", msg.msg);

            let state = resolve(&state, 0, 1, None).unwrap();
            // {a, b}, {b}, {!a}, {!b}
            let state = resolve(&state, 1, 3, None).unwrap();
            assert!(state.clause_set.clauses()[3].is_empty());

            let msg = PropResolution::check_close(&state).unwrap();
            assert!(msg.closed);
            assert_eq!("The proof is closed", msg.msg);
        })
    }

    #[test]
    fn seal() {
        session(|| {
            let state = resolve(&parse("a,b;!a"), 0, 1, None).unwrap();
            assert!(PropResolution::validate(&state));

            let json = serde_json::to_string(&state).unwrap();
            let back: State = serde_json::from_str(&json).unwrap();
            assert!(PropResolution::validate(&back));

            let mut forged = back.clone();
            forged.newest_node = Some(0);
            assert_eq!(
                Err::IntegrityViolation,
                resolve(&forged, 0, 2, None).unwrap_err()
            );

            let forged: State = serde_json::from_str(&json.replacen("\"negated\":true", "\"negated\":false", 1)).unwrap();
            assert_eq!(
                ErrorKind::IntegrityViolation,
                PropResolution::check_close(&forged).unwrap_err().kind()
            );
        })
    }

    #[test]
    fn wire() {
        session(|| {
            let m: Move = serde_json::from_str(r#"{"type":"res-resolve","c1":0,"c2":2,"literal":"x"}"#).unwrap();
            assert_eq!(Move::Resolve(0, 2, Some(Symbol::intern("x"))), m);
            let m: Move = serde_json::from_str(r#"{"type":"res-resolve","c1":1,"c2":0}"#).unwrap();
            assert_eq!(Move::Resolve(1, 0, None), m);
            assert!(serde_json::from_str::<Move>(r#"{"type":"res-hide","c1":1,"c2":0}"#).is_err());
            assert_eq!(
                r#"{"type":"res-resolve","c1":1,"c2":0,"literal":null}"#,
                serde_json::to_string(&Move::Resolve(1, 0, None)).unwrap()
            );
        })
    }
}
