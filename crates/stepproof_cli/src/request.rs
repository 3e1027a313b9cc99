use std::convert::TryFrom;

use log::info;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use stepproof::calculi::resolution::prop::{self as res, PropResolution};
use stepproof::calculi::tableaux::prop::{self as tab, PropTableaux};
use stepproof::{session, Calculus, CalculusKind, ErrorKind};

#[derive(Debug, Error)]
pub enum CliErr {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Could not read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("{kind}: {msg}")]
    Calculus { kind: ErrorKind, msg: String },
}

impl CliErr {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            CliErr::Calculus { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<tab::Err> for CliErr {
    fn from(e: tab::Err) -> Self {
        CliErr::Calculus {
            kind: e.kind(),
            msg: e.to_string(),
        }
    }
}

impl From<res::Err> for CliErr {
    fn from(e: res::Err) -> Self {
        CliErr::Calculus {
            kind: e.kind(),
            msg: e.to_string(),
        }
    }
}

pub type CliResult<T> = Result<T, CliErr>;

/// Parses `formula` and returns the sealed initial state as JSON.
pub fn parse(kind: CalculusKind, formula: &str, params: Option<&str>) -> CliResult<String> {
    info!("{}: parse", kind);
    session(|| match kind {
        CalculusKind::PropTableaux => parse_with::<PropTableaux>(formula, params),
        CalculusKind::PropResolution => parse_with::<PropResolution>(formula, params),
    })
}

/// Applies one JSON move to a JSON state and returns the new state.
pub fn apply_move(kind: CalculusKind, state: &str, k_move: &str) -> CliResult<String> {
    info!("{}: move", kind);
    session(|| match kind {
        CalculusKind::PropTableaux => move_with::<PropTableaux>(state, k_move),
        CalculusKind::PropResolution => move_with::<PropResolution>(state, k_move),
    })
}

pub fn check_close(kind: CalculusKind, state: &str) -> CliResult<String> {
    info!("{}: close", kind);
    session(|| match kind {
        CalculusKind::PropTableaux => close_with::<PropTableaux>(state),
        CalculusKind::PropResolution => close_with::<PropResolution>(state),
    })
}

pub fn validate(kind: CalculusKind, state: &str) -> CliResult<String> {
    info!("{}: validate", kind);
    session(|| match kind {
        CalculusKind::PropTableaux => validate_with::<PropTableaux>(state),
        CalculusKind::PropResolution => validate_with::<PropResolution>(state),
    })
}

pub fn parse_kind(s: &str) -> Result<CalculusKind, String> {
    CalculusKind::try_from(s).map_err(str::to_string)
}

fn parse_with<'f, C>(formula: &'f str, params: Option<&str>) -> CliResult<String>
where
    C: Calculus<'f>,
    C::Params: DeserializeOwned,
    C::State: Serialize,
    CliErr: From<C::Error>,
{
    let params = params.map(serde_json::from_str::<C::Params>).transpose()?;
    let state = C::parse_formula(formula, params)?;
    Ok(serde_json::to_string(&state)?)
}

fn move_with<'f, C>(state: &str, k_move: &str) -> CliResult<String>
where
    C: Calculus<'f>,
    C::State: Serialize + DeserializeOwned,
    C::Move: DeserializeOwned,
    CliErr: From<C::Error>,
{
    let state: C::State = serde_json::from_str(state)?;
    let k_move: C::Move = serde_json::from_str(k_move)?;
    let state = C::apply_move(&state, k_move)?;
    Ok(serde_json::to_string(&state)?)
}

fn close_with<'f, C>(state: &str) -> CliResult<String>
where
    C: Calculus<'f>,
    C::State: DeserializeOwned,
    CliErr: From<C::Error>,
{
    let state: C::State = serde_json::from_str(state)?;
    let msg = C::check_close(&state)?;
    Ok(serde_json::to_string(&msg)?)
}

fn validate_with<'f, C>(state: &str) -> CliResult<String>
where
    C: Calculus<'f>,
    C::State: DeserializeOwned,
{
    let state: C::State = serde_json::from_str(state)?;
    Ok(serde_json::to_string(&C::validate(&state))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepproof::CloseMsg;

    const TAB: CalculusKind = CalculusKind::PropTableaux;
    const RES: CalculusKind = CalculusKind::PropResolution;

    fn tab_move(ty: &str, id1: usize, id2: usize) -> String {
        format!(r#"{{"type":"tableaux-{}","id1":{},"id2":{}}}"#, ty, id1, id2)
    }

    #[test]
    fn tableaux_round_trip() {
        let mut state = parse(TAB, "a,b;!a;!b", None).unwrap();
        for m in [
            tab_move("expand", 0, 0),
            tab_move("expand", 1, 1),
            tab_move("close", 3, 1),
            tab_move("expand", 2, 2),
            tab_move("close", 4, 2),
        ] {
            state = apply_move(TAB, &state, &m).unwrap();
        }

        let msg: CloseMsg = serde_json::from_str(&check_close(TAB, &state).unwrap()).unwrap();
        assert!(msg.closed);
        assert_eq!("The proof is closed", msg.msg);
        assert_eq!("true", validate(TAB, &state).unwrap());
    }

    #[test]
    fn tableaux_undo_with_params() {
        let params = r#"{"type":"WEAKLYCONNECTED","regular":true,"backtracking":true}"#;
        let initial = parse(TAB, "a,b;!a;!b", Some(params)).unwrap();
        let expanded = apply_move(TAB, &initial, &tab_move("expand", 0, 0)).unwrap();
        let undone = apply_move(TAB, &expanded, r#"{"type":"tableaux-undo"}"#).unwrap();

        let a: serde_json::Value = serde_json::from_str(&initial).unwrap();
        let b: serde_json::Value = serde_json::from_str(&undone).unwrap();
        assert_eq!(a["tree"], b["tree"]);
        assert_eq!(b["usedBacktracking"], serde_json::Value::Bool(true));
    }

    #[test]
    fn tampered_state() {
        let state = parse(TAB, "a,b;!a;!b", None).unwrap();
        let forged = state.replacen("\"negated\":false", "\"negated\":true", 1);
        assert_ne!(state, forged);

        let err = apply_move(TAB, &forged, &tab_move("expand", 0, 0)).unwrap_err();
        assert_eq!(Some(ErrorKind::IntegrityViolation), err.kind());
        assert_eq!("false", validate(TAB, &forged).unwrap());
    }

    #[test]
    fn invalid_move() {
        let state = parse(TAB, "a,b;!a;!b", None).unwrap();
        let err = apply_move(TAB, &state, &tab_move("expand", 0, 3)).unwrap_err();
        assert_eq!(Some(ErrorKind::InvalidMove), err.kind());
        assert!(err.to_string().contains("Clause with ID 3"));
    }

    #[test]
    fn resolution() {
        let state = parse(RES, "a,b;!a;!b", None).unwrap();
        let state = apply_move(RES, &state, r#"{"type":"res-resolve","c1":0,"c2":1}"#).unwrap();
        let state =
            apply_move(RES, &state, r#"{"type":"res-resolve","c1":1,"c2":3,"literal":"b"}"#).unwrap();

        let msg: CloseMsg = serde_json::from_str(&check_close(RES, &state).unwrap()).unwrap();
        assert!(msg.closed);
        assert_eq!("The proof is closed", msg.msg);
    }

    #[test]
    fn malformed_input() {
        assert!(matches!(parse(TAB, "a;b", Some("{")), Err(CliErr::Json(_))));
        assert!(matches!(check_close(RES, "[]"), Err(CliErr::Json(_))));

        let err = parse(RES, "a;;b", None).unwrap_err();
        assert_eq!(Some(ErrorKind::Parse), err.kind());
    }

    #[test]
    fn kinds() {
        assert_eq!(Ok(TAB), parse_kind("prop-tableaux"));
        assert!(parse_kind("fo-tableaux").is_err());
    }
}
