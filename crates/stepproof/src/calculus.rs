use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseMsg {
    pub closed: bool,
    pub msg: String,
}

/// The request surface every calculus exposes.
///
/// States are sealed values: `parse_formula` returns a sealed state,
/// `apply_move` and `check_close` reject states whose seal does not match.
/// `apply_move` borrows its input, so on failure the caller still holds
/// the unchanged prior state.
pub trait Calculus<'f> {
    type Params;
    type State;
    type Move;
    type Error;

    fn parse_formula(
        formula: &'f str,
        params: Option<Self::Params>,
    ) -> Result<Self::State, Self::Error>;

    /// True iff the state carries a seal matching its content.
    fn validate(state: &Self::State) -> bool;

    fn apply_move(state: &Self::State, k_move: Self::Move) -> Result<Self::State, Self::Error>;

    fn check_close(state: &Self::State) -> Result<CloseMsg, Self::Error>;
}
