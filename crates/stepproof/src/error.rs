use std::fmt;

use serde::Serialize;

/// Coarse classification shared by every calculus error.
///
/// All three kinds are terminal for the current request: the state the
/// caller passed in is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// The formula could not be read into a clause set.
    Parse,
    /// The state seal does not match its content.
    IntegrityViolation,
    /// The move breaks a bound or a calculus precondition.
    InvalidMove,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Parse => "ParseError",
            ErrorKind::IntegrityViolation => "IntegrityViolation",
            ErrorKind::InvalidMove => "InvalidMove",
        };
        write!(f, "{}", s)
    }
}
