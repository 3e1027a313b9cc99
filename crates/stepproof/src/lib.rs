pub mod calculi;
pub mod calculus;
pub mod clause;
mod error;
pub mod parse;
mod symbol;
pub mod tamper_protect;

pub use calculi::resolution;
pub use calculi::tableaux;
pub use calculi::CalculusKind;
pub use calculus::{Calculus, CloseMsg};
pub use error::ErrorKind;
pub use symbol::Symbol;

use symbol::Interner;

scoped_tls::scoped_thread_local!(static SESSION_GLOBALS: SessionGlobals);

/// Per-session state shared by every proof object created inside
/// [`session`]. Symbols are only meaningful within the session that
/// interned them.
pub struct SessionGlobals {
    symbol_interner: Interner,
}

impl SessionGlobals {
    fn new() -> Self {
        Self {
            symbol_interner: Interner::fresh(),
        }
    }
}

/// Runs `f` with a fresh set of session globals installed.
///
/// Every request against the engine (parsing, applying a move, checking
/// closure, (de)serializing a state) must happen inside a session.
pub fn session<R, F>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let globals = SessionGlobals::new();
    SESSION_GLOBALS.set(&globals, f)
}

pub(crate) fn with_session_globals<R, F>(f: F) -> R
where
    F: FnOnce(&SessionGlobals) -> R,
{
    SESSION_GLOBALS.with(f)
}
