use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::with_session_globals;

/// An interned atom name. Comparing two symbols compares two integers.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Maps a string to its interned representation.
    pub fn intern(string: &str) -> Self {
        with_session_globals(|session_globals| session_globals.symbol_interner.intern(string))
    }

    /// Access the underlying string. Requires a lookup in the session
    /// interner, so avoid it in hot comparisons.
    pub fn as_str(&self) -> Rc<str> {
        with_session_globals(|session_globals| session_globals.symbol_interner.get(*self))
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.as_str(), f)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.as_str(), f)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::intern(s)
    }
}

#[derive(Default)]
pub(crate) struct Interner(RefCell<InternerInner>);

#[derive(Default)]
struct InternerInner {
    names: HashMap<Rc<str>, Symbol>,
    strings: Vec<Rc<str>>,
}

impl Interner {
    pub fn fresh() -> Self {
        Self::default()
    }

    fn intern(&self, string: &str) -> Symbol {
        let mut inner = self.0.borrow_mut();
        if let Some(&name) = inner.names.get(string) {
            return name;
        }

        let name = Symbol(inner.strings.len() as u32);
        let string: Rc<str> = Rc::from(string);
        inner.strings.push(Rc::clone(&string));
        inner.names.insert(string, name);
        name
    }

    // The borrow is released before the caller sees the string, so
    // formatting a symbol may intern new ones.
    fn get(&self, symbol: Symbol) -> Rc<str> {
        Rc::clone(&self.0.borrow().strings[symbol.0 as usize])
    }
}

mod serde {
    use super::Symbol;
    use ::serde::de::{Deserializer, Error, Visitor};
    use std::fmt;

    struct SymbolVisitor;

    impl<'de> Visitor<'de> for SymbolVisitor {
        type Value = Symbol;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an atom name")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(Symbol::intern(v))
        }
    }

    impl ::serde::Serialize for Symbol {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: ::serde::Serializer,
        {
            serializer.serialize_str(&self.as_str())
        }
    }

    impl<'de> ::serde::Deserialize<'de> for Symbol {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_str(SymbolVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session;

    #[test]
    fn interning_is_stable() {
        session(|| {
            let a = Symbol::intern("a");
            let b = Symbol::intern("b");
            assert_ne!(a, b);
            assert_eq!(a, Symbol::intern("a"));
            assert_eq!("b", &*b.as_str());
            assert_eq!("a", a.to_string());
        })
    }

    #[test]
    fn sessions_are_isolated() {
        let first = session(|| Symbol::intern("x").as_u32());
        let second = session(|| {
            Symbol::intern("y");
            Symbol::intern("x").as_u32()
        });
        assert_eq!(0, first);
        assert_eq!(1, second);
    }
}
