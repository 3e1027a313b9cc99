use std::fmt;

use serde::{Deserialize, Serialize};

/// A literal: an atom name together with its polarity.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct Atom<L: fmt::Display + Clone> {
    lit: L,
    negated: bool,
}

impl<L: fmt::Display + Clone> Atom<L> {
    pub fn new(lit: L, negated: bool) -> Self {
        Atom { lit, negated }
    }

    pub fn lit(&self) -> &L {
        &self.lit
    }

    pub fn negated(&self) -> bool {
        self.negated
    }

    /// The same atom with flipped polarity.
    pub fn not(&self) -> Atom<L> {
        Atom {
            lit: self.lit.clone(),
            negated: !self.negated,
        }
    }
}

impl<L: fmt::Display + Clone + PartialEq> Atom<L> {
    /// True iff `other` has the same name and the opposite polarity.
    pub fn is_negation_of(&self, other: &Atom<L>) -> bool {
        self.lit == other.lit && self.negated != other.negated
    }
}

impl<L: fmt::Display + Clone> fmt::Display for Atom<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "!{}", self.lit)
        } else {
            write!(f, "{}", self.lit)
        }
    }
}

/// A disjunction of atoms. The empty clause stands for a contradiction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Clause<L: fmt::Display + Clone> {
    atoms: Vec<Atom<L>>,
}

impl<L: fmt::Display + Clone> Clause<L> {
    pub fn new(atoms: Vec<Atom<L>>) -> Self {
        Clause { atoms }
    }

    pub fn empty() -> Self {
        Clause { atoms: vec![] }
    }

    pub fn add(&mut self, atom: Atom<L>) {
        self.atoms.push(atom);
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn size(&self) -> usize {
        self.atoms.len()
    }

    pub fn atoms(&self) -> &[Atom<L>] {
        &self.atoms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Atom<L>> {
        self.atoms.iter()
    }

    /// Splits the atoms into `(positive, negated)`, keeping their order.
    pub fn partition_by_polarity(&self) -> (Vec<&Atom<L>>, Vec<&Atom<L>>) {
        self.atoms.iter().partition(|a| !a.negated())
    }
}

impl<L: fmt::Display + Clone + PartialEq> Clause<L> {
    pub fn contains(&self, atom: &Atom<L>) -> bool {
        self.atoms.contains(atom)
    }

    pub fn contains_lit(&self, lit: &L) -> bool {
        self.atoms.iter().any(|a| a.lit() == lit)
    }

    /// All atoms named `lit`, in clause order.
    pub fn with_lit(&self, lit: &L) -> Vec<&Atom<L>> {
        self.atoms.iter().filter(|a| a.lit() == lit).collect()
    }

    /// Index of the first atom that is the negation of `a`.
    pub fn find_negation_of(&self, a: &Atom<L>) -> Option<usize> {
        self.atoms.iter().position(|atom| atom.is_negation_of(a))
    }

    /// Drops repeated atoms, keeping the first occurrence of each.
    pub fn dedup(self) -> Self {
        let mut atoms: Vec<Atom<L>> = Vec::with_capacity(self.atoms.len());
        for a in self.atoms {
            if !atoms.contains(&a) {
                atoms.push(a);
            }
        }
        Clause { atoms }
    }

    /// Equality up to atom order and repetition.
    pub fn equivalent(&self, other: &Clause<L>) -> bool {
        self.atoms.iter().all(|a| other.contains(a)) && other.atoms.iter().all(|a| self.contains(a))
    }
}

impl<L: fmt::Display + Clone> From<Clause<L>> for Vec<Atom<L>> {
    fn from(c: Clause<L>) -> Self {
        c.atoms
    }
}

impl<L: fmt::Display + Clone> fmt::Display for Clause<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, a) in self.atoms.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", a)?;
        }
        write!(f, "}}")
    }
}

impl<'a, L: fmt::Display + Clone> IntoIterator for &'a Clause<L> {
    type Item = &'a Atom<L>;
    type IntoIter = std::slice::Iter<'a, Atom<L>>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.iter()
    }
}

/// An ordered list of clauses, addressed by position.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct ClauseSet<L: fmt::Display + Clone> {
    clauses: Vec<Clause<L>>,
}

impl<L: fmt::Display + Clone> ClauseSet<L> {
    pub fn new(clauses: Vec<Clause<L>>) -> Self {
        ClauseSet { clauses }
    }

    pub fn add(&mut self, c: Clause<L>) {
        self.clauses.push(c)
    }

    pub fn size(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> &[Clause<L>] {
        &self.clauses
    }

    pub fn get(&self, id: usize) -> Option<&Clause<L>> {
        self.clauses.get(id)
    }

    /// Inserts `c` at `idx`, shifting every later clause up by one.
    pub fn insert(&mut self, idx: usize, c: Clause<L>) {
        self.clauses.insert(idx, c)
    }

    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(Clause::is_empty)
    }
}

impl<L: fmt::Display + Clone> fmt::Display for ClauseSet<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
