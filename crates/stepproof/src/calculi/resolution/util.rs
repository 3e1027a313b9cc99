use std::fmt;

use thiserror::Error;

use crate::clause::{Atom, Clause};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UtilErr<L>
where
    L: fmt::Display + fmt::Debug + Clone,
{
    #[error("Clause '{0}' does not contain atom '{1}'")]
    DoesNotContain(Clause<L>, L),
    #[error("Clauses '{0}' and '{1}' do not contain atom '{2}' in both positive and negated form")]
    DoNotContainPosNeg(Clause<L>, Clause<L>, L),
    #[error("Clauses '{0}' and '{1}' contain no common literals")]
    NoCommonLits(Clause<L>, Clause<L>),
    #[error("Clauses '{0}' and '{1}' contain no common literals that appear in positive and negated form")]
    NoCommonPosNegLits(Clause<L>, Clause<L>),
}

/// Picks the atom pair to resolve on when the user named the literal.
pub fn filter_clause<L>(
    c1: &Clause<L>,
    c2: &Clause<L>,
    lit: &L,
) -> Result<(Atom<L>, Atom<L>), UtilErr<L>>
where
    L: fmt::Display + fmt::Debug + Clone + PartialEq,
{
    let in_c1 = c1.with_lit(lit);
    if in_c1.is_empty() {
        return Err(UtilErr::DoesNotContain(c1.clone(), lit.clone()));
    }
    let in_c2 = c2.with_lit(lit);
    if in_c2.is_empty() {
        return Err(UtilErr::DoesNotContain(c2.clone(), lit.clone()));
    }

    find_res_candidate(&in_c1, &in_c2)
        .ok_or_else(|| UtilErr::DoNotContainPosNeg(c1.clone(), c2.clone(), lit.clone()))
}

/// Picks the atom pair to resolve on without user input.
///
/// The choice is the first atom of `c1` (in clause order) that has a
/// complementary partner in `c2`, paired with the first such partner.
pub fn get_auto_res_candidate<L>(
    c1: &Clause<L>,
    c2: &Clause<L>,
) -> Result<(Atom<L>, Atom<L>), UtilErr<L>>
where
    L: fmt::Display + fmt::Debug + Clone + PartialEq,
{
    let shared: Vec<&Atom<L>> = c1.iter().filter(|a| c2.contains_lit(a.lit())).collect();
    if shared.is_empty() {
        return Err(UtilErr::NoCommonLits(c1.clone(), c2.clone()));
    }

    shared
        .into_iter()
        .find_map(|a1| {
            c2.find_negation_of(a1)
                .map(|i| (a1.clone(), c2.atoms()[i].clone()))
        })
        .ok_or_else(|| UtilErr::NoCommonPosNegLits(c1.clone(), c2.clone()))
}

/// The resolvent of `c1` and `c2` on `a1`/`a2`, without repeated atoms.
pub fn build_clause<L>(c1: &Clause<L>, a1: &Atom<L>, c2: &Clause<L>, a2: &Atom<L>) -> Clause<L>
where
    L: fmt::Display + Clone + PartialEq,
{
    let atoms = c1
        .iter()
        .filter(|a| *a != a1)
        .chain(c2.iter().filter(|a| *a != a2))
        .cloned()
        .collect();
    Clause::new(atoms).dedup()
}

/// First atom of `as1` paired with the first atom of `as2` of opposite polarity.
pub fn find_res_candidate<L>(as1: &[&Atom<L>], as2: &[&Atom<L>]) -> Option<(Atom<L>, Atom<L>)>
where
    L: fmt::Display + Clone,
{
    let (pos, neg): (Vec<&Atom<L>>, Vec<&Atom<L>>) = as2.iter().copied().partition(|a| !a.negated());

    as1.iter().find_map(|a1| {
        let other = if a1.negated() { &pos } else { &neg };
        other.first().map(|a2| ((*a1).clone(), (*a2).clone()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(atoms: &[&str]) -> Clause<String> {
        Clause::new(
            atoms
                .iter()
                .map(|s| match s.strip_prefix('!') {
                    Some(n) => Atom::new(n.to_string(), true),
                    None => Atom::new(s.to_string(), false),
                })
                .collect(),
        )
    }

    #[test]
    fn auto_candidate_follows_clause_order() {
        let c1 = clause(&["c", "b", "a"]);
        let c2 = clause(&["!a", "c", "!b"]);
        let (a1, a2) = get_auto_res_candidate(&c1, &c2).unwrap();
        assert_eq!("b", a1.to_string());
        assert_eq!("!b", a2.to_string());
    }

    #[test]
    fn auto_candidate_errors() {
        let res = get_auto_res_candidate(&clause(&["a"]), &clause(&["b"]));
        assert!(matches!(res, Err(UtilErr::NoCommonLits(..))));

        let res = get_auto_res_candidate(&clause(&["a", "!b"]), &clause(&["a", "!b"]));
        assert!(matches!(res, Err(UtilErr::NoCommonPosNegLits(..))));
    }

    #[test]
    fn filtered_candidate() {
        let c1 = clause(&["a", "b", "!b"]);
        let c2 = clause(&["b", "c"]);
        let (a1, a2) = filter_clause(&c1, &c2, &"b".to_string()).unwrap();
        assert_eq!("!b", a1.to_string());
        assert_eq!("b", a2.to_string());

        let res = filter_clause(&c1, &c2, &"a".to_string());
        assert_eq!(
            Err(UtilErr::DoesNotContain(c2.clone(), "a".to_string())),
            res
        );
        let res = filter_clause(&c1, &c2, &"c".to_string());
        assert_eq!(
            Err(UtilErr::DoesNotContain(c1.clone(), "c".to_string())),
            res
        );
        let res = filter_clause(&clause(&["a"]), &clause(&["a", "b"]), &"a".to_string());
        assert!(matches!(res, Err(UtilErr::DoNotContainPosNeg(..))));
    }

    #[test]
    fn resolvent_is_deduplicated() {
        let c1 = clause(&["a", "b", "c"]);
        let c2 = clause(&["c", "!a", "b", "d"]);
        let (a1, a2) = get_auto_res_candidate(&c1, &c2).unwrap();
        let r = build_clause(&c1, &a1, &c2, &a2);
        assert_eq!(clause(&["b", "c", "d"]), r);
    }
}
