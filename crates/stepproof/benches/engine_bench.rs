use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stepproof::calculi::resolution::prop::{self as res, PropResolution};
use stepproof::calculi::tableaux::prop::{self as tab, PropTableaux};
use stepproof::calculi::tableaux::TableauxType;
use stepproof::{session, Calculus, Symbol};

// Chain a1 -> a2 -> ... -> an with !a1 and an as unit clauses.
fn implication_chain(n: usize) -> String {
    let mut f = String::from("!a1");
    for i in 1..n {
        f.push_str(&format!(";a{},!a{}", i, i + 1));
    }
    f.push_str(&format!(";a{}", n));
    f
}

fn tableaux_chain(c: &mut Criterion) {
    let mut g = c.benchmark_group("Prop Tableaux");
    for n in [4usize, 16, 64] {
        let formula = implication_chain(n);
        g.bench_with_input(BenchmarkId::new("chain", n), &formula, |b, f| {
            b.iter(|| {
                session(|| {
                    let params = tab::Params {
                        tab_type: TableauxType::WeaklyConnected,
                        regular: true,
                        backtracking: true,
                        ..Default::default()
                    };
                    // root: !a1, then a1,!a2 closes a1 and leaves !a2 open, ...
                    let mut s = PropTableaux::parse_formula(f, Some(params)).unwrap();
                    s = PropTableaux::apply_move(&s, tab::Move::Expand(0, 0)).unwrap();
                    let mut leaf = 1;
                    for clause in 1..n {
                        s = PropTableaux::apply_move(&s, tab::Move::Expand(leaf, clause)).unwrap();
                        let first = s.nodes()[leaf].children()[0];
                        s = PropTableaux::apply_move(&s, tab::Move::Close(first, leaf)).unwrap();
                        leaf = first + 1;
                    }
                    s = PropTableaux::apply_move(&s, tab::Move::Expand(leaf, n)).unwrap();
                    let last = s.nodes().len() - 1;
                    s = PropTableaux::apply_move(&s, tab::Move::Close(last, leaf)).unwrap();
                    black_box(PropTableaux::check_close(&s).unwrap())
                })
            })
        });
    }
    g.finish();
}

fn resolution_chain(c: &mut Criterion) {
    let mut g = c.benchmark_group("Prop Resolution");
    for n in [4usize, 16, 64] {
        let formula = implication_chain(n);
        g.bench_with_input(BenchmarkId::new("chain", n), &formula, |b, f| {
            b.iter(|| {
                session(|| {
                    let mut s = PropResolution::parse_formula(f, None).unwrap();
                    // the unit resolvent lands on its partner's position
                    let mut unit = 0;
                    for i in 1..=n {
                        let lit = Symbol::intern(&format!("a{}", i));
                        let partner = s
                            .clause_set()
                            .clauses()
                            .iter()
                            .position(|c| c.iter().any(|a| *a.lit() == lit && !a.negated()))
                            .unwrap();
                        s = PropResolution::apply_move(&s, res::Move::Resolve(unit, partner, Some(lit)))
                            .unwrap();
                        unit = partner;
                    }
                    black_box(PropResolution::check_close(&s).unwrap())
                })
            })
        });
    }
    g.finish();
}

criterion_group!(benches, tableaux_chain, resolution_chain);
criterion_main!(benches);
