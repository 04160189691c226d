//! Dereferencing and unification.
//!
//! The dispatch table is a plain recursive function, not a lazy producer
//! internally: unification yields *at most one* success (unlike `AND`/`OR`,
//! which have real choicepoints), so its internal structure is commit-all-
//! or-undo-all, with [`crate::store::undo_to`] called at every compound
//! level that fails partway through. The public `unify`/`unify_all`
//! entry points wrap that bool-returning core in a single-pull lazy
//! [`Solutions`](crate::combinators::Solutions) shell, so constructing a
//! goal never does work — only the first `.next()` call does, matching the
//! rest of the engine's laziness discipline.

use crate::store::{bind, trail_mark, undo_to, Var};
use crate::term::{scalar_eq, Term};

/// Returns the canonical term for `t`: follows a chain of bound Vars until
/// reaching an unbound Var or a non-Var term. Pure; performs no mutation.
/// Every operation that inspects or compares a term must call this first.
pub fn deref(t: &Term) -> Term {
    match t {
        Term::Var(v) => match v.get() {
            Some(bound) => deref(&bound),
            None => t.clone(),
        },
        other => other.clone(),
    }
}

/// The structural-recursion backbone: attempts to unify `a` with `b`,
/// installing bindings as it goes. On failure it undoes exactly the
/// bindings this call installed (not any made by its caller) before
/// returning `false`.
pub(crate) fn unify_rec(a: &Term, b: &Term) -> bool {
    let a = deref(a);
    let b = deref(b);
    match (a, b) {
        (Term::Var(va), Term::Var(vb)) if Var::ptr_eq(&va, &vb) => true,
        // Edge case: unifying two distinct unbound Vars binds one to the
        // other. Direction is unobservable under `deref`.
        (Term::Var(v), other) | (other, Term::Var(v)) => {
            bind(&v, other);
            true
        }
        (Term::Scalar(x), Term::Scalar(y)) => scalar_eq(&x, &y),
        (Term::Sequence(xs), Term::Sequence(ys)) => unify_positional(&xs, &ys),
        (Term::Tuple(xs), Term::Tuple(ys)) => unify_positional(&xs, &ys),
        (Term::Record(pattern), Term::Record(subject)) => unify_record(&pattern, &subject),
        _ => false,
    }
}

fn unify_positional(xs: &[Term], ys: &[Term]) -> bool {
    if xs.len() != ys.len() {
        return false;
    }
    let mark = trail_mark();
    for (x, y) in xs.iter().zip(ys.iter()) {
        if !unify_rec(x, y) {
            undo_to(mark);
            return false;
        }
    }
    true
}

/// Asymmetric record unification: every key of `pattern` must be present in
/// `subject` with a unifying value; extra keys in `subject` are tolerated.
/// `pattern` is always the left-hand argument to `unify`.
fn unify_record(pattern: &[(crate::term::Scalar, Term)], subject: &[(crate::term::Scalar, Term)]) -> bool {
    let mark = trail_mark();
    for (key, value) in pattern {
        let found = subject.iter().find(|(sk, _)| scalar_eq(sk, key));
        match found {
            Some((_, subject_value)) => {
                if !unify_rec(value, subject_value) {
                    undo_to(mark);
                    return false;
                }
            }
            None => {
                undo_to(mark);
                return false;
            }
        }
    }
    true
}

/// A lazy producer that performs its work on the first `.next()` call and
/// yields at most one success, undoing on every subsequent pull and on
/// drop regardless of how it was reached.
pub(crate) struct Unify {
    pair: Option<(Term, Term)>,
    mark: usize,
}

impl Unify {
    fn new(a: Term, b: Term) -> Unify {
        Unify { pair: Some((a, b)), mark: trail_mark() }
    }
}

impl Iterator for Unify {
    type Item = ();

    fn next(&mut self) -> Option<()> {
        match self.pair.take() {
            Some((a, b)) => {
                self.mark = trail_mark();
                if unify_rec(&a, &b) {
                    Some(())
                } else {
                    None
                }
            }
            None => None,
        }
    }
}

impl Drop for Unify {
    fn drop(&mut self) {
        undo_to(self.mark);
    }
}

/// `unify(a, b)`: a lazy producer of at most one success.
pub fn unify(a: impl Into<Term>, b: impl Into<Term>) -> crate::combinators::Solutions<'static> {
    Box::new(Unify::new(a.into(), b.into()))
}

/// `unify_all(pairs)`: yields once iff every pair unifies simultaneously in
/// sequence — the structural-recursion backbone every aggregate unification
/// reduces to.
pub fn unify_all(pairs: Vec<(Term, Term)>) -> crate::combinators::Solutions<'static> {
    struct UnifyAll {
        pairs: Option<Vec<(Term, Term)>>,
        mark: usize,
    }

    impl Iterator for UnifyAll {
        type Item = ();

        fn next(&mut self) -> Option<()> {
            match self.pairs.take() {
                Some(pairs) => {
                    self.mark = trail_mark();
                    let ok = pairs.iter().all(|(a, b)| unify_rec(a, b));
                    if ok {
                        Some(())
                    } else {
                        undo_to(self.mark);
                        None
                    }
                }
                None => None,
            }
        }
    }

    impl Drop for UnifyAll {
        fn drop(&mut self) {
            undo_to(self.mark);
        }
    }

    Box::new(UnifyAll { pairs: Some(pairs), mark: trail_mark() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Var;

    #[test]
    fn unify_var_with_scalar_binds_and_restores() {
        let x = Var::named("X");
        let mut sols = unify(Term::Var(x.clone()), Term::int(5));
        assert!(sols.next().is_some());
        assert!(matches!(deref(&Term::Var(x.clone())), Term::Scalar(crate::term::Scalar::Int(5))));
        assert!(sols.next().is_none());
        drop(sols);
        assert!(!x.is_bound());
    }

    #[test]
    fn unify_two_scalars_same_value_succeeds() {
        let mut sols = unify(Term::int(3), Term::int(3));
        assert!(sols.next().is_some());
    }

    #[test]
    fn unify_two_scalars_different_value_fails() {
        let mut sols = unify(Term::int(3), Term::int(4));
        assert!(sols.next().is_none());
    }

    #[test]
    fn unify_sequences_of_different_length_fails_immediately() {
        let a = Term::seq([Term::int(1), Term::int(2)]);
        let b = Term::seq([Term::int(1)]);
        let mut sols = unify(a, b);
        assert!(sols.next().is_none());
    }

    #[test]
    fn unify_partial_list_binds_each_slot() {
        let x = Var::named("X");
        let z = Var::named("Z");
        let a = Term::seq([Term::Var(x.clone()), Term::int(2), Term::Var(z.clone())]);
        let b = Term::seq([Term::int(1), Term::int(2), Term::int(3)]);
        let mut sols = unify(a, b);
        assert!(sols.next().is_some());
        assert!(matches!(deref(&Term::Var(x)), Term::Scalar(crate::term::Scalar::Int(1))));
        assert!(matches!(deref(&Term::Var(z)), Term::Scalar(crate::term::Scalar::Int(3))));
    }

    #[test]
    fn unify_repeated_var_requires_consistent_binding() {
        let x = Var::named("X");
        let a = Term::seq([Term::Var(x.clone()), Term::Var(x)]);
        let b = Term::seq([Term::int(1), Term::int(2)]);
        let mut sols = unify(a, b);
        assert!(sols.next().is_none());
    }

    #[test]
    fn record_unification_is_asymmetric() {
        let pattern = Term::record([(crate::term::Scalar::symbol("name"), Term::str("homer"))]);
        let subject = Term::record([
            (crate::term::Scalar::symbol("name"), Term::str("homer")),
            (crate::term::Scalar::symbol("age"), Term::int(39)),
        ]);
        assert!(unify(pattern.clone(), subject.clone()).next().is_some());
        // extra keys only tolerated on the right: swapping sides must fail
        // because `age` is required by the (now left) pattern and absent
        // from the (now right) subject.
        assert!(unify(subject, pattern).next().is_none());
    }

    #[test]
    fn self_unification_of_same_var_succeeds_without_binding() {
        let x = Var::named("X");
        let mut sols = unify(Term::Var(x.clone()), Term::Var(x.clone()));
        assert!(sols.next().is_some());
        assert!(!x.is_bound());
    }
}
