//! The standard predicate library: `member`, `append`, `length`, `reverse`,
//! `last`, `nth`, `between`, `succ`, `plus`, `times`, `findall`, and the
//! deliberately incomplete `less_than`/`not_in` sketches used by the
//! scheduling-style examples below.
//!
//! Every predicate here is built out of [`crate::unify`] and
//! [`crate::combinators`] rather than touching the trail directly — this
//! module has no special access to the store, the same constraint a user
//! extending the engine would have.

use crate::combinators::{fail, not_unifiable, succeed, Goal, Solutions, OR};
use crate::term::Term;
use crate::unify::{deref, unify, unify_all};

fn as_list(t: &Term) -> Option<Vec<Term>> {
    match t {
        Term::Sequence(items) => Some(items.clone()),
        _ => None,
    }
}

fn as_int(t: &Term) -> Option<i64> {
    match t {
        Term::Scalar(crate::term::Scalar::Int(n)) => Some(*n),
        _ => None,
    }
}

/// `member(x, list)`: yields once for each element of `list` that unifies
/// with `x`, undoing between attempts. Mirrors `OR` over one `unify` call
/// per element, without needing a `Vec<Goal>` allocation up front.
pub fn member(x: impl Into<Term>, list: Vec<Term>) -> Solutions<'static> {
    let x = x.into();
    let goals: Vec<Goal<'static>> = list
        .into_iter()
        .map(|item| {
            let x = x.clone();
            Goal::thunk(move || unify(x.clone(), item.clone()))
        })
        .collect();
    OR(goals)
}

/// `append(xs, ys, zs)`: the relational list predicate. Supports every mode
/// exercised by `list_operations.py` — all three lists known, one of `xs`/
/// `ys`/`zs` left as an unbound `Var`, or both `xs` and `ys` unbound with
/// `zs` known (which enumerates every split of `zs`). The fully-unbound case
/// (all three a `Var`) has no finite answer set and is left unsupported,
/// same as `not_in`/`less_than`.
pub fn append(xs: impl Into<Term>, ys: impl Into<Term>, zs: impl Into<Term>) -> Solutions<'static> {
    struct Append {
        args: Option<(Term, Term, Term)>,
        inner: Option<Solutions<'static>>,
    }

    impl Iterator for Append {
        type Item = ();

        fn next(&mut self) -> Option<()> {
            if self.inner.is_none() {
                let (xs, ys, zs) = self.args.take()?;
                self.inner = Some(build_append(xs, ys, zs));
            }
            self.inner.as_mut().unwrap().next()
        }
    }

    Box::new(Append { args: Some((xs.into(), ys.into(), zs.into())), inner: None })
}

fn build_append(xs: Term, ys: Term, zs: Term) -> Solutions<'static> {
    let xs_d = deref(&xs);
    let ys_d = deref(&ys);
    let zs_d = deref(&zs);
    let xs_list = as_list(&xs_d);
    let ys_list = as_list(&ys_d);

    if let (Some(xl), Some(yl)) = (&xs_list, &ys_list) {
        let mut combined = xl.clone();
        combined.extend(yl.clone());
        return unify(zs_d, Term::seq(combined));
    }
    if let Some(xl) = &xs_list {
        return match as_list(&zs_d) {
            Some(zl) if zl.len() >= xl.len() => unify_all(vec![
                (xs_d, Term::seq(zl[..xl.len()].to_vec())),
                (ys_d, Term::seq(zl[xl.len()..].to_vec())),
            ]),
            _ => fail(),
        };
    }
    if let Some(yl) = &ys_list {
        return match as_list(&zs_d) {
            Some(zl) if zl.len() >= yl.len() => {
                let split = zl.len() - yl.len();
                unify_all(vec![
                    (xs_d, Term::seq(zl[..split].to_vec())),
                    (ys_d, Term::seq(zl[split..].to_vec())),
                ])
            }
            _ => fail(),
        };
    }
    match as_list(&zs_d) {
        Some(zl) => {
            let goals: Vec<Goal<'static>> = (0..=zl.len())
                .map(|k| {
                    let xs_d = xs_d.clone();
                    let ys_d = ys_d.clone();
                    let zl = zl.clone();
                    Goal::thunk(move || {
                        unify_all(vec![
                            (xs_d.clone(), Term::seq(zl[..k].to_vec())),
                            (ys_d.clone(), Term::seq(zl[k..].to_vec())),
                        ])
                    })
                })
                .collect();
            OR(goals)
        }
        None => fail(),
    }
}

/// `length(list, n)`: if `list` is known, unifies `n` with its length; if
/// `list` is unbound and `n` is a known integer, unifies `list` with a fresh
/// sequence of `n` distinct unbound variables.
pub fn length(list: impl Into<Term>, n: impl Into<Term>) -> Solutions<'static> {
    let list = list.into();
    let n = n.into();
    let list_d = deref(&list);
    if let Some(items) = as_list(&list_d) {
        return unify(n, Term::int(items.len() as i64));
    }
    let n_d = deref(&n);
    if let Some(k) = as_int(&n_d) {
        if k >= 0 {
            let fresh: Vec<Term> = (0..k).map(|_| Term::Var(crate::store::Var::new())).collect();
            return unify(list_d, Term::seq(fresh));
        }
    }
    fail()
}

/// `reverse(list, r)`: known in either direction, unsupported if both are
/// unbound.
pub fn reverse(list: impl Into<Term>, r: impl Into<Term>) -> Solutions<'static> {
    let list = list.into();
    let r = r.into();
    let list_d = deref(&list);
    if let Some(items) = as_list(&list_d) {
        let mut rev = items;
        rev.reverse();
        return unify(r, Term::seq(rev));
    }
    let r_d = deref(&r);
    if let Some(items) = as_list(&r_d) {
        let mut rev = items;
        rev.reverse();
        return unify(list_d, Term::seq(rev));
    }
    fail()
}

/// `last(list, x)`: `list` must be known and non-empty.
pub fn last(list: impl Into<Term>, x: impl Into<Term>) -> Solutions<'static> {
    let list_d = deref(&list.into());
    match as_list(&list_d).and_then(|items| items.last().cloned()) {
        Some(tail) => unify(tail, x),
        None => fail(),
    }
}

/// `nth(index, list, x)`: 0-indexed, both `index` and `list` must be known.
pub fn nth(index: impl Into<Term>, list: impl Into<Term>, x: impl Into<Term>) -> Solutions<'static> {
    let index_d = deref(&index.into());
    let list_d = deref(&list.into());
    match (as_int(&index_d), as_list(&list_d)) {
        (Some(i), Some(items)) if i >= 0 && (i as usize) < items.len() => unify(items[i as usize].clone(), x),
        _ => fail(),
    }
}

/// `between(lo, hi, x)`: `lo` and `hi` must be known integers. If `x` is
/// unbound, enumerates every integer in `lo..=hi`; if `x` is known, succeeds
/// once iff it falls in range.
pub fn between(lo: impl Into<Term>, hi: impl Into<Term>, x: impl Into<Term>) -> Solutions<'static> {
    let lo_d = deref(&lo.into());
    let hi_d = deref(&hi.into());
    let x = x.into();
    match (as_int(&lo_d), as_int(&hi_d)) {
        (Some(lo), Some(hi)) if lo <= hi => {
            if let Some(v) = as_int(&deref(&x)) {
                return if lo <= v && v <= hi { unify(x, Term::int(v)) } else { fail() };
            }
            let goals: Vec<Goal<'static>> = (lo..=hi)
                .map(|v| {
                    let x = x.clone();
                    Goal::thunk(move || unify(x.clone(), Term::int(v)))
                })
                .collect();
            OR(goals)
        }
        _ => fail(),
    }
}

/// `succ(x, y)`: `y = x + 1`, usable with either argument bound.
pub fn succ(x: impl Into<Term>, y: impl Into<Term>) -> Solutions<'static> {
    let x = x.into();
    let y = y.into();
    if let Some(n) = as_int(&deref(&x)) {
        return unify(y, Term::int(n + 1));
    }
    if let Some(n) = as_int(&deref(&y)) {
        if n > 0 {
            return unify(x, Term::int(n - 1));
        }
    }
    fail()
}

/// `plus(x, y, z)`: `z = x + y`, solvable from any two of the three.
pub fn plus(x: impl Into<Term>, y: impl Into<Term>, z: impl Into<Term>) -> Solutions<'static> {
    let x = x.into();
    let y = y.into();
    let z = z.into();
    let xv = as_int(&deref(&x));
    let yv = as_int(&deref(&y));
    let zv = as_int(&deref(&z));
    match (xv, yv, zv) {
        (Some(a), Some(b), _) => unify(z, Term::int(a + b)),
        (Some(a), None, Some(c)) => unify(y, Term::int(c - a)),
        (None, Some(b), Some(c)) => unify(x, Term::int(c - b)),
        _ => fail(),
    }
}

/// `times(x, y, z)`: `z = x * y`, solvable from any two of the three; the
/// missing-factor directions fail when the product is not evenly divisible.
pub fn times(x: impl Into<Term>, y: impl Into<Term>, z: impl Into<Term>) -> Solutions<'static> {
    let x = x.into();
    let y = y.into();
    let z = z.into();
    let xv = as_int(&deref(&x));
    let yv = as_int(&deref(&y));
    let zv = as_int(&deref(&z));
    match (xv, yv, zv) {
        (Some(a), Some(b), _) => unify(z, Term::int(a * b)),
        (Some(a), None, Some(c)) if a != 0 && c % a == 0 => unify(y, Term::int(c / a)),
        (None, Some(b), Some(c)) if b != 0 && c % b == 0 => unify(x, Term::int(c / b)),
        _ => fail(),
    }
}

/// `less_than(x, y)`: `x < y`, succeeding only when both sides are already
/// bound integers or floats. Unlike `succ`/`plus`/`times` above, it does not
/// attempt to order an unbound argument.
pub fn less_than(x: impl Into<Term>, y: impl Into<Term>) -> Solutions<'static> {
    let x_d = deref(&x.into());
    let y_d = deref(&y.into());
    let ok = match (&x_d, &y_d) {
        (Term::Scalar(crate::term::Scalar::Int(a)), Term::Scalar(crate::term::Scalar::Int(b))) => a < b,
        (Term::Scalar(crate::term::Scalar::Float(a)), Term::Scalar(crate::term::Scalar::Float(b))) => a < b,
        _ => false,
    };
    if ok {
        succeed()
    } else {
        fail()
    }
}

/// `not_in(var, value)`: deliberately incomplete. When `var` is still
/// unbound it has no domain to restrict against, so it passes through and
/// trusts whatever later binds `var` — via `member`, `unify`, or similar —
/// to avoid `value` on its own; only once `var` is already bound does this
/// actually check anything. A sound constraint layer would need to delay
/// until `var` is bound or narrow its domain instead; that's a real
/// constraint-propagation system, which this crate does not attempt.
pub fn not_in(var: impl Into<Term>, value: impl Into<Term>) -> Solutions<'static> {
    let var_d = deref(&var.into());
    if matches!(var_d, Term::Var(_)) {
        return succeed();
    }
    not_unifiable(var_d, deref(&value.into()))
}

/// `findall(template, goal, result)`: runs `goal` to exhaustion, snapshotting
/// `template` (dereferenced) at every success, then unifies `result` with
/// the collected sequence. `goal`'s own bindings are undone as it drops,
/// same as any other fully-consumed producer; the snapshots are plain
/// owned `Term`s and are unaffected by that undo.
pub fn findall(template: impl Into<Term>, goal: Solutions<'static>, result: impl Into<Term>) -> Solutions<'static> {
    struct FindAll {
        state: Option<(Term, Solutions<'static>, Term)>,
        // The live `result`-binding producer, held open for as long as this
        // `FindAll` itself is. `unify(..)` only undoes its own bind when its
        // `Solutions` is dropped or pulled again — discarding it right after
        // `.next()` (as a bare expression statement would) undoes the bind
        // before a caller ever gets to observe it.
        bound: Option<Solutions<'static>>,
    }

    impl Iterator for FindAll {
        type Item = ();

        fn next(&mut self) -> Option<()> {
            if self.bound.is_some() {
                // Second pull: nothing further to give. Dropping `bound`
                // here undoes the one binding `findall` made.
                self.bound = None;
                return None;
            }
            let (template, mut goal, result) = self.state.take()?;
            let mut collected = Vec::new();
            while goal.next().is_some() {
                collected.push(deref(&template));
            }
            drop(goal);
            let mut bind = unify(result, Term::seq(collected));
            if bind.next().is_some() {
                self.bound = Some(bind);
                Some(())
            } else {
                None
            }
        }
    }

    Box::new(FindAll { state: Some((template.into(), goal, result.into())), bound: None })
}
