//! The binding store and the backtracking trail.
//!
//! A [`Var`] is a shared, mutable, identity-bearing cell: its identity is by
//! object identity, never by name. The trail is the explicit record of
//! which Vars were bound and in what order, so a search branch can be undone
//! by walking it backwards.

use crate::term::Term;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_VAR_ID: AtomicU64 = AtomicU64::new(0);

struct VarInner {
    id: u64,
    name: Option<Box<str>>,
    binding: RefCell<Option<Term>>,
}

/// A logic variable: a mutable placeholder with identity, optionally bound
/// within the current search branch.
///
/// Cloning a `Var` clones the handle, not the variable — two clones refer to
/// the same binding slot, which is what makes `Var` usable as a `HashMap`
/// key and what makes self-unification detectable by identity.
#[derive(Clone)]
pub struct Var(Rc<VarInner>);

impl Var {
    /// Constructs a fresh, unbound variable with no display name.
    pub fn new() -> Var {
        Var::named_opt(None)
    }

    /// Constructs a fresh, unbound variable with the given display name.
    /// The name is cosmetic only (I4); it plays no part in equality.
    pub fn named(name: impl Into<String>) -> Var {
        Var::named_opt(Some(name.into()))
    }

    fn named_opt(name: Option<String>) -> Var {
        let id = NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed);
        Var(Rc::new(VarInner {
            id,
            name: name.map(|s| s.into_boxed_str()),
            binding: RefCell::new(None),
        }))
    }

    pub fn id(&self) -> u64 {
        self.0.id
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// Returns `true` if both handles refer to the same variable.
    pub fn ptr_eq(a: &Var, b: &Var) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// The variable's current binding, if any. Does not follow chains —
    /// callers that want the canonical term should use
    /// [`crate::unify::deref`].
    pub fn get(&self) -> Option<Term> {
        self.0.binding.borrow().clone()
    }

    pub(crate) fn set(&self, t: Option<Term>) {
        *self.0.binding.borrow_mut() = t;
    }

    pub fn is_bound(&self) -> bool {
        self.0.binding.borrow().is_some()
    }

    pub fn display(&self) -> String {
        match self.name() {
            Some(name) => format!("{name}#{}", self.id()),
            None => format!("_#{}", self.id()),
        }
    }
}

impl Default for Var {
    fn default() -> Self {
        Var::new()
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        Var::ptr_eq(self, other)
    }
}

impl Eq for Var {}

impl std::hash::Hash for Var {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

thread_local! {
    /// The trail: every Var bound since the task began, in bind order.
    /// Undoing pops from the back, which is always the most recently
    /// installed binding — exactly the LIFO discipline backtracking needs.
    static TRAIL: RefCell<Vec<Var>> = RefCell::new(Vec::new());
    /// Suppresses trail recording while `true`. Task-local rather than
    /// process-global, since a process-global flag would let commit mode in
    /// one concurrent search leak into an unrelated one.
    static COMMIT: Cell<bool> = Cell::new(false);
}

/// Returns the current trail length, to be passed to [`undo_to`] later.
pub(crate) fn trail_mark() -> usize {
    TRAIL.with(|t| t.borrow().len())
}

/// Unwinds every binding installed since `mark`, in reverse order.
///
/// Idempotent: calling it again with a mark at or below the current trail
/// length is a no-op. Every lazy producer in this crate calls this both when
/// it is asked for a success it cannot give, and unconditionally when
/// dropped, so cancellation (closing a solution stream early) restores the
/// store exactly as cleanly as normal exhaustion does.
pub(crate) fn undo_to(mark: usize) {
    TRAIL.with(|t| {
        let mut trail = t.borrow_mut();
        while trail.len() > mark {
            if let Some(v) = trail.pop() {
                v.set(None);
            }
        }
    });
}

/// Binds `v` to `t`. Records the bind on the trail unless commit mode is
/// active, in which case the binding is installed but never undone — this
/// single guard is the entire implementation of commit mode: every
/// `undo_to` call downstream of a commit-mode bind finds nothing to pop for
/// it.
pub(crate) fn bind(v: &Var, t: Term) {
    v.set(Some(t));
    if !COMMIT.with(|c| c.get()) {
        TRAIL.with(|trail| trail.borrow_mut().push(v.clone()));
    }
}

/// Enters or leaves commit mode for the current task.
pub(crate) fn set_commit(active: bool) {
    COMMIT.with(|c| c.set(active));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_vars_are_unbound() {
        let v = Var::new();
        assert!(!v.is_bound());
        assert!(v.get().is_none());
    }

    #[test]
    fn clones_share_identity() {
        let v = Var::named("X");
        let w = v.clone();
        assert!(Var::ptr_eq(&v, &w));
        assert_eq!(v, w);
    }

    #[test]
    fn distinct_vars_are_not_equal() {
        let a = Var::new();
        let b = Var::new();
        assert_ne!(a, b);
    }

    #[test]
    fn undo_to_restores_bindings() {
        let v = Var::new();
        let mark = trail_mark();
        bind(&v, Term::int(5));
        assert!(v.is_bound());
        undo_to(mark);
        assert!(!v.is_bound());
    }

    #[test]
    fn undo_to_is_idempotent() {
        let v = Var::new();
        let mark = trail_mark();
        bind(&v, Term::int(5));
        undo_to(mark);
        undo_to(mark);
        assert!(!v.is_bound());
    }

    #[test]
    fn commit_mode_suppresses_trail_recording() {
        let v = Var::new();
        let mark = trail_mark();
        set_commit(true);
        bind(&v, Term::int(9));
        set_commit(false);
        assert_eq!(trail_mark(), mark);
        undo_to(mark);
        assert!(v.is_bound());
        assert!(matches!(v.get(), Some(Term::Scalar(_))));
    }
}
