//! Conjunction, disjunction, commit, and negation-as-failure, plus the
//! `Goal` polymorphism — a tagged variant with two cases — that lets every
//! combinator accept either an already-constructed producer or a nullary
//! constructor to be forced lazily.

use crate::store::{trail_mark, undo_to};
use crate::term::Term;
use crate::unify;

/// A lazy sequence of successes. A success carries no value — it is a
/// signal that the binding store currently satisfies the goal; observers
/// inspect bindings by dereferencing Vars between elements.
pub type Solutions<'g> = Box<dyn Iterator<Item = ()> + 'g>;

/// A goal is polymorphic over two shapes:
///
/// - [`Goal::Ready`] — a producer that has already been constructed. Only
///   ever started once over the combinator's lifetime (in practice: the
///   leftmost goal of an `AND`, which is pushed once and then advanced
///   in place — never rebuilt — for the rest of the search).
/// - [`Goal::Thunk`] — a nullary constructor, forced at the moment the goal
///   is first needed. Required whenever a position may be re-entered after
///   an earlier goal backtracks into a new success, since its producer must
///   see the *current* bindings, not the bindings at the moment `AND` was
///   built — and since a `Ready` producer, once exhausted, has no way to
///   hand back a second, independent run.
pub enum Goal<'g> {
    Ready(Solutions<'g>),
    Thunk(Box<dyn Fn() -> Solutions<'g> + 'g>),
}

impl<'g> Goal<'g> {
    pub fn thunk(f: impl Fn() -> Solutions<'g> + 'g) -> Goal<'g> {
        Goal::Thunk(Box::new(f))
    }

    /// Starts (or re-starts) the goal, producing a fresh `Solutions`.
    ///
    /// A `Ready` goal can only genuinely start once: it wraps a producer
    /// that has already been constructed, and there is no constructor left
    /// to call again once that producer is taken. Asking for a second start
    /// is a usage fault (spec §7: "passing a goal that is neither a lazy
    /// producer nor a nullary constructor") rather than a silent wrong
    /// answer — a goal placed where it may be re-entered must be supplied as
    /// [`Goal::thunk`], not via `.into()`/[`Goal::Ready`]. `AND`/`OR` only
    /// ever call `start()` a second time on a position that backtracking
    /// revisits, so this can only fire on a position that needed a `Thunk`
    /// and didn't get one.
    fn start(&mut self) -> Solutions<'g> {
        match self {
            Goal::Thunk(f) => f(),
            Goal::Ready(_) => {
                let taken = std::mem::replace(self, Goal::Thunk(Box::new(restarted_ready_goal)));
                match taken {
                    Goal::Ready(s) => s,
                    Goal::Thunk(_) => unreachable!(),
                }
            }
        }
    }
}

fn restarted_ready_goal<'g>() -> Solutions<'g> {
    panic!(
        "Goal::Ready restarted: a goal that may be re-entered after backtracking must be \
         constructed with Goal::thunk(..), not .into()/Goal::Ready — this position was \
         re-entered after already yielding its one Ready producer"
    )
}

impl<'g> From<Solutions<'g>> for Goal<'g> {
    fn from(s: Solutions<'g>) -> Goal<'g> {
        Goal::Ready(s)
    }
}

/// `succeed`: the identity goal. Yields exactly one success, no bindings.
pub fn succeed() -> Solutions<'static> {
    Box::new(std::iter::once(()))
}

/// `fail`: the empty goal. Yields no success.
pub fn fail() -> Solutions<'static> {
    Box::new(std::iter::empty())
}

/// `eq`: an alias for [`unify::unify`] — `succeed`, `fail`, and `eq` are the
/// identity, empty, and alias goals.
pub fn eq(a: impl Into<Term>, b: impl Into<Term>) -> Solutions<'static> {
    unify::unify(a, b)
}

/// The conjunctive state machine, implemented as a hand-rolled iterator
/// holding one entered producer per currently-active goal position, plus
/// the trail mark to restore to when that position backtracks.
struct And<'g> {
    goals: Vec<Goal<'g>>,
    frames: Vec<Solutions<'g>>,
    marks: Vec<usize>,
    empty_done: bool,
}

impl<'g> And<'g> {
    fn new(goals: Vec<Goal<'g>>) -> And<'g> {
        And { goals, frames: Vec::new(), marks: Vec::new(), empty_done: false }
    }

    /// Advances the deepest active frame. Returns `true` once some frame
    /// (possibly a shallower one, after cascading through exhausted
    /// frames) yields a fresh success; `false` once every frame has been
    /// exhausted and popped.
    fn retreat(&mut self) -> bool {
        loop {
            let mark = match self.marks.last() {
                Some(&m) => m,
                None => return false,
            };
            match self.frames.last_mut().unwrap().next() {
                Some(()) => return true,
                None => {
                    self.frames.pop();
                    self.marks.pop();
                    undo_to(mark);
                }
            }
        }
    }
}

impl<'g> Iterator for And<'g> {
    type Item = ();

    fn next(&mut self) -> Option<()> {
        if self.goals.is_empty() {
            // Empty AND yields exactly one success.
            if self.empty_done {
                return None;
            }
            self.empty_done = true;
            return Some(());
        }
        if self.frames.len() == self.goals.len() {
            // We previously completed all positions; back off the deepest
            // one before searching for the next overall success.
            if !self.retreat() {
                return None;
            }
        }
        loop {
            if self.frames.len() == self.goals.len() {
                return Some(());
            }
            let idx = self.frames.len();
            let mark = trail_mark();
            let mut producer = self.goals[idx].start();
            if producer.next().is_some() {
                self.frames.push(producer);
                self.marks.push(mark);
            } else {
                drop(producer);
                undo_to(mark);
                if !self.retreat() {
                    return None;
                }
            }
        }
    }
}

/// `AND(goals)`: conjunction. `#[allow(non_snake_case)]` because this name
/// is part of the crate's public contract rather than incidental casing.
#[allow(non_snake_case)]
pub fn AND<'g>(goals: Vec<Goal<'g>>) -> Solutions<'g> {
    Box::new(And::new(goals))
}

/// The disjunctive search: tries every success of each goal in turn,
/// undoing a branch's bindings before trying the next.
struct Or<'g> {
    goals: std::vec::IntoIter<Goal<'g>>,
    current: Option<Solutions<'g>>,
    mark: usize,
}

impl<'g> Iterator for Or<'g> {
    type Item = ();

    fn next(&mut self) -> Option<()> {
        loop {
            if let Some(current) = self.current.as_mut() {
                if let Some(()) = current.next() {
                    return Some(());
                }
                self.current = None;
                undo_to(self.mark);
            }
            match self.goals.next() {
                Some(mut g) => {
                    self.mark = trail_mark();
                    self.current = Some(g.start());
                }
                None => return None,
            }
        }
    }
}

/// `OR(goals)`: disjunction.
#[allow(non_snake_case)]
pub fn OR<'g>(goals: Vec<Goal<'g>>) -> Solutions<'g> {
    Box::new(Or { goals: goals.into_iter(), current: None, mark: 0 })
}

/// `ONCE(goal)`: yields at most the first success of `goal`, then ends.
/// This is *not* commit mode (see [`crate::query::once`] for that) — the
/// underlying producer is simply never asked for a second success, and its
/// own trail bookkeeping restores normally whenever it is eventually
/// dropped.
#[allow(non_snake_case)]
pub fn ONCE<'g>(goal: Goal<'g>) -> Solutions<'g> {
    struct Once<'g> {
        inner: Solutions<'g>,
        started: bool,
    }

    impl<'g> Iterator for Once<'g> {
        type Item = ();

        fn next(&mut self) -> Option<()> {
            if self.started {
                return None;
            }
            self.started = true;
            self.inner.next()
        }
    }

    let mut goal = goal;
    Box::new(Once { inner: goal.start(), started: false })
}

/// `not_unifiable(a, b)`: negation-as-failure. Yields one success iff
/// `unify(a, b)` produces none; leaks no bindings either way, by always
/// undoing the probe before deciding.
pub fn not_unifiable(a: impl Into<Term>, b: impl Into<Term>) -> Solutions<'static> {
    struct NotUnifiable {
        pair: Option<(Term, Term)>,
    }

    impl Iterator for NotUnifiable {
        type Item = ();

        fn next(&mut self) -> Option<()> {
            let (a, b) = self.pair.take()?;
            let mark = trail_mark();
            let unifies = unify::unify(a, b).next().is_some();
            undo_to(mark);
            if unifies {
                None
            } else {
                Some(())
            }
        }
    }

    Box::new(NotUnifiable { pair: Some((a.into(), b.into())) })
}

/// `different(a, b)`: alias for [`not_unifiable`].
pub fn different(a: impl Into<Term>, b: impl Into<Term>) -> Solutions<'static> {
    not_unifiable(a, b)
}
