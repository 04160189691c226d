//! `backtrack`: Prolog-style logic programming — logic variables,
//! unification with trail-based undo, and lazy AND/OR/ONCE combinators over
//! streams of successes.
//!
//! A goal is any `Iterator<Item = ()>`: each item is a success signal, and
//! observers read out the bindings a success implies by dereferencing the
//! [`Var`]s they care about. [`query::run`]/[`query::run_one`]/
//! [`query::run_all`] turn that raw stream into [`query::Solution`]
//! snapshots; [`query::once`] commits the first success's bindings instead
//! of leaving them undoable.
//!
//! ```
//! use backtrack::{unify, run_all, Var};
//!
//! let x = Var::named("X");
//! let solutions = run_all(unify(x.clone(), 5i64), &[("X", x)]);
//! assert_eq!(solutions.len(), 1);
//! ```

mod combinators;
mod error;
mod predicates;
mod query;
mod store;
mod term;
mod trace;
mod unify;

pub use combinators::{
    different, eq, fail, not_unifiable, succeed, Goal, Solutions, AND, ONCE, OR,
};
pub use error::SolutionError;
pub use predicates::{
    append, between, findall, last, length, less_than, member, not_in, nth, plus, reverse, succ, times,
};
pub use query::{once, run, run_all, run_one, Solution};
pub use store::Var;
pub use term::{intern, resolve, Scalar, Symbol, Term};
pub use trace::{trace_off, trace_on, traced};
pub use unify::{deref, unify, unify_all};
