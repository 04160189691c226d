//! Usage faults.
//!
//! ## Error categories
//!
//! | Category | Representation | Example |
//! |---|---|---|
//! | Logical failure | no success from a `Solutions` iterator | `unify(1, 2)` yields nothing |
//! | Usage fault | [`SolutionError`] | reading a name out of a [`crate::query::Solution`] that was never bound |
//!
//! A goal failing to unify is not an error — it is the ordinary, expected
//! outcome of a search branch not panning out, and is represented by the
//! absence of an item from an iterator, never by `Result::Err`. The only
//! real error surface in this engine is the caller asking a `Solution` for
//! a name it does not carry.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolutionError {
    /// A name was requested from a [`crate::query::Solution`] that the
    /// query's variable list never registered.
    MissingBinding(String),
}

impl fmt::Display for SolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionError::MissingBinding(name) => {
                write!(f, "solution has no binding named {name:?}")
            }
        }
    }
}

impl std::error::Error for SolutionError {}
