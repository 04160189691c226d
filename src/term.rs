//! The term model: the values that may appear as unification arguments.
//!
//! A [`Term`] is one of five shapes: an opaque [`Scalar`], an ordered
//! [`Term::Sequence`], a fixed-arity [`Term::Tuple`], a keyed [`Term::Record`],
//! or a [`Var`](crate::store::Var) — the only mutable constructor. Everything
//! else is an immutable value compared structurally once dereferenced.

use crate::store::Var;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A lightweight handle to an interned string.
///
/// Symbols are `Copy` and compare in O(1) time regardless of string length,
/// the same trade made by every string-keyed atom in this engine's family
/// tree and scheduling examples (`'abraham'`, `'homer'`, task names, ...).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Symbol(u32);

thread_local! {
    static SYMBOLS: RefCell<Interner> = RefCell::new(Interner::new());
}

/// Interns `s` in the task-local symbol table and returns its handle.
pub fn intern(s: &str) -> Symbol {
    SYMBOLS.with(|t| t.borrow_mut().intern(s))
}

/// Resolves a symbol back to its string, using the task-local symbol table.
pub fn resolve(sym: Symbol) -> String {
    SYMBOLS.with(|t| t.borrow().resolve(sym).to_string())
}

struct Interner {
    map: HashMap<String, Symbol>,
    vec: Vec<String>,
}

impl Interner {
    fn new() -> Self {
        Interner { map: HashMap::new(), vec: Vec::new() }
    }

    fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.map.get(s) {
            return sym;
        }
        let sym = Symbol(self.vec.len() as u32);
        self.vec.push(s.to_string());
        self.map.insert(s.to_string(), sym);
        sym
    }

    fn resolve(&self, sym: Symbol) -> &str {
        &self.vec[sym.0 as usize]
    }
}

/// An opaque host value comparable by value equality.
///
/// `Int`, `Float`, and `Bool` are distinct and never cross-unify with each
/// other — `0` never unifies with `false`, `1` never unifies with `1.0` (see
/// the unifier's edge cases). This is stricter than necessary but leaves no
/// ambiguity about which numeric types a predicate author can rely on.
#[derive(Clone, Debug)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Rc<str>),
    Symbol(Symbol),
}

impl Scalar {
    pub fn symbol(name: &str) -> Scalar {
        Scalar::Symbol(intern(name))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(n) => write!(f, "{n}"),
            Scalar::Float(n) => write!(f, "{n}"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Str(s) => write!(f, "{s:?}"),
            Scalar::Symbol(s) => write!(f, "{}", resolve(*s)),
        }
    }
}

/// Strict host equality: distinguishes numeric types from booleans and from
/// each other. See the unifier's edge cases in the unification dispatch
/// table.
pub(crate) fn scalar_eq(a: &Scalar, b: &Scalar) -> bool {
    match (a, b) {
        (Scalar::Int(x), Scalar::Int(y)) => x == y,
        (Scalar::Float(x), Scalar::Float(y)) => x == y,
        (Scalar::Bool(x), Scalar::Bool(y)) => x == y,
        (Scalar::Str(x), Scalar::Str(y)) => x == y,
        (Scalar::Symbol(x), Scalar::Symbol(y)) => x == y,
        _ => false,
    }
}

/// A value that may appear as a unification argument: a scalar, an ordered
/// sequence, a fixed-arity tuple, a keyed record, or a logic variable.
#[derive(Clone)]
pub enum Term {
    Scalar(Scalar),
    Sequence(Vec<Term>),
    Tuple(Vec<Term>),
    /// A mapping from scalar keys to terms. Stored as an association list
    /// rather than a `HashMap` because record pattern unification only ever
    /// does a handful of small linear lookups, and `Scalar` floats have no
    /// `Hash` impl worth writing for that.
    Record(Vec<(Scalar, Term)>),
    Var(Var),
}

impl Term {
    pub fn int(n: i64) -> Term {
        Term::Scalar(Scalar::Int(n))
    }

    pub fn float(n: f64) -> Term {
        Term::Scalar(Scalar::Float(n))
    }

    pub fn bool(b: bool) -> Term {
        Term::Scalar(Scalar::Bool(b))
    }

    pub fn str(s: impl Into<Rc<str>>) -> Term {
        Term::Scalar(Scalar::Str(s.into()))
    }

    pub fn symbol(name: &str) -> Term {
        Term::Scalar(Scalar::symbol(name))
    }

    pub fn seq(items: impl IntoIterator<Item = Term>) -> Term {
        Term::Sequence(items.into_iter().collect())
    }

    pub fn tuple(items: impl IntoIterator<Item = Term>) -> Term {
        Term::Tuple(items.into_iter().collect())
    }

    pub fn record(fields: impl IntoIterator<Item = (Scalar, Term)>) -> Term {
        Term::Record(fields.into_iter().collect())
    }

    /// Renders the term's *current* shape (bound Vars shown as their
    /// dereferenced value) for diagnostics. Does not itself dereference —
    /// callers that want the canonical view should call
    /// [`crate::unify::deref`] first.
    pub fn display(&self) -> String {
        match self {
            Term::Scalar(s) => s.to_string(),
            Term::Sequence(items) => {
                let parts: Vec<String> = items.iter().map(Term::display).collect();
                format!("[{}]", parts.join(", "))
            }
            Term::Tuple(items) => {
                let parts: Vec<String> = items.iter().map(Term::display).collect();
                format!("({})", parts.join(", "))
            }
            Term::Record(fields) => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v.display()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
            Term::Var(v) => v.display(),
        }
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<i64> for Term {
    fn from(n: i64) -> Term {
        Term::int(n)
    }
}

impl From<f64> for Term {
    fn from(n: f64) -> Term {
        Term::float(n)
    }
}

impl From<bool> for Term {
    fn from(b: bool) -> Term {
        Term::bool(b)
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Term {
        Term::str(s)
    }
}

impl From<Var> for Term {
    fn from(v: Var) -> Term {
        Term::Var(v)
    }
}

impl From<Vec<Term>> for Term {
    fn from(items: Vec<Term>) -> Term {
        Term::Sequence(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_string_yields_same_symbol() {
        let a = intern("homer");
        let b = intern("homer");
        assert_eq!(a, b);
    }

    #[test]
    fn interning_different_strings_yields_different_symbols() {
        let a = intern("abraham_term_test");
        let b = intern("mona_term_test");
        assert_ne!(a, b);
    }

    #[test]
    fn scalar_eq_distinguishes_bool_from_int() {
        assert!(!scalar_eq(&Scalar::Bool(false), &Scalar::Int(0)));
        assert!(!scalar_eq(&Scalar::Bool(true), &Scalar::Int(1)));
    }

    #[test]
    fn scalar_eq_distinguishes_int_from_float() {
        assert!(!scalar_eq(&Scalar::Int(1), &Scalar::Float(1.0)));
    }

    #[test]
    fn scalar_eq_same_type_same_value() {
        assert!(scalar_eq(&Scalar::Int(7), &Scalar::Int(7)));
        assert!(scalar_eq(&Scalar::Str("x".into()), &Scalar::Str("x".into())));
    }
}
