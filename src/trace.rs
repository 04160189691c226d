//! Diagnostic tracing: a process-global on/off switch, deliberately not
//! task-local like the commit flag in [`crate::store`] — tracing is meant to
//! observe every task in the process, not be scoped to one search branch.
//!
//! No `log`/`tracing` dependency here: elsewhere in the workspace, modules
//! such as the lexer and discovery pass print their own diagnostics
//! straight to stderr via `eprintln!` rather than going through a logging
//! facade, and this module follows that lead. (The language-server crate
//! elsewhere in the same workspace does depend on `log` and `env_logger` —
//! that crate talks to an editor over a structured protocol and needs a
//! real logging story; a standalone search engine printing trace lines to
//! stderr doesn't.)

use crate::combinators::Solutions;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

static TRACE_ENABLED: AtomicBool = AtomicBool::new(false);
static DEPTH: AtomicUsize = AtomicUsize::new(0);

pub fn trace_on() {
    TRACE_ENABLED.store(true, Ordering::Relaxed);
}

pub fn trace_off() {
    TRACE_ENABLED.store(false, Ordering::Relaxed);
}

fn enabled() -> bool {
    TRACE_ENABLED.load(Ordering::Relaxed)
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// `traced(name, goal)`: wraps `goal` so that, whenever tracing is on,
/// entry, each success, and exit are printed with the current nesting
/// depth. When tracing is off this is a transparent pass-through with no
/// extra bookkeeping cost beyond the flag check.
pub fn traced<'g>(name: impl Into<String>, goal: Solutions<'g>) -> Solutions<'g> {
    struct Traced<'g> {
        name: String,
        inner: Solutions<'g>,
        entered: bool,
    }

    impl<'g> Iterator for Traced<'g> {
        type Item = ();

        fn next(&mut self) -> Option<()> {
            if !enabled() {
                return self.inner.next();
            }
            if !self.entered {
                self.entered = true;
                eprintln!("{}-> {}", indent(DEPTH.load(Ordering::Relaxed)), self.name);
                DEPTH.fetch_add(1, Ordering::Relaxed);
            }
            match self.inner.next() {
                Some(()) => {
                    eprintln!("{}{} succeeded", indent(DEPTH.load(Ordering::Relaxed)), self.name);
                    Some(())
                }
                None => None,
            }
        }
    }

    impl<'g> Drop for Traced<'g> {
        fn drop(&mut self) {
            if self.entered && enabled() {
                DEPTH.fetch_sub(1, Ordering::Relaxed);
                eprintln!("{}<- {}", indent(DEPTH.load(Ordering::Relaxed)), self.name);
            }
        }
    }

    Box::new(Traced { name: name.into(), inner: goal, entered: false })
}
