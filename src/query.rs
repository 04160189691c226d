//! The query driver: turns a goal's raw success signals into [`Solution`]
//! snapshots of the variables the caller asked to observe.
//!
//! A `Solution` plays the same role here as an immutable snapshot taken at
//! the moment a proof completes plays in a proof-tree engine — except the
//! thing being snapshotted is a set of variable bindings instead of
//! inference steps.

use crate::combinators::Solutions;
use crate::error::SolutionError;
use crate::store::{set_commit, Var};
use crate::term::Term;
use crate::unify::deref;

/// An immutable snapshot of a set of named variables' bindings, taken at
/// the instant a goal succeeded — strictly before the driver asks the goal
/// for its next success, so a later backtrack can never retroactively
/// change a `Solution` already handed to the caller.
#[derive(Debug, Clone)]
pub struct Solution {
    bindings: Vec<(String, Term)>,
}

impl Solution {
    /// Looks up `name`'s dereferenced binding at snapshot time.
    pub fn get(&self, name: &str) -> Result<&Term, SolutionError> {
        self.bindings
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
            .ok_or_else(|| SolutionError::MissingBinding(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.bindings.iter().map(|(n, t)| (n.as_str(), t))
    }
}

fn snapshot(vars: &[(String, Var)]) -> Solution {
    let bindings = vars.iter().map(|(name, v)| (name.clone(), deref(&Term::Var(v.clone())))).collect();
    Solution { bindings }
}

struct Run<'g> {
    goal: Solutions<'g>,
    vars: Vec<(String, Var)>,
}

impl<'g> Iterator for Run<'g> {
    type Item = Solution;

    fn next(&mut self) -> Option<Solution> {
        self.goal.next().map(|()| snapshot(&self.vars))
    }
}

fn to_vars(vars: &[(&str, Var)]) -> Vec<(String, Var)> {
    vars.iter().map(|(n, v)| (n.to_string(), v.clone())).collect()
}

/// `run(goal, vars)`: the full lazy stream of [`Solution`]s, one per success
/// of `goal`, snapshotting exactly the names in `vars`.
pub fn run<'g>(goal: Solutions<'g>, vars: &[(&str, Var)]) -> impl Iterator<Item = Solution> + 'g {
    Run { goal, vars: to_vars(vars) }
}

/// `run_one(goal, vars)`: the first `Solution`, if any, and nothing beyond
/// it — equivalent to `run(goal, vars).next()`, except the goal and every
/// binding it made past the first success are dropped (and undone)
/// immediately rather than kept alive for a caller who already stopped
/// asking.
pub fn run_one(goal: Solutions<'_>, vars: &[(&str, Var)]) -> Option<Solution> {
    run(goal, vars).next()
}

/// `run_all(goal, vars)`: eagerly drains every success into a `Vec`.
pub fn run_all(goal: Solutions<'_>, vars: &[(&str, Var)]) -> Vec<Solution> {
    run(goal, vars).collect()
}

/// `once(make_goal, vars)`: the commit-mode driver. Enters commit mode
/// before constructing or pulling `goal`, so every binding it makes on the
/// way to its first success is installed without being recorded on the
/// trail — when `goal` is dropped at the end of this call, there is nothing
/// on the trail for that drop to undo, and the bindings persist exactly as
/// commit mode promises.
pub fn once<'g>(make_goal: impl FnOnce() -> Solutions<'g>, vars: &[(&str, Var)]) -> Option<Solution> {
    set_commit(true);
    let mut goal = make_goal();
    let first = goal.next();
    let result = first.map(|()| snapshot(&to_vars(vars)));
    drop(goal);
    set_commit(false);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinators::AND;
    use crate::predicates::member;
    use crate::unify::unify;

    #[test]
    fn run_all_collects_every_success() {
        let x = Var::named("X");
        let sols = run_all(member(Term::Var(x.clone()), vec![Term::int(1), Term::int(2), Term::int(3)]), &[("X", x)]);
        assert_eq!(sols.len(), 3);
        assert!(matches!(sols[0].get("X").unwrap(), Term::Scalar(crate::term::Scalar::Int(1))));
    }

    #[test]
    fn run_one_stops_at_first_success() {
        let x = Var::named("X");
        let sol = run_one(member(Term::Var(x.clone()), vec![Term::int(7), Term::int(8)]), &[("X", x)]);
        assert!(sol.is_some());
        assert!(matches!(sol.unwrap().get("X").unwrap(), Term::Scalar(crate::term::Scalar::Int(7))));
    }

    #[test]
    fn solution_get_of_unknown_name_errors() {
        let x = Var::named("X");
        let sol = run_one(unify(Term::Var(x.clone()), Term::int(1)), &[("X", x)]).unwrap();
        assert!(sol.get("Y").is_err());
    }

    #[test]
    fn once_persists_bindings_past_the_call() {
        let x = Var::named("X");
        let result = once(
            {
                let x = x.clone();
                move || unify(Term::Var(x.clone()), Term::int(42))
            },
            &[("X", x.clone())],
        );
        assert!(result.is_some());
        assert!(x.is_bound());
        assert!(matches!(deref(&Term::Var(x)), Term::Scalar(crate::term::Scalar::Int(42))));
    }

    #[test]
    fn once_on_composed_goal_commits_every_binding() {
        let x = Var::named("X");
        let y = Var::named("Y");
        let result = once(
            {
                let x = x.clone();
                let y = y.clone();
                move || {
                    AND(vec![
                        crate::combinators::Goal::thunk({
                            let x = x.clone();
                            move || unify(Term::Var(x.clone()), Term::int(1))
                        }),
                        crate::combinators::Goal::thunk({
                            let y = y.clone();
                            move || unify(Term::Var(y.clone()), Term::int(2))
                        }),
                    ])
                }
            },
            &[("X", x.clone()), ("Y", y.clone())],
        );
        assert!(result.is_some());
        assert!(x.is_bound() && y.is_bound());
    }
}
