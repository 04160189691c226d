//! Family-tree relations built on top of `member`/`AND`/`different`,
//! re-expressed from `examples/original_source/examples/family_tree.py`.

use backtrack::{different, member, run_all, Goal, Scalar, Term, Var, AND};

fn parent_facts() -> Vec<Term> {
    [
        ("abraham", "homer"),
        ("abraham", "herb"),
        ("mona", "homer"),
        ("homer", "bart"),
        ("homer", "lisa"),
        ("homer", "maggie"),
        ("marge", "bart"),
        ("marge", "lisa"),
        ("marge", "maggie"),
    ]
    .iter()
    .map(|(p, c)| Term::tuple([Term::symbol(p), Term::symbol(c)]))
    .collect()
}

fn parent_goal(parent: Term, child: Term) -> backtrack::Solutions<'static> {
    member(Term::tuple([parent, child]), parent_facts())
}

fn symbol_name(t: &Term) -> String {
    match t {
        Term::Scalar(Scalar::Symbol(s)) => backtrack::resolve(*s),
        other => panic!("expected a symbol, got {other:?}"),
    }
}

#[test]
fn parent_of_bart_has_two_answers() {
    let x = Var::named("X");
    let sols = run_all(parent_goal(Term::Var(x.clone()), Term::symbol("bart")), &[("X", x)]);
    let mut names: Vec<String> = sols.iter().map(|s| symbol_name(s.get("X").unwrap())).collect();
    names.sort();
    assert_eq!(names, vec!["homer", "marge"]);
}

#[test]
fn grandparent_of_bart_via_homer() {
    let x = Var::named("X");
    let y = Var::named("Y");
    let goal = AND(vec![
        Goal::thunk({
            let x = x.clone();
            let y = y.clone();
            move || parent_goal(Term::Var(x.clone()), Term::Var(y.clone()))
        }),
        Goal::thunk({
            let y = y.clone();
            move || parent_goal(Term::Var(y.clone()), Term::symbol("bart"))
        }),
    ]);
    let sols = run_all(goal, &[("X", x)]);
    let mut names: Vec<String> = sols.iter().map(|s| symbol_name(s.get("X").unwrap())).collect();
    names.sort();
    assert_eq!(names, vec!["abraham", "mona"]);
}

#[test]
fn siblings_share_a_parent_and_are_distinct() {
    let x = Var::named("X");
    let y = Var::named("Y");
    let p = Var::named("P");
    let goal = AND(vec![
        Goal::thunk({
            let p = p.clone();
            let x = x.clone();
            move || parent_goal(Term::Var(p.clone()), Term::Var(x.clone()))
        }),
        Goal::thunk({
            let p = p.clone();
            let y = y.clone();
            move || parent_goal(Term::Var(p.clone()), Term::Var(y.clone()))
        }),
        Goal::thunk({
            let x = x.clone();
            let y = y.clone();
            move || different(Term::Var(x.clone()), Term::Var(y.clone()))
        }),
    ]);
    let sols = run_all(goal, &[("X", x), ("Y", y)]);
    assert!(sols.iter().all(|s| s.get("X").unwrap().display() != s.get("Y").unwrap().display()));
    // bart has two parents (homer, marge), each contributing 3 children
    // excluding bart itself: (lisa, maggie) under each parent, X ranging
    // over homer's three children and marge's three children.
    assert!(sols.len() >= 4);
}
