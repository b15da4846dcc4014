//! Integration tests: concrete domain scenarios and whole-program analysis.

use bricks_rs::*;
use test_log::test;

fn lit(s: &str) -> StrExpr<String> {
    StrExpr::literal(s)
}

fn var(name: &str) -> StrExpr<String> {
    StrExpr::var(name)
}

#[test]
fn test_lub_of_literals_is_one_brick() {
    let joined = Bricks::literal("ab").lub(&Bricks::literal("cd"));
    assert_eq!(joined, Bricks::new(vec![Brick::of(["ab", "cd"], 1, 1)]));
}

#[test]
fn test_concat_of_literals_merges() {
    let joined = Bricks::literal("a").concat(&Bricks::literal("b"));
    assert_eq!(joined.bricks(), &[Brick::of(["ab"], 1, 1)]);
}

#[test]
fn test_contains_guaranteed_brick() {
    let animals = Bricks::new(vec![Brick::of(["cat", "cow"], 1, 1)]);
    assert_eq!(animals.contains(&Bricks::literal("c")), Satisfiability::Satisfied);
}

#[test]
fn test_contains_optional_brick() {
    let maybe_cat = Bricks::new(vec![Brick::of(["cat"], 0, 1)]);
    assert_eq!(maybe_cat.contains(&Bricks::literal("x")), Satisfiability::NotSatisfied);
}

#[test]
fn test_widening_past_string_limit_is_top() {
    let thresholds = Thresholds::default();
    let many: Vec<String> = (0..=thresholds.max_strings).map(|i| format!("s{}", i)).collect();
    let small = Brick::of(["a"], 0, 0);
    let large = Brick::of(many, 0, 0);

    assert!(small.widening(&large, &thresholds).unwrap().is_top());
}

#[test]
fn test_substring_of_literal() {
    let hello = Bricks::new(vec![Brick::of(["hello"], 1, 1)]);
    assert_eq!(hello.substring(1, 3), Bricks::new(vec![Brick::of(["el"], 1, 1)]));
}

#[test]
fn test_representation() {
    let value = Bricks::literal("id=").concat(&Bricks::top());
    assert_eq!(value.representation(), r#"{["id="](1,1), ⊤}"#);
    assert_eq!(Brick::any(1, 2).representation(), "K(1,2)");
    assert_eq!(Brick::of(["x"], 0, ExtendedIndex::Infinite).to_string(), r#"["x"](0,∞)"#);
}

#[test]
fn test_brick_rejects_infinite_minimum() {
    let result = Brick::new(None, ExtendedIndex::Infinite, ExtendedIndex::Infinite);
    assert_eq!(result, Err(DomainError::InfiniteMinimum));
}

#[test]
fn test_url_building_program() {
    let domain = StringEnvDomain::default();
    let transfer = StringTransfer::new();

    // scheme = secure ? "https" : "http"
    // url = scheme + "://" + host + "/index"
    let program = Stmt::seq([
        Stmt::if_then_else(
            StrExpr::Input.contains(lit("1")),
            Stmt::assign("scheme", lit("https")),
            Stmt::assign("scheme", lit("http")),
        ),
        Stmt::assign("host", StrExpr::Input),
        Stmt::assign(
            "url",
            var("scheme").concat(lit("://")).concat(var("host")).concat(lit("/index")),
        ),
    ]);

    let env = transfer.apply(&domain, &StringEnv::new(), &program).unwrap();
    let url = env.get("url");

    assert_eq!(
        url,
        Bricks::new(vec![
            Brick::of(["http://", "https://"], 1, 1),
            Brick::top(),
            Brick::literal("/index"),
        ])
    );
    assert_eq!(domain.satisfies(&env, &var("url").contains(lit(":"))), Satisfiability::Satisfied);
    assert_eq!(domain.satisfies(&env, &var("url").contains(lit("s"))), Satisfiability::Unknown);
}

#[test]
fn test_loop_with_fixpoint_engine() {
    let domain = StringEnvDomain::new(Thresholds::default().with_max_strings(5));
    let transfer = StringTransfer::new();

    // s = "<"; while (*) s = s + "-"; s = s + ">"
    let program = Stmt::seq([
        Stmt::assign("s", lit("<")),
        Stmt::while_loop(
            StrExpr::Input.contains(lit("?")),
            Stmt::assign("s", var("s").concat(lit("-"))),
        ),
        Stmt::assign("s", var("s").concat(lit(">"))),
    ]);

    let env = transfer.apply(&domain, &StringEnv::new(), &program).unwrap();
    let s = env.get("s");

    // Every concrete run ends with ">"
    assert!(!s.is_bottom());
    assert_eq!(s.bricks().last(), Some(&Brick::literal(">")));
    assert_eq!(domain.satisfies(&env, &var("s").contains(lit(">"))), Satisfiability::Satisfied);
}

#[test]
fn test_domains_are_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Bricks>();
    assert_send_sync::<BricksDomain>();
    assert_send_sync::<StringEnv>();

    let inputs = ["alpha", "beta", "gamma", "delta"];
    let results: Vec<Bricks> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|s| scope.spawn(move || Bricks::literal(*s).concat(&Bricks::literal("!"))))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (input, result) in inputs.iter().zip(&results) {
        assert_eq!(result.as_literal(), Some(format!("{}!", input).as_str()));
    }
}
