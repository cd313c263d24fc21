use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use seqgen_core::{Alphabet, RuleKind, Scope};
use seqgen_generate::{
    CancellationToken, ExprPredicate, FnPredicate, GenerateOptions, GenerationEngine,
    GenerationError, GenerationRequest, generate, request_from_plan,
};
use seqgen_plan::{CustomRule, GenerationPlan, PlanDomain, load_plan};

fn example(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../plans/examples")
        .join(name)
}

fn first_below_last() -> ExprPredicate {
    ExprPredicate::compile("first_below_last", "num(first) < num(candidate)", Scope::Final)
        .expect("compile predicate")
}

#[test]
fn first_digit_below_last_digit() {
    let request = GenerationRequest::numeric(3).with_predicate(first_below_last());
    let result = generate(&request).expect("generate");

    for sequence in &result.sequences {
        let first = sequence.first().and_then(|s| s.numeric_value());
        let last = sequence.last().and_then(|s| s.numeric_value());
        assert!(first < last, "{sequence} violates first < last");
    }
    // 10 middle digits times the (first, last) pairs with 1 <= first < last <= 9.
    assert_eq!(result.len(), 10 * 36);
    assert_eq!(
        result.report.rejections_by_predicate.get("first_below_last"),
        Some(&result.rejected)
    );
}

#[test]
fn rules_run_before_custom_predicates() {
    let request = GenerationRequest::numeric(2)
        .with_rule(RuleKind::StrictIncreasing)
        .with_predicate(first_below_last());
    let result = generate(&request).expect("generate");

    assert_eq!(result.len(), 36);
    assert_eq!(
        result.report.rejections_by_predicate.get("strict_increasing"),
        Some(&54)
    );
    assert_eq!(
        result.report.rejections_by_predicate.get("first_below_last"),
        None
    );
}

#[test]
fn closure_predicates_are_supported() {
    let request = GenerationRequest::characters(Alphabet::parse_list("a,b,c").expect("alphabet"), 2)
        .with_predicate(FnPredicate::new("no_b", |ctx| ctx.candidate.as_str() != "b"));
    let result = generate(&request).expect("generate");

    let rendered = result
        .sequences
        .iter()
        .map(|sequence| sequence.to_string())
        .collect::<Vec<_>>();
    assert_eq!(rendered, vec!["aa", "ac", "ca", "cc"]);
    assert_eq!(result.report.custom, vec!["no_b".to_string()]);
}

#[test]
fn scoped_closure_only_checks_its_positions() {
    let request = GenerationRequest::characters(Alphabet::parse_list("a,b").expect("alphabet"), 3)
        .with_predicate(
            FnPredicate::new("middle_is_b", |ctx| ctx.candidate.as_str() == "b")
                .with_scope(Scope::Positions(vec![1])),
        );
    let result = generate(&request).expect("generate");

    assert_eq!(result.len(), 4);
    assert!(
        result
            .sequences
            .iter()
            .all(|sequence| sequence.symbols()[1].as_str() == "b")
    );
}

#[test]
fn cancellation_stops_between_siblings() {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let request = GenerationRequest::numeric(4).with_predicate(FnPredicate::new(
        "cancel_on_five",
        move |ctx| {
            if ctx.candidate.as_str() == "5" {
                trigger.cancel();
            }
            true
        },
    ));

    let err = GenerationEngine::default()
        .run(&request, &cancel)
        .expect_err("cancelled");
    // Prefixes 1, 10 and 100, then candidates 0..=5 after 100.
    assert!(matches!(err, GenerationError::Cancelled { evaluated: 9 }));
}

#[test]
fn cancelled_token_prevents_any_work() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = GenerationEngine::default()
        .run(&GenerationRequest::numeric(3), &cancel)
        .expect_err("cancelled");
    assert!(matches!(err, GenerationError::Cancelled { evaluated: 0 }));
}

#[test]
fn time_budget_is_enforced() {
    let slept = Arc::new(AtomicBool::new(false));
    let flag = slept.clone();
    let request = GenerationRequest::numeric(4).with_predicate(FnPredicate::new("slow", move |_| {
        if !flag.swap(true, Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(5));
        }
        true
    }));
    let options = GenerateOptions {
        max_duration_ms: Some(1),
        ..GenerateOptions::default()
    };

    let err = GenerationEngine::new(options)
        .run(&request, &CancellationToken::new())
        .expect_err("time budget");
    assert!(matches!(
        err,
        GenerationError::TimeBudgetExceeded {
            limit_ms: 1,
            evaluated: 4096,
        }
    ));
}

#[test]
fn plans_become_requests() {
    let plan = load_plan(&example("first_below_last.plan.json")).expect("load plan");
    let request = request_from_plan(&plan).expect("request from plan");
    let result = generate(&request).expect("generate");

    let expected = (1..=9)
        .flat_map(|first| (0..=9).map(move |last| (first, last)))
        .filter(|(first, last)| first < last && !(first % 2 == 0 && last % 2 == 0))
        .count();
    assert_eq!(result.len(), expected);
    assert_eq!(result.len(), 30);
}

#[test]
fn toml_plans_become_requests() {
    let plan = load_plan(&example("letters.plan.toml")).expect("load plan");
    let result = generate(&request_from_plan(&plan).expect("request")).expect("generate");

    assert_eq!(result.len(), 8);
    assert_eq!(result.nth(1).expect("first").to_string(), "abc");
    assert_eq!(result.nth(8).expect("last").to_string(), "ecb");
}

#[test]
fn invalid_plans_are_rejected() {
    let mut plan = GenerationPlan::new(PlanDomain::Numeric, 2);
    plan.rules = vec!["noSuchRule".to_string()];
    assert!(matches!(
        request_from_plan(&plan),
        Err(GenerationError::InvalidPlan(_))
    ));
}

#[test]
fn invalid_expressions_are_rejected() {
    let mut plan = GenerationPlan::new(PlanDomain::Numeric, 2);
    plan.custom = vec![CustomRule {
        name: "broken".to_string(),
        expr: "num(first) <".to_string(),
        scope: Scope::Final,
    }];

    match request_from_plan(&plan) {
        Err(GenerationError::InvalidExpression { name, error }) => {
            assert_eq!(name, "broken");
            assert_eq!(error.offset(), 12);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}
