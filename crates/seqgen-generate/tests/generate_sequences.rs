use seqgen_core::{Alphabet, ConflictPolicy, RuleKind};
use seqgen_generate::{
    CancellationToken, GenerateOptions, GenerationEngine, GenerationError, GenerationRequest,
    generate,
};

fn letters(symbols: &str) -> Alphabet {
    Alphabet::parse_list(symbols).expect("parse alphabet")
}

fn rendered(result: &seqgen_generate::GenerationResult) -> Vec<String> {
    result
        .sequences
        .iter()
        .map(|sequence| sequence.to_string())
        .collect()
}

#[test]
fn no_duplicates_over_two_letters() {
    let request =
        GenerationRequest::characters(letters("a,b"), 2).with_rule(RuleKind::NoDuplicates);
    let result = generate(&request).expect("generate");

    assert_eq!(rendered(&result), vec!["ab", "ba"]);
    assert_eq!(result.rejected, 2);
    assert_eq!(result.report.evaluated, 6);
    assert_eq!(
        result.report.rejections_by_predicate.get("no_duplicates"),
        Some(&2)
    );
}

#[test]
fn strictly_increasing_numeric_triples() {
    let request = GenerationRequest::numeric(3).with_rule(RuleKind::StrictIncreasing);
    let result = generate(&request).expect("generate");

    assert_eq!(result.len(), 84);
    assert_eq!(result.nth(1).expect("first").to_string(), "123");
    assert_eq!(result.nth(84).expect("last").to_string(), "789");
    assert!(result.sequences.iter().all(|sequence| {
        sequence
            .symbols()
            .windows(2)
            .all(|pair| pair[0].numeric_value() < pair[1].numeric_value())
    }));
}

#[test]
fn rejections_are_counted_once_per_candidate() {
    let request = GenerationRequest::numeric(2).with_rule(RuleKind::StrictIncreasing);
    let result = generate(&request).expect("generate");

    assert_eq!(result.len(), 36);
    assert_eq!(result.rejected, 54);
    assert_eq!(result.report.evaluated, 99);
    assert_eq!(
        result.report.evaluated,
        result.rejected + 9 + result.len() as u64
    );
}

#[test]
fn zero_length_yields_the_empty_sequence() {
    let request = GenerationRequest::characters(letters("a,b,c"), 0)
        .with_rules([RuleKind::NoDuplicates, RuleKind::StartsWithVowel]);
    let result = generate(&request).expect("generate");

    assert_eq!(result.len(), 1);
    assert!(result.sequences[0].is_empty());
    assert_eq!(result.rejected, 0);
    assert_eq!(result.report.evaluated, 0);
}

#[test]
fn numeric_domain_never_starts_with_zero() {
    let result = generate(&GenerationRequest::numeric(1)).expect("generate");

    assert_eq!(
        rendered(&result),
        vec!["1", "2", "3", "4", "5", "6", "7", "8", "9"]
    );
    assert_eq!(result.rejected, 0);

    let result = generate(&GenerationRequest::numeric(2)).expect("generate");
    assert_eq!(result.len(), 90);
    assert_eq!(result.nth(1).expect("first").to_string(), "10");
}

#[test]
fn empty_alphabet_yields_nothing() {
    let result = generate(&GenerationRequest::characters(Alphabet::empty(), 2)).expect("generate");
    assert!(result.is_empty());
    assert_eq!(result.rejected, 0);
}

#[test]
fn results_follow_alphabet_order() {
    let result = generate(&GenerationRequest::characters(letters("c,a,b"), 2)).expect("generate");
    assert_eq!(
        rendered(&result),
        vec!["cc", "ca", "cb", "ac", "aa", "ab", "bc", "ba", "bb"]
    );
}

#[test]
fn letter_rules_combine() {
    let request = GenerationRequest::characters(letters("a,b,c,e"), 3).with_rules([
        RuleKind::NoDuplicates,
        RuleKind::StartsWithVowel,
        RuleKind::EndsWithConsonant,
    ]);
    let result = generate(&request).expect("generate");

    assert_eq!(
        rendered(&result),
        vec!["abc", "acb", "aeb", "aec", "eab", "eac", "ebc", "ecb"]
    );
}

#[test]
fn generation_is_repeatable() {
    let request = GenerationRequest::characters(letters("a,b,c,1,2"), 3)
        .with_rules([RuleKind::NoAdjacentVowels, RuleKind::NoConsecutiveNumbers]);

    let first = generate(&request).expect("first run");
    let second = generate(&request).expect("second run");

    assert_eq!(first.sequences, second.sequences);
    assert_eq!(first.rejected, second.rejected);
    assert_eq!(
        first.report.rejections_by_predicate,
        second.report.rejections_by_predicate
    );
}

#[test]
fn unknown_rule_names_are_reported_together() {
    let err = GenerationRequest::numeric(2)
        .with_rule_names(&["noSuchRule", "strictIncreasing", "other"])
        .expect_err("unknown rules");

    match err {
        GenerationError::UnknownRules { names } => {
            assert_eq!(names, vec!["noSuchRule".to_string(), "other".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn aliases_resolve_to_catalog_rules() {
    let request = GenerationRequest::numeric(2)
        .with_rule_names(&["descendingOrder", "noTwoEven"])
        .expect("resolve aliases");
    assert_eq!(
        request.rules,
        vec![RuleKind::StrictDecreasing, RuleKind::NoAdjacentEven]
    );

    let request = GenerationRequest::characters(letters("a,b"), 2)
        .with_rule_names(&["descendingOrder"])
        .expect("resolve alias");
    assert_eq!(request.rules, vec![RuleKind::NonIncreasing]);
}

#[test]
fn numeric_descending_order_is_strict() {
    let request = GenerationRequest::numeric(2)
        .with_rule_names(&["descendingOrder"])
        .expect("resolve alias");
    let result = generate(&request).expect("generate");

    assert_eq!(result.len(), 45);
    assert_eq!(rendered(&result)[..3], ["10", "20", "21"]);
    assert!(result.sequences.iter().all(|sequence| {
        let digits = sequence.to_string().into_bytes();
        digits[1] < digits[0]
    }));
}

#[test]
fn conflicting_rules_are_rejected_by_default() {
    let request = GenerationRequest::numeric(2)
        .with_rules([RuleKind::StrictIncreasing, RuleKind::StrictDecreasing]);
    let err = generate(&request).expect_err("conflict");

    assert!(matches!(
        err,
        GenerationError::ConflictingRules {
            first: RuleKind::StrictIncreasing,
            second: RuleKind::StrictDecreasing,
        }
    ));
}

#[test]
fn prefer_decreasing_drops_the_increasing_rule() {
    let request = GenerationRequest::numeric(2)
        .with_rules([RuleKind::StrictIncreasing, RuleKind::StrictDecreasing])
        .with_conflict_policy(ConflictPolicy::PreferDecreasing);
    let result = generate(&request).expect("generate");

    assert_eq!(result.len(), 45);
    assert_eq!(result.report.rules, vec!["strict_decreasing".to_string()]);
    assert_eq!(
        result.report.dropped_rules,
        vec!["strict_increasing".to_string()]
    );
}

#[test]
fn search_space_limit_fails_fast() {
    let err = generate(&GenerationRequest::numeric(13)).expect_err("too large");
    match err {
        GenerationError::SearchSpaceTooLarge { estimated, limit } => {
            assert_eq!(limit, 1_000_000_000_000);
            assert!(estimated > u128::from(limit));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn evaluation_budget_stops_the_search() {
    let options = GenerateOptions {
        max_evaluations: Some(100),
        ..GenerateOptions::default()
    };
    let err = GenerationEngine::new(options)
        .run(&GenerationRequest::numeric(6), &CancellationToken::new())
        .expect_err("budget exhausted");

    assert!(matches!(err, GenerationError::BudgetExhausted { limit: 100 }));
}

#[test]
fn unbounded_options_allow_large_searches() {
    let options = GenerateOptions::unbounded();
    let request = GenerationRequest::numeric(4).with_rule(RuleKind::StrictIncreasing);
    let result = GenerationEngine::new(options)
        .run(&request, &CancellationToken::new())
        .expect("generate");
    assert_eq!(result.len(), 126);
}

#[test]
fn out_of_range_indices_are_errors() {
    let result = generate(&GenerationRequest::numeric(1)).expect("generate");

    assert!(matches!(
        result.nth(0),
        Err(GenerationError::IndexOutOfRange { index: 0, len: 9 })
    ));
    assert!(matches!(
        result.nth(10),
        Err(GenerationError::IndexOutOfRange { index: 10, len: 9 })
    ));
    assert_eq!(result.nth(9).expect("last").to_string(), "9");

    let preview = result.preview(200);
    assert_eq!(preview.shown.len(), 9);
    assert_eq!(preview.hidden, 0);
}
