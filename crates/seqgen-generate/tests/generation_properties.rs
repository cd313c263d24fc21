use proptest::prelude::*;

use seqgen_core::{Alphabet, ConflictPolicy, RuleKind, Sequence, Symbol};
use seqgen_generate::{
    CandidateContext, GenerationRequest, Predicate, apply_conflict_policy, generate,
};

const POOL: [&str; 8] = ["a", "b", "c", "e", "1", "2", "3", "4"];

fn arb_alphabet() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(POOL.to_vec(), 0..=POOL.len()).prop_shuffle()
}

fn arb_rules() -> impl Strategy<Value = Vec<RuleKind>> {
    prop::sample::subsequence(RuleKind::ALL.to_vec(), 0..=3).prop_shuffle()
}

/// Every sequence over `alphabet` of `length`, in alphabet order, whose
/// every prefix extension passes `rules`, plus the number of failed
/// extensions of accepted prefixes.
fn brute_force(alphabet: &[Symbol], length: usize, rules: &[RuleKind]) -> (Vec<Sequence>, u64) {
    let mut accepted: Vec<Vec<Symbol>> = vec![Vec::new()];
    let mut rejected = 0;

    for _ in 0..length {
        let mut next = Vec::new();
        for prefix in &accepted {
            for candidate in alphabet {
                let ctx = CandidateContext::new(prefix, candidate, length);
                if rules.iter().all(|rule| rule.accepts(&ctx)) {
                    let mut extended = prefix.clone();
                    extended.push(candidate.clone());
                    next.push(extended);
                } else {
                    rejected += 1;
                }
            }
        }
        accepted = next;
    }

    (accepted.into_iter().map(Sequence::from).collect(), rejected)
}

proptest! {
    /// The search returns exactly the brute-force filtered sequences.
    #[test]
    fn search_matches_brute_force(
        symbols in arb_alphabet(),
        length in 0usize..=3,
        rules in arb_rules(),
    ) {
        let alphabet = Alphabet::from_strings(symbols).expect("alphabet");
        let request = GenerationRequest::characters(alphabet.clone(), length)
            .with_rules(rules.clone())
            .with_conflict_policy(ConflictPolicy::PreferDecreasing);
        let result = generate(&request).expect("generate");

        let active = apply_conflict_policy(&rules, ConflictPolicy::PreferDecreasing)
            .expect("resolve rules")
            .active;
        let (expected, rejected) = brute_force(alphabet.symbols(), length, &active);

        prop_assert_eq!(&result.sequences, &expected);
        prop_assert_eq!(result.rejected, rejected);
    }

    /// Every result has the target length and only uses alphabet symbols.
    #[test]
    fn results_have_target_length(
        symbols in arb_alphabet(),
        length in 0usize..=3,
        rules in arb_rules(),
    ) {
        let alphabet = Alphabet::from_strings(symbols).expect("alphabet");
        let request = GenerationRequest::characters(alphabet.clone(), length)
            .with_rules(rules)
            .with_conflict_policy(ConflictPolicy::PreferDecreasing);
        let result = generate(&request).expect("generate");

        for sequence in &result.sequences {
            prop_assert_eq!(sequence.len(), length);
            prop_assert!(sequence.iter().all(|symbol| alphabet.contains(symbol)));
        }
        prop_assert_eq!(result.report.results, result.len());
    }

    /// Every result satisfies every active rule at every position.
    #[test]
    fn results_satisfy_active_rules(
        symbols in arb_alphabet(),
        length in 0usize..=3,
        rules in arb_rules(),
    ) {
        let alphabet = Alphabet::from_strings(symbols).expect("alphabet");
        let request = GenerationRequest::characters(alphabet, length)
            .with_rules(rules.clone())
            .with_conflict_policy(ConflictPolicy::PreferDecreasing);
        let result = generate(&request).expect("generate");
        let active = apply_conflict_policy(&rules, ConflictPolicy::PreferDecreasing)
            .expect("resolve rules")
            .active;

        for sequence in &result.sequences {
            let symbols = sequence.symbols();
            for position in 0..symbols.len() {
                let ctx = CandidateContext::new(&symbols[..position], &symbols[position], length);
                for rule in &active {
                    prop_assert!(rule.accepts(&ctx), "{} fails {} at {}", sequence, rule, position);
                }
            }
        }
    }

    /// Two calls with the same inputs agree.
    #[test]
    fn generation_is_idempotent(
        symbols in arb_alphabet(),
        length in 0usize..=3,
        rules in arb_rules(),
    ) {
        let alphabet = Alphabet::from_strings(symbols).expect("alphabet");
        let request = GenerationRequest::characters(alphabet, length)
            .with_rules(rules)
            .with_conflict_policy(ConflictPolicy::PreferDecreasing);

        let first = generate(&request).expect("first run");
        let second = generate(&request).expect("second run");
        prop_assert_eq!(first.sequences, second.sequences);
        prop_assert_eq!(first.rejected, second.rejected);
    }
}
