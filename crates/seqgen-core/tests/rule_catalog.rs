use std::collections::BTreeSet;

use seqgen_core::{DESCENDING_ORDER, DomainKind, Error, RuleKind, find_conflict};

#[test]
fn ids_and_aliases_are_unique() {
    let mut names = BTreeSet::new();
    for kind in RuleKind::ALL {
        assert!(names.insert(kind.id()), "duplicate id {}", kind.id());
        for alias in kind.aliases() {
            assert!(names.insert(alias), "duplicate alias {alias}");
        }
    }
}

#[test]
fn every_name_resolves_back_to_its_rule() {
    for kind in RuleKind::ALL {
        assert_eq!(RuleKind::from_name(kind.id()), Some(kind));
        for alias in kind.aliases() {
            assert_eq!(RuleKind::from_name(alias), Some(kind));
        }
    }
}

#[test]
fn descending_order_depends_on_the_domain() {
    assert_eq!(
        RuleKind::from_name_in(DESCENDING_ORDER, DomainKind::Numeric),
        Some(RuleKind::StrictDecreasing)
    );
    assert_eq!(
        RuleKind::from_name_in(DESCENDING_ORDER, DomainKind::Characters),
        Some(RuleKind::NonIncreasing)
    );
    assert_eq!(RuleKind::from_name(DESCENDING_ORDER), None);

    for domain in [DomainKind::Numeric, DomainKind::Characters] {
        let owners = RuleKind::ALL
            .into_iter()
            .filter(|kind| kind.domain_alias(domain).is_some())
            .count();
        assert_eq!(owners, 1, "{domain:?}");
        assert_eq!(
            RuleKind::from_name_in("ascendingOrder", domain),
            Some(RuleKind::NonDecreasing)
        );
    }
}

#[test]
fn serde_uses_the_stable_id() {
    for kind in RuleKind::ALL {
        let json = serde_json::to_string(&kind).expect("serialize rule");
        assert_eq!(json, format!("\"{}\"", kind.id()));
    }
}

#[test]
fn unknown_names_fail_to_parse() {
    let result = "noSuchRule".parse::<RuleKind>();
    assert_eq!(result, Err(Error::UnknownRule("noSuchRule".to_string())));
}

#[test]
fn opposite_monotonic_rules_conflict() {
    assert!(RuleKind::StrictIncreasing.conflicts_with(RuleKind::StrictDecreasing));
    assert!(RuleKind::StrictIncreasing.conflicts_with(RuleKind::NonIncreasing));
    assert!(RuleKind::NonDecreasing.conflicts_with(RuleKind::StrictDecreasing));
    assert!(!RuleKind::NonDecreasing.conflicts_with(RuleKind::NonIncreasing));
    assert!(!RuleKind::StrictIncreasing.conflicts_with(RuleKind::NonDecreasing));
    assert!(!RuleKind::NoDuplicates.conflicts_with(RuleKind::StrictDecreasing));
}

#[test]
fn find_conflict_reports_selection_order() {
    let rules = [
        RuleKind::NoAdjacentEven,
        RuleKind::StrictDecreasing,
        RuleKind::StrictIncreasing,
    ];
    assert_eq!(
        find_conflict(&rules),
        Some((RuleKind::StrictDecreasing, RuleKind::StrictIncreasing))
    );
    assert_eq!(find_conflict(&[RuleKind::NoDuplicates]), None);
}
