use std::collections::BTreeMap;
use std::sync::OnceLock;

use tracing::warn;

use seqgen_core::{ConflictPolicy, Direction, DomainKind, RuleKind, Symbol, find_conflict};

use crate::errors::GenerationError;
use crate::predicate::{CandidateContext, Predicate};

impl Predicate for RuleKind {
    fn id(&self) -> &str {
        RuleKind::id(*self)
    }

    fn accepts(&self, ctx: &CandidateContext<'_>) -> bool {
        let candidate = ctx.candidate;
        match self {
            RuleKind::NoDuplicates => !ctx.prefix.contains(candidate),
            RuleKind::StartsWithVowel => ctx.position > 0 || candidate.is_vowel(),
            RuleKind::EndsWithConsonant => !ctx.is_final() || candidate.is_consonant(),
            _ => match ctx.last() {
                None => true,
                Some(last) => accepts_adjacent(*self, last, candidate),
            },
        }
    }
}

/// Rules that only look at the last prefix symbol and the candidate.
fn accepts_adjacent(kind: RuleKind, last: &Symbol, candidate: &Symbol) -> bool {
    match kind {
        RuleKind::StrictIncreasing => compare_values(last, candidate, |a, b| b > a),
        RuleKind::StrictDecreasing => compare_values(last, candidate, |a, b| b < a),
        RuleKind::NonDecreasing => compare_values(last, candidate, |a, b| b >= a),
        RuleKind::NonIncreasing => compare_values(last, candidate, |a, b| b <= a),
        RuleKind::NoAdjacentEven => !(last.is_even() && candidate.is_even()),
        RuleKind::NoAdjacentOdd => !(last.is_odd() && candidate.is_odd()),
        RuleKind::NoAdjacentVowels => !(last.is_vowel() && candidate.is_vowel()),
        RuleKind::NoAdjacentConsonants => !(last.is_consonant() && candidate.is_consonant()),
        RuleKind::AlphabeticalOrder => candidate.as_str() >= last.as_str(),
        RuleKind::NoConsecutiveNumbers => {
            match (last.numeric_value(), candidate.numeric_value()) {
                (Some(a), Some(b)) => a.abs_diff(b) != 1,
                _ => true,
            }
        }
        RuleKind::NoDuplicates | RuleKind::StartsWithVowel | RuleKind::EndsWithConsonant => true,
    }
}

/// Ordering rules reject pairs that are not both numeric.
fn compare_values(last: &Symbol, candidate: &Symbol, check: impl Fn(i64, i64) -> bool) -> bool {
    match (last.numeric_value(), candidate.numeric_value()) {
        (Some(a), Some(b)) => check(a, b),
        _ => false,
    }
}

/// Process-wide, read-only catalog of built-in rules keyed by id and alias.
///
/// Names valid in every domain live in `by_name`; legacy names whose
/// meaning depends on the domain live in `by_domain`.
#[derive(Debug)]
pub struct RuleRegistry {
    by_name: BTreeMap<&'static str, RuleKind>,
    by_domain: BTreeMap<&'static str, Vec<(DomainKind, RuleKind)>>,
}

const DOMAINS: [DomainKind; 2] = [DomainKind::Characters, DomainKind::Numeric];

impl RuleRegistry {
    /// Shared registry, built on first use.
    pub fn global() -> &'static RuleRegistry {
        static REGISTRY: OnceLock<RuleRegistry> = OnceLock::new();
        REGISTRY.get_or_init(RuleRegistry::new)
    }

    pub fn new() -> Self {
        let mut by_name = BTreeMap::new();
        for kind in RuleKind::ALL {
            let previous = by_name.insert(kind.id(), kind);
            debug_assert!(previous.is_none(), "rule id '{}' registered twice", kind.id());
            for alias in kind.aliases() {
                let previous = by_name.insert(*alias, kind);
                debug_assert!(previous.is_none(), "rule alias '{alias}' registered twice");
            }
        }

        let mut by_domain: BTreeMap<&'static str, Vec<(DomainKind, RuleKind)>> = BTreeMap::new();
        for domain in DOMAINS {
            for kind in RuleKind::ALL {
                if let Some(alias) = kind.domain_alias(domain) {
                    debug_assert!(!by_name.contains_key(alias), "alias '{alias}' is ambiguous");
                    let entries = by_domain.entry(alias).or_default();
                    debug_assert!(
                        entries.iter().all(|(seen, _)| *seen != domain),
                        "alias '{alias}' registered twice"
                    );
                    entries.push((domain, kind));
                }
            }
        }

        Self { by_name, by_domain }
    }

    fn get(&self, name: &str, domain: DomainKind) -> Option<RuleKind> {
        self.by_name.get(name).copied().or_else(|| {
            self.by_domain.get(name).and_then(|entries| {
                entries
                    .iter()
                    .find(|(kind_domain, _)| *kind_domain == domain)
                    .map(|(_, kind)| *kind)
            })
        })
    }

    pub fn lookup(&self, name: &str, domain: DomainKind) -> Result<RuleKind, GenerationError> {
        self.get(name, domain)
            .ok_or_else(|| GenerationError::UnknownRules {
                names: vec![name.to_string()],
            })
    }

    /// Resolve a selection of names as understood in `domain`, failing with
    /// every unknown name at once.
    ///
    /// Repeated selections collapse to their first occurrence.
    pub fn resolve<S: AsRef<str>>(
        &self,
        names: &[S],
        domain: DomainKind,
    ) -> Result<Vec<RuleKind>, GenerationError> {
        let mut rules = Vec::new();
        let mut unknown = Vec::new();

        for name in names {
            let name = name.as_ref();
            match self.get(name, domain) {
                Some(kind) if !rules.contains(&kind) => rules.push(kind),
                Some(_) => {}
                None => unknown.push(name.to_string()),
            }
        }

        if unknown.is_empty() {
            Ok(rules)
        } else {
            Err(GenerationError::UnknownRules { names: unknown })
        }
    }

    /// Catalog entries in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = RuleKind> {
        RuleKind::ALL.into_iter()
    }

    /// True when every catalog entry is reachable by its id and aliases.
    pub fn is_complete(&self) -> bool {
        RuleKind::ALL.into_iter().all(|kind| {
            self.by_name.get(kind.id()) == Some(&kind)
                && kind
                    .aliases()
                    .iter()
                    .all(|alias| self.by_name.get(alias) == Some(&kind))
                && DOMAINS.into_iter().all(|domain| {
                    kind.domain_alias(domain)
                        .is_none_or(|alias| self.get(alias, domain) == Some(kind))
                })
        })
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Active rules after the conflict policy has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRules {
    pub active: Vec<RuleKind>,
    pub dropped: Vec<RuleKind>,
}

pub fn apply_conflict_policy(
    rules: &[RuleKind],
    policy: ConflictPolicy,
) -> Result<ResolvedRules, GenerationError> {
    let mut active = rules.to_vec();
    let mut dropped = Vec::new();

    while let Some((first, second)) = find_conflict(&active) {
        match policy {
            ConflictPolicy::Reject => {
                return Err(GenerationError::ConflictingRules { first, second });
            }
            ConflictPolicy::PreferDecreasing => {
                let increasing = match first.direction() {
                    Some((Direction::Increasing, _)) => first,
                    _ => second,
                };
                warn!(
                    dropped = %increasing,
                    kept = %if increasing == first { second } else { first },
                    "conflicting rules selected; dropping the increasing rule"
                );
                active.retain(|kind| *kind != increasing);
                dropped.push(increasing);
            }
        }
    }

    Ok(ResolvedRules { active, dropped })
}
