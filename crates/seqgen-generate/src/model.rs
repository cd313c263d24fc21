use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use seqgen_core::{Alphabet, ConflictPolicy, Domain, RuleKind, Sequence};

use crate::errors::GenerationError;
use crate::predicate::Predicate;
use crate::rules::RuleRegistry;

/// Number of sequences shown before the rest is summarised.
pub const DEFAULT_PREVIEW_LIMIT: usize = 200;

/// Options for the generation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Upper bound on the worst-case number of candidate evaluations,
    /// checked before the search starts.
    pub max_search_space: Option<u64>,
    /// Upper bound on candidates actually evaluated.
    pub max_evaluations: Option<u64>,
    /// Wall-clock budget for a single call.
    pub max_duration_ms: Option<u64>,
}

impl GenerateOptions {
    pub fn unbounded() -> Self {
        Self {
            max_search_space: None,
            max_evaluations: None,
            max_duration_ms: None,
        }
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_search_space: Some(1_000_000_000_000),
            max_evaluations: Some(200_000_000),
            max_duration_ms: None,
        }
    }
}

/// Inputs for one generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub domain: Domain,
    pub length: usize,
    /// Built-in rules, applied in this order before custom predicates.
    pub rules: Vec<RuleKind>,
    /// Custom predicates, applied in this order.
    pub custom: Vec<Arc<dyn Predicate>>,
    pub conflict_policy: ConflictPolicy,
}

impl GenerationRequest {
    pub fn new(domain: Domain, length: usize) -> Self {
        Self {
            domain,
            length,
            rules: Vec::new(),
            custom: Vec::new(),
            conflict_policy: ConflictPolicy::default(),
        }
    }

    pub fn characters(alphabet: Alphabet, length: usize) -> Self {
        Self::new(Domain::Characters { alphabet }, length)
    }

    pub fn numeric(length: usize) -> Self {
        Self::new(Domain::Numeric, length)
    }

    pub fn with_rule(mut self, rule: RuleKind) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_rules(mut self, rules: impl IntoIterator<Item = RuleKind>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Add rules by id or alias; every unknown name is reported at once.
    pub fn with_rule_names<S: AsRef<str>>(self, names: &[S]) -> Result<Self, GenerationError> {
        let rules = RuleRegistry::global().resolve(names, self.domain.kind())?;
        Ok(self.with_rules(rules))
    }

    pub fn with_predicate(mut self, predicate: impl Predicate + 'static) -> Self {
        self.custom.push(Arc::new(predicate));
        self
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }
}

/// Report for a generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub domain: String,
    pub length: usize,
    pub alphabet_size: usize,
    /// Active rule ids after the conflict policy.
    pub rules: Vec<String>,
    pub custom: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped_rules: Vec<String>,
    pub results: usize,
    pub rejected: u64,
    /// Candidates checked against the predicates, accepted or not.
    pub evaluated: u64,
    /// Rejections attributed to the first predicate that failed.
    pub rejections_by_predicate: BTreeMap<String, u64>,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(domain: &Domain, length: usize, alphabet_size: usize) -> Self {
        Self {
            domain: domain.label().to_string(),
            length,
            alphabet_size,
            rules: Vec::new(),
            custom: Vec::new(),
            dropped_rules: Vec::new(),
            results: 0,
            rejected: 0,
            evaluated: 0,
            rejections_by_predicate: BTreeMap::new(),
            duration_ms: 0,
        }
    }

    pub fn record_rejections(&mut self, id: &str, count: u64) {
        if count > 0 {
            *self
                .rejections_by_predicate
                .entry(id.to_string())
                .or_insert(0) += count;
        }
    }
}

/// Bounded view over a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preview<'a> {
    pub shown: &'a [Sequence],
    /// Sequences not included in `shown`.
    pub hidden: usize,
}
