use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use seqgen_core::{Domain, Sequence, Symbol};

use crate::cancel::CancellationToken;
use crate::errors::GenerationError;
use crate::model::{GenerateOptions, GenerationReport, GenerationRequest, Preview};
use crate::predicate::{CandidateContext, Predicate};
use crate::rules::apply_conflict_policy;

/// Evaluations between two wall-clock checks.
const TIME_CHECK_INTERVAL: u64 = 4096;

/// Result of a generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Every accepted sequence, in depth-first alphabet order.
    pub sequences: Vec<Sequence>,
    /// Candidates that failed at least one predicate.
    pub rejected: u64,
    pub report: GenerationReport,
}

impl GenerationResult {
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// The `index`-th sequence, counting from 1.
    pub fn nth(&self, index: usize) -> Result<&Sequence, GenerationError> {
        index
            .checked_sub(1)
            .and_then(|idx| self.sequences.get(idx))
            .ok_or(GenerationError::IndexOutOfRange {
                index,
                len: self.sequences.len(),
            })
    }

    pub fn preview(&self, limit: usize) -> Preview<'_> {
        let shown = &self.sequences[..limit.min(self.sequences.len())];
        Preview {
            shown,
            hidden: self.sequences.len() - shown.len(),
        }
    }
}

/// Entry point for enumerating constrained sequences.
#[derive(Debug, Clone, Default)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    pub fn run(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();

        let mut rules = Vec::with_capacity(request.rules.len());
        for rule in &request.rules {
            if !rules.contains(rule) {
                rules.push(*rule);
            }
        }
        let resolved = apply_conflict_policy(&rules, request.conflict_policy)?;

        let alphabet = request.domain.alphabet();
        let root_branching = alphabet
            .symbols()
            .iter()
            .filter(|symbol| !request.domain.excluded_at_root(symbol))
            .count();
        let estimated = estimate_search_space(root_branching, alphabet.len(), request.length);
        if let Some(limit) = self.options.max_search_space
            && estimated > u128::from(limit)
        {
            warn!(estimated = %estimated, limit, "search space exceeds the configured limit");
            return Err(GenerationError::SearchSpaceTooLarge { estimated, limit });
        }

        let rule_ids = resolved
            .active
            .iter()
            .map(|rule| rule.id().to_string())
            .collect::<Vec<_>>();
        info!(
            domain = request.domain.label(),
            length = request.length,
            alphabet_size = alphabet.len(),
            rules = %rule_ids.join(","),
            custom = request.custom.len(),
            "generation started"
        );
        debug!(
            dropped = ?resolved.dropped,
            custom = ?request.custom,
            estimated = %estimated,
            "resolved generation request"
        );

        let mut predicates: Vec<&dyn Predicate> = resolved
            .active
            .iter()
            .map(|rule| rule as &dyn Predicate)
            .collect();
        predicates.extend(
            request
                .custom
                .iter()
                .map(|predicate| predicate.as_ref() as &dyn Predicate),
        );

        let mut search = Search {
            domain: &request.domain,
            alphabet: alphabet.symbols(),
            length: request.length,
            predicates: &predicates,
            options: &self.options,
            cancel,
            started: start,
            prefix: Vec::with_capacity(request.length),
            sequences: Vec::new(),
            rejected: 0,
            evaluated: 0,
            rejections: vec![0; predicates.len()],
        };

        if let Err(err) = search.extend() {
            warn!(
                error = %err,
                evaluated = search.evaluated,
                results = search.sequences.len(),
                "generation aborted"
            );
            return Err(err);
        }

        let mut report = GenerationReport::new(&request.domain, request.length, alphabet.len());
        report.rules = rule_ids;
        report.custom = request
            .custom
            .iter()
            .map(|predicate| predicate.id().to_string())
            .collect();
        report.dropped_rules = resolved
            .dropped
            .iter()
            .map(|rule| rule.id().to_string())
            .collect();
        for (predicate, count) in predicates.iter().zip(&search.rejections) {
            report.record_rejections(predicate.id(), *count);
        }
        report.results = search.sequences.len();
        report.rejected = search.rejected;
        report.evaluated = search.evaluated;
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            results = report.results,
            rejected = report.rejected,
            evaluated = report.evaluated,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationResult {
            sequences: search.sequences,
            rejected: search.rejected,
            report,
        })
    }
}

/// Run `request` with default options and no external cancellation.
pub fn generate(request: &GenerationRequest) -> Result<GenerationResult, GenerationError> {
    GenerationEngine::default().run(request, &CancellationToken::new())
}

/// Worst-case number of candidate evaluations for a full search.
///
/// Every prefix of length `d < length` tries each symbol once, so the total
/// is `root * (1 + b + ... + b^(length-1))`. Saturates instead of overflowing.
pub fn estimate_search_space(root_branching: usize, branching: usize, length: usize) -> u128 {
    let root = root_branching as u128;
    let branching = branching as u128;
    let mut level = root;
    let mut total: u128 = 0;
    for _ in 0..length {
        total = total.saturating_add(level);
        if total == u128::MAX {
            break;
        }
        level = level.saturating_mul(branching);
    }
    total
}

struct Search<'r> {
    domain: &'r Domain,
    alphabet: &'r [Symbol],
    length: usize,
    predicates: &'r [&'r dyn Predicate],
    options: &'r GenerateOptions,
    cancel: &'r CancellationToken,
    started: Instant,
    prefix: Vec<Symbol>,
    sequences: Vec<Sequence>,
    rejected: u64,
    evaluated: u64,
    rejections: Vec<u64>,
}

impl Search<'_> {
    fn extend(&mut self) -> Result<(), GenerationError> {
        if self.prefix.len() == self.length {
            self.sequences.push(Sequence::from(self.prefix.clone()));
            return Ok(());
        }

        let alphabet = self.alphabet;
        let at_root = self.prefix.is_empty();
        for symbol in alphabet {
            if at_root && self.domain.excluded_at_root(symbol) {
                continue;
            }
            self.tick()?;

            match self.first_failure(symbol) {
                Some(idx) => {
                    self.rejected += 1;
                    self.rejections[idx] += 1;
                }
                None => {
                    self.prefix.push(symbol.clone());
                    self.extend()?;
                    self.prefix.pop();
                }
            }
        }
        Ok(())
    }

    /// Index of the first predicate rejecting `candidate`, if any.
    fn first_failure(&self, candidate: &Symbol) -> Option<usize> {
        let ctx = CandidateContext::new(&self.prefix, candidate, self.length);
        self.predicates
            .iter()
            .position(|predicate| !predicate.accepts(&ctx))
    }

    fn tick(&mut self) -> Result<(), GenerationError> {
        if self.cancel.is_cancelled() {
            return Err(GenerationError::Cancelled {
                evaluated: self.evaluated,
            });
        }
        if let Some(limit) = self.options.max_evaluations
            && self.evaluated >= limit
        {
            return Err(GenerationError::BudgetExhausted { limit });
        }

        self.evaluated += 1;

        if self.evaluated % TIME_CHECK_INTERVAL == 0
            && let Some(limit_ms) = self.options.max_duration_ms
            && self.started.elapsed().as_millis() > u128::from(limit_ms)
        {
            return Err(GenerationError::TimeBudgetExceeded {
                limit_ms,
                evaluated: self.evaluated,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_counts_every_level() {
        assert_eq!(estimate_search_space(9, 10, 0), 0);
        assert_eq!(estimate_search_space(9, 10, 1), 9);
        assert_eq!(estimate_search_space(9, 10, 3), 9 + 90 + 900);
        assert_eq!(estimate_search_space(2, 2, 2), 6);
    }

    #[test]
    fn estimate_saturates() {
        assert_eq!(estimate_search_space(usize::MAX, usize::MAX, 64), u128::MAX);
    }

    #[test]
    fn nth_is_one_based() {
        let sequences = ["a", "b"]
            .iter()
            .map(|value| Sequence::from(vec![Symbol::new(*value).expect("symbol")]))
            .collect::<Vec<_>>();
        let result = GenerationResult {
            sequences,
            rejected: 0,
            report: GenerationReport::new(&Domain::Numeric, 1, 2),
        };

        assert_eq!(result.nth(1).expect("first").to_string(), "a");
        assert_eq!(result.nth(2).expect("second").to_string(), "b");
        assert!(matches!(
            result.nth(0),
            Err(GenerationError::IndexOutOfRange { index: 0, len: 2 })
        ));
        assert!(matches!(
            result.nth(3),
            Err(GenerationError::IndexOutOfRange { index: 3, len: 2 })
        ));

        let preview = result.preview(1);
        assert_eq!(preview.shown.len(), 1);
        assert_eq!(preview.hidden, 1);
    }
}
