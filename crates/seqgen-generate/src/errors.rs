use thiserror::Error;

use seqgen_core::RuleKind;

use crate::expr::ExprError;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("core error: {0}")]
    Core(#[from] seqgen_core::Error),
    #[error("unknown rules: {}", .names.join(", "))]
    UnknownRules { names: Vec<String> },
    #[error("mutually exclusive rules selected: {first} and {second}")]
    ConflictingRules { first: RuleKind, second: RuleKind },
    #[error("invalid expression for '{name}': {error}")]
    InvalidExpression { name: String, error: ExprError },
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("search space of {estimated} candidate evaluations exceeds the limit of {limit}")]
    SearchSpaceTooLarge { estimated: u128, limit: u64 },
    #[error("evaluation budget of {limit} candidates exhausted")]
    BudgetExhausted { limit: u64 },
    #[error("time budget of {limit_ms} ms exceeded after {evaluated} evaluations")]
    TimeBudgetExceeded { limit_ms: u64, evaluated: u64 },
    #[error("generation cancelled after {evaluated} evaluations")]
    Cancelled { evaluated: u64 },
    #[error("index {index} is out of range for {len} results")]
    IndexOutOfRange { index: usize, len: usize },
}
