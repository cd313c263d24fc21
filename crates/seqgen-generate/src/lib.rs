//! Constrained sequence generation for seqgen.
//!
//! This crate enumerates every sequence of a fixed length over an alphabet
//! that satisfies a conjunction of built-in rules and custom predicates,
//! using a depth-first search that prunes a branch as soon as one
//! predicate rejects its candidate.

pub mod cancel;
pub mod engine;
pub mod errors;
pub mod expr;
pub mod model;
pub mod planner;
pub mod predicate;
pub mod rules;

pub use cancel::CancellationToken;
pub use engine::{GenerationEngine, GenerationResult, estimate_search_space, generate};
pub use errors::GenerationError;
pub use expr::{Expr, ExprError, ExprPredicate};
pub use model::{
    DEFAULT_PREVIEW_LIMIT, GenerateOptions, GenerationReport, GenerationRequest, Preview,
};
pub use planner::{request_from_plan, validate_expressions};
pub use predicate::{CandidateContext, FnPredicate, Predicate};
pub use rules::{ResolvedRules, RuleRegistry, apply_conflict_policy};
