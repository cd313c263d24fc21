//! Core contracts for seqgen.
//!
//! This crate defines the symbol, alphabet and sequence types, the closed
//! catalog of built-in rules, and validation helpers shared by the plan,
//! generation and CLI crates.

pub mod alphabet;
pub mod error;
pub mod policy;
pub mod rules;
pub mod symbol;
pub mod validation;

pub use alphabet::{Alphabet, Domain, DomainKind};
pub use error::{Error, Result};
pub use policy::{ConflictPolicy, Scope};
pub use rules::{DESCENDING_ORDER, Direction, RuleCategory, RuleKind, find_conflict};
pub use symbol::{Sequence, Symbol};
pub use validation::{duplicate_symbols, validate_symbols};

/// Current contract version for `plan.json` artifacts.
pub const PLAN_VERSION: &str = "0.1";

/// Digit symbol that a numeric domain never places first.
pub const LEADING_ZERO: &str = "0";
