use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How mutually exclusive rule selections are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Fail the call naming the conflicting pair.
    #[default]
    Reject,
    /// Drop the increasing member of each conflicting pair and report it.
    PreferDecreasing,
}

/// Positions at which a custom predicate is evaluated.
///
/// Outside its scope a predicate is vacuously satisfied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Every position.
    #[default]
    Every,
    /// Position 0 only.
    First,
    /// Position `length - 1` only.
    Final,
    /// An explicit list of 0-based positions.
    Positions(Vec<usize>),
}

impl Scope {
    pub fn applies(&self, position: usize, length: usize) -> bool {
        match self {
            Scope::Every => true,
            Scope::First => position == 0,
            Scope::Final => position + 1 == length,
            Scope::Positions(positions) => positions.contains(&position),
        }
    }
}
