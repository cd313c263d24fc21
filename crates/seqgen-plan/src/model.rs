use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use seqgen_core::{ConflictPolicy, DomainKind, PLAN_VERSION, Scope};

use crate::errors::{PlanError, Result};

/// Symbol space declared by a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanDomain {
    /// Caller supplied alphabet, tried in the listed order.
    Characters {
        /// Distinct, non-empty symbols.
        alphabet: Vec<String>,
    },
    /// Digits `0`-`9` without a leading zero.
    Numeric,
}

impl PlanDomain {
    pub fn kind(&self) -> DomainKind {
        match self {
            PlanDomain::Characters { .. } => DomainKind::Characters,
            PlanDomain::Numeric => DomainKind::Numeric,
        }
    }
}

/// Custom condition expressed in the predicate expression language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CustomRule {
    /// Name reported in rejection statistics.
    pub name: String,
    /// Boolean expression over `candidate`, `last`, `first`, `position`,
    /// `length` and `prefix_len`.
    pub expr: String,
    /// Positions at which the condition is checked.
    #[serde(default)]
    pub scope: Scope,
}

/// Canonical plan definition for one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GenerationPlan {
    /// Contract version for the plan format.
    pub plan_version: String,
    /// Symbol space to enumerate.
    pub domain: PlanDomain,
    /// Exact length of every generated sequence.
    pub length: u32,
    /// Built-in rule ids (or legacy aliases) combined by conjunction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<String>,
    /// Custom conditions combined with the rules by conjunction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom: Vec<CustomRule>,
    /// Handling of mutually exclusive rule selections.
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
}

impl GenerationPlan {
    pub fn new(domain: PlanDomain, length: u32) -> Self {
        Self {
            plan_version: PLAN_VERSION.to_string(),
            domain,
            length,
            rules: Vec::new(),
            custom: Vec::new(),
            conflict_policy: ConflictPolicy::default(),
        }
    }
}

/// Load a plan from a `.json` or `.toml` file.
pub fn load_plan(path: &Path) -> Result<GenerationPlan> {
    let contents = std::fs::read_to_string(path)?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(serde_json::from_str(&contents)?),
        Some("toml") => Ok(toml::from_str(&contents)?),
        other => Err(PlanError::Format(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}
