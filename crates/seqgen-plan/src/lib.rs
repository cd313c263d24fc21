//! Generation plan contracts and validation.
//!
//! A plan is the serialisable form of one generation call: the symbol
//! domain, target length, selected rules and custom conditions.

pub mod errors;
pub mod model;
pub mod schema;
pub mod validate;

pub use errors::{IssueSeverity, PlanError, Result, ValidationIssue, ValidationReport};
pub use model::{CustomRule, GenerationPlan, PlanDomain, load_plan};
pub use schema::plan_json_schema;
pub use validate::{ValidatedPlan, validate_plan, validate_plan_json, validate_plan_semantics};
