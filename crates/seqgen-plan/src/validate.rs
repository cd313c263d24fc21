use std::collections::HashSet;

use jsonschema::JSONSchema;
use serde_json::Value;

use seqgen_core::{
    ConflictPolicy, PLAN_VERSION, RuleCategory, RuleKind, Scope, find_conflict, validate_symbols,
};

use crate::errors::{PlanError, ValidationIssue, ValidationReport};
use crate::model::{GenerationPlan, PlanDomain};

/// Lengths above this still run but are flagged: the search is exponential.
const RECOMMENDED_MAX_LENGTH: u32 = 12;

/// Validated plan with accumulated warnings.
#[derive(Debug, Clone)]
pub struct ValidatedPlan {
    pub plan: GenerationPlan,
    pub warnings: Vec<ValidationIssue>,
}

/// Validate a plan JSON document against the plan JSON Schema.
pub fn validate_plan_json(
    plan_json: &Value,
    plan_schema: &Value,
) -> Result<ValidationReport, PlanError> {
    let compiled =
        JSONSchema::compile(plan_schema).map_err(|err| PlanError::Schema(err.to_string()))?;

    let mut report = ValidationReport::default();

    if let Err(errors) = compiled.validate(plan_json) {
        for error in errors {
            let path = normalized_json_pointer(&error.instance_path.to_string());
            report.push(ValidationIssue::error("schema_violation", path, error.to_string()));
        }
    }

    Ok(report)
}

/// Check a parsed plan for problems the JSON Schema cannot express.
///
/// Custom expressions are only checked for being non-empty here; they are
/// compiled by the generation crate.
pub fn validate_plan_semantics(plan: &GenerationPlan) -> ValidationReport {
    let mut report = ValidationReport::default();

    validate_version(plan, &mut report);
    validate_domain(plan, &mut report);
    let rules = validate_rules(plan, &mut report);
    validate_conflicts(plan, &rules, &mut report);
    validate_custom(plan, &mut report);

    report
}

/// Validate the plan end-to-end, returning structured issues on failure.
pub fn validate_plan(
    plan_json: &Value,
    plan_schema: &Value,
) -> Result<ValidatedPlan, ValidationReport> {
    let structural = validate_plan_json(plan_json, plan_schema)
        .map_err(|err| single_error("schema_invalid", err.to_string()))?;
    if !structural.is_ok() {
        return Err(structural);
    }

    let plan: GenerationPlan = serde_json::from_value(plan_json.clone())
        .map_err(|err| single_error("invalid_plan_json", err.to_string()))?;

    let semantic = validate_plan_semantics(&plan);
    if !semantic.is_ok() {
        return Err(semantic);
    }

    Ok(ValidatedPlan {
        plan,
        warnings: semantic.warnings,
    })
}

fn single_error(code: &str, message: String) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.push(ValidationIssue::error(code, "/", message));
    report
}

fn validate_version(plan: &GenerationPlan, report: &mut ValidationReport) {
    if plan.plan_version != PLAN_VERSION {
        report.push(
            ValidationIssue::error(
                "plan_version_mismatch",
                "/plan_version",
                format!(
                    "plan_version '{}' is not supported (expected '{PLAN_VERSION}')",
                    plan.plan_version
                ),
            )
            .with_hint(format!("set plan_version to \"{PLAN_VERSION}\"")),
        );
    }

    if plan.length > RECOMMENDED_MAX_LENGTH {
        report.push(
            ValidationIssue::warning(
                "length_large",
                "/length",
                format!(
                    "length {} exceeds {RECOMMENDED_MAX_LENGTH}; the search grows exponentially",
                    plan.length
                ),
            )
            .with_hint("add rules that prune early or lower the length"),
        );
    }
}

fn validate_domain(plan: &GenerationPlan, report: &mut ValidationReport) {
    let PlanDomain::Characters { alphabet } = &plan.domain else {
        return;
    };

    if let Err(err) = validate_symbols(alphabet) {
        report.push(
            ValidationIssue::error("invalid_alphabet", "/domain/alphabet", err.to_string())
                .with_hint("list each symbol once and drop empty entries"),
        );
    }

    if alphabet.is_empty() && plan.length > 0 {
        report.push(ValidationIssue::warning(
            "alphabet_empty",
            "/domain/alphabet",
            "empty alphabet produces no sequences of positive length",
        ));
    }
}

fn validate_rules(plan: &GenerationPlan, report: &mut ValidationReport) -> Vec<RuleKind> {
    let mut resolved = Vec::new();
    let mut seen = HashSet::new();

    for (idx, name) in plan.rules.iter().enumerate() {
        let path = format!("/rules/{idx}");
        let Some(kind) = RuleKind::from_name_in(name, plan.domain.kind()) else {
            report.push(
                ValidationIssue::error(
                    "unknown_rule",
                    path,
                    format!("rule '{name}' is not in the catalog"),
                )
                .with_hint(format!("known rules: {}", known_rule_ids())),
            );
            continue;
        };

        if !seen.insert(kind) {
            report.push(ValidationIssue::warning(
                "duplicate_rule",
                path,
                format!("rule '{}' is selected more than once", kind.id()),
            ));
            continue;
        }

        if matches!(plan.domain, PlanDomain::Numeric)
            && kind.category() == RuleCategory::Alphabetic
            && kind != RuleKind::AlphabeticalOrder
        {
            report.push(ValidationIssue::warning(
                "rule_not_applicable",
                path,
                format!("rule '{}' classifies letters but the domain is numeric", kind.id()),
            ));
        }

        resolved.push(kind);
    }

    resolved
}

fn validate_conflicts(plan: &GenerationPlan, rules: &[RuleKind], report: &mut ValidationReport) {
    let Some((first, second)) = find_conflict(rules) else {
        return;
    };

    let issue = match plan.conflict_policy {
        ConflictPolicy::Reject => ValidationIssue::error(
            "conflicting_rules",
            "/rules",
            format!("rules '{first}' and '{second}' are mutually exclusive"),
        )
        .with_hint("remove one of them or set conflict_policy to prefer_decreasing"),
        ConflictPolicy::PreferDecreasing => ValidationIssue::warning(
            "rule_dropped",
            "/rules",
            format!("rules '{first}' and '{second}' conflict; the increasing rule is dropped"),
        ),
    };
    report.push(issue);
}

fn validate_custom(plan: &GenerationPlan, report: &mut ValidationReport) {
    let length = plan.length;
    let mut names = HashSet::new();

    for (idx, rule) in plan.custom.iter().enumerate() {
        let base_path = format!("/custom/{idx}");

        if rule.name.trim().is_empty() {
            report.push(ValidationIssue::error(
                "custom_name_empty",
                format!("{base_path}/name"),
                "custom rule name must not be empty",
            ));
        } else if RuleKind::from_name_in(&rule.name, plan.domain.kind()).is_some()
            || !names.insert(rule.name.as_str())
        {
            report.push(
                ValidationIssue::error(
                    "custom_name_taken",
                    format!("{base_path}/name"),
                    format!("name '{}' is already used", rule.name),
                )
                .with_hint("give each custom rule a unique name"),
            );
        }

        if rule.expr.trim().is_empty() {
            report.push(ValidationIssue::error(
                "expression_empty",
                format!("{base_path}/expr"),
                "custom rule expression must not be empty",
            ));
        }

        let unreachable = match &rule.scope {
            Scope::Every => false,
            Scope::First | Scope::Final => length == 0,
            Scope::Positions(positions) => positions
                .iter()
                .any(|position| *position >= length as usize),
        };
        if unreachable {
            report.push(ValidationIssue::warning(
                "scope_out_of_range",
                format!("{base_path}/scope"),
                format!("scope names positions outside sequences of length {length}"),
            ));
        }
    }
}

fn known_rule_ids() -> String {
    RuleKind::ALL
        .iter()
        .map(|kind| kind.id())
        .collect::<Vec<_>>()
        .join(", ")
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
