use std::sync::Arc;

use tracing::warn;

use seqgen_core::{Alphabet, Domain};
use seqgen_plan::{
    GenerationPlan, PlanDomain, ValidationIssue, ValidationReport, validate_plan_semantics,
};

use crate::errors::GenerationError;
use crate::expr::{Expr, ExprPredicate};
use crate::model::GenerationRequest;
use crate::predicate::Predicate;
use crate::rules::RuleRegistry;

/// Build a generation request from a plan.
///
/// The plan is validated first; validation errors become
/// `GenerationError::InvalidPlan` and warnings are logged. Custom
/// expressions are compiled here, so a request built from a plan never
/// fails on an expression at search time.
pub fn request_from_plan(plan: &GenerationPlan) -> Result<GenerationRequest, GenerationError> {
    let report = validate_plan_semantics(plan);
    if !report.is_ok() {
        return Err(GenerationError::InvalidPlan(report.summary()));
    }
    for issue in &report.warnings {
        warn!(code = %issue.code, path = %issue.path, message = %issue.message, "plan warning");
    }

    let domain = match &plan.domain {
        PlanDomain::Characters { alphabet } => Domain::Characters {
            alphabet: Alphabet::from_strings(alphabet)?,
        },
        PlanDomain::Numeric => Domain::Numeric,
    };

    let length = usize::try_from(plan.length).map_err(|_| {
        GenerationError::InvalidRequest(format!("length {} is too large", plan.length))
    })?;

    let rules = RuleRegistry::global().resolve(&plan.rules, domain.kind())?;

    let mut custom: Vec<Arc<dyn Predicate>> = Vec::with_capacity(plan.custom.len());
    for rule in &plan.custom {
        let predicate = ExprPredicate::compile(&rule.name, &rule.expr, rule.scope.clone())?;
        custom.push(Arc::new(predicate));
    }

    Ok(GenerationRequest {
        domain,
        length,
        rules,
        custom,
        conflict_policy: plan.conflict_policy,
    })
}

/// Compile every custom expression of a plan, reporting each failure as an
/// `invalid_expression` error at `/custom/<idx>/expr`. Unlike
/// [`request_from_plan`], which stops at the first broken expression, this
/// lists all of them.
///
/// Blank expressions are left to [`validate_plan_semantics`], which already
/// flags them.
pub fn validate_expressions(plan: &GenerationPlan) -> ValidationReport {
    let mut report = ValidationReport::default();
    for (idx, rule) in plan.custom.iter().enumerate() {
        if rule.expr.trim().is_empty() {
            continue;
        }
        if let Err(err) = Expr::compile(&rule.expr) {
            report.push(ValidationIssue::error(
                "invalid_expression",
                format!("/custom/{idx}/expr"),
                format!("custom rule '{}': {err}", rule.name),
            ));
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use seqgen_core::Scope;
    use seqgen_plan::CustomRule;

    use super::*;

    fn numeric_with(exprs: &[&str]) -> GenerationPlan {
        let mut plan = GenerationPlan::new(PlanDomain::Numeric, 2);
        plan.custom = exprs
            .iter()
            .enumerate()
            .map(|(idx, expr)| CustomRule {
                name: format!("c{idx}"),
                expr: expr.to_string(),
                scope: Scope::Every,
            })
            .collect();
        plan
    }

    #[test]
    fn broken_expressions_are_reported_with_their_path() {
        let plan = numeric_with(&["num(candidate) > 2", "candidate +", "nope(1)"]);
        let report = validate_expressions(&plan);

        let paths: Vec<&str> = report.errors.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, ["/custom/1/expr", "/custom/2/expr"]);
        assert!(report.errors.iter().all(|i| i.code == "invalid_expression"));
        assert!(report.errors[1].message.contains("unknown function 'nope'"));
    }

    #[test]
    fn blank_expressions_are_left_to_semantic_validation() {
        let plan = numeric_with(&["  "]);
        assert!(validate_expressions(&plan).is_ok());
        assert!(!validate_plan_semantics(&plan).is_ok());
    }
}
