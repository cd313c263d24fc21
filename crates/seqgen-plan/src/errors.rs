use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    /// The plan cannot be generated from.
    Error,
    /// The plan runs, but probably not as intended.
    Warning,
}

/// One problem found in a plan, located by a JSON pointer into the plan
/// document (`/rules/2`, `/custom/0/expr`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    /// Stable snake_case code, e.g. `unknown_rule`.
    pub code: String,
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ValidationIssue {
    pub fn error(code: &str, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_severity(IssueSeverity::Error, code, path, message)
    }

    pub fn warning(code: &str, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_severity(IssueSeverity::Warning, code, path, message)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    fn with_severity(
        severity: IssueSeverity,
        code: &str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code: code.to_string(),
            path: path.into(),
            message: message.into(),
            hint: None,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.code, self.path, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

/// Everything found wrong with a plan, split by severity.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// A plan with only warnings can still be generated from.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        match issue.severity {
            IssueSeverity::Error => self.errors.push(issue),
            IssueSeverity::Warning => self.warnings.push(issue),
        }
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Errors on one line, used when a report becomes an error value.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Failures loading a plan or compiling the plan schema.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to read plan: {0}")]
    Io(#[from] std::io::Error),
    #[error("plan is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("plan is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("plan schema does not compile: {0}")]
    Schema(String),
    #[error("unsupported plan extension '{0}'; use .json or .toml")]
    Format(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_are_filed_by_severity() {
        let mut report = ValidationReport::default();
        report.push(
            ValidationIssue::error("unknown_rule", "/rules/0", "rule 'x' is not in the catalog")
                .with_hint("see `seqgen rules`"),
        );
        report.push(ValidationIssue::warning("length_large", "/length", "length 20"));

        assert!(!report.is_ok());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(
            report.summary(),
            "unknown_rule at /rules/0: rule 'x' is not in the catalog (hint: see `seqgen rules`)"
        );
    }

    #[test]
    fn absent_hints_are_not_serialized() {
        let issue = ValidationIssue::warning("alphabet_empty", "/domain/alphabet", "empty");
        let json = serde_json::to_value(&issue).expect("serialize issue");
        assert_eq!(json["severity"], "warning");
        assert!(json.get("hint").is_none());
    }
}
