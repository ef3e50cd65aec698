use crate::{ConfigError, ValidationPlan, ValidatorConfig};
use cuprum_model::{validate_element, Element, FieldValue, Node, Violation};
use cuprum_schema::SchemaContext;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Reusable validator - owns plan and schema context
pub struct Validator<C: SchemaContext> {
    plan: ValidationPlan,
    context: Arc<C>,
}

impl<C: SchemaContext> Validator<C> {
    pub fn new(plan: ValidationPlan, context: C) -> Self {
        Self {
            plan,
            context: Arc::new(context),
        }
    }

    pub fn from_config(config: &ValidatorConfig, context: C) -> Result<Self, ConfigError> {
        let plan = config.compile()?;
        Ok(Self::new(plan, context))
    }

    /// Validate a full element tree, attributing every issue to its
    /// dotted field path
    pub fn validate(&self, resource: &Element) -> ValidationOutcome {
        let outcome =
            ValidationRun::new(&self.plan, self.context.as_ref(), resource).execute();
        tracing::debug!(
            resource_type = %resource.type_name(),
            valid = outcome.valid,
            issues = outcome.issues.len(),
            "validation run finished"
        );
        outcome
    }

    pub fn validate_batch(&self, resources: &[Element]) -> Vec<ValidationOutcome> {
        resources.iter().map(|r| self.validate(r)).collect()
    }

    pub fn plan(&self) -> &ValidationPlan {
        &self.plan
    }

    pub fn context(&self) -> &Arc<C> {
        &self.context
    }
}

/// Short-lived validation execution
struct ValidationRun<'a> {
    plan: &'a ValidationPlan,
    context: &'a dyn SchemaContext,
    resource: &'a Element,
    issues: Vec<ValidationIssue>,
    stopped: bool,
}

impl<'a> ValidationRun<'a> {
    fn new(plan: &'a ValidationPlan, context: &'a dyn SchemaContext, resource: &'a Element) -> Self {
        Self {
            plan,
            context,
            resource,
            issues: Vec::new(),
            stopped: false,
        }
    }

    fn execute(mut self) -> ValidationOutcome {
        let root_path = self.resource.type_name().to_string();
        self.check_element(&root_path, self.resource);

        ValidationOutcome {
            resource_type: Some(self.resource.type_name().to_string()),
            valid: !has_errors(&self.issues),
            issues: self.issues,
        }
    }

    fn check_element(&mut self, path: &str, element: &Element) {
        if self.stopped {
            return;
        }

        if !self.context.contains(element.type_name()) {
            self.push(
                ValidationIssue::warning(
                    IssueCode::Unknown,
                    format!(
                        "type '{}' is not registered in the schema context",
                        element.type_name()
                    ),
                )
                .with_location(path.to_string()),
            );
        }

        for violation in validate_element(element) {
            if !self.plan.check_references
                && matches!(violation, Violation::ReferenceType { .. })
            {
                continue;
            }
            let issue = issue_for(&violation, path);
            self.push(issue);
            if self.stopped {
                return;
            }
        }

        if self.plan.fail_fast && has_errors(&self.issues) {
            self.stopped = true;
            return;
        }

        // Descend, in declaration order, with indexed paths for lists
        for (name, value) in element.fields() {
            match value {
                FieldValue::Single(Node::Element(child)) => {
                    let child_path = format!("{}.{}", path, name);
                    self.check_element(&child_path, child);
                }
                FieldValue::Many(nodes) => {
                    for (i, node) in nodes.iter().enumerate() {
                        if let Node::Element(child) = node {
                            let child_path = format!("{}.{}[{}]", path, name, i);
                            self.check_element(&child_path, child);
                        }
                    }
                }
                _ => {}
            }
            if self.stopped {
                return;
            }
        }
    }

    fn push(&mut self, issue: ValidationIssue) {
        if self.issues.len() >= self.plan.max_issues {
            self.stopped = true;
            return;
        }
        self.issues.push(issue);
    }
}

fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues
        .iter()
        .any(|i| i.severity == IssueSeverity::Error || i.severity == IssueSeverity::Fatal)
}

/// Map one structural violation to a reportable issue
fn issue_for(violation: &Violation, element_path: &str) -> ValidationIssue {
    let code = match violation {
        Violation::RequiredMissing { .. } | Violation::BelowMinimum { .. } => IssueCode::Required,
        Violation::ChoiceType { .. } | Violation::ReferenceType { .. } => IssueCode::Value,
        Violation::EmptyElement => IssueCode::Invariant,
        Violation::AboveMaximum { .. }
        | Violation::EmptyValue { .. }
        | Violation::EmptyEntry { .. }
        | Violation::TypeMismatch { .. }
        | Violation::UnknownField { .. } => IssueCode::Structure,
    };

    let location = match violation {
        Violation::RequiredMissing { field }
        | Violation::BelowMinimum { field, .. }
        | Violation::AboveMaximum { field, .. }
        | Violation::EmptyValue { field }
        | Violation::ChoiceType { field, .. }
        | Violation::TypeMismatch { field, .. }
        | Violation::UnknownField { field } => format!("{}.{}", element_path, field),
        Violation::EmptyEntry { field, index } => {
            format!("{}.{}[{}]", element_path, field, index)
        }
        Violation::ReferenceType {
            field,
            entry: Some(index),
            ..
        } => format!("{}.{}[{}]", element_path, field, index),
        Violation::ReferenceType {
            field, entry: None, ..
        } => format!("{}.{}", element_path, field),
        Violation::EmptyElement => element_path.to_string(),
    };

    ValidationIssue::error(code, violation.to_string()).with_location(location)
}

/// Validation result for a single resource
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub resource_type: Option<String>,
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    pub fn has_errors(&self) -> bool {
        !self.valid
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error || i.severity == IssueSeverity::Fatal)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
            .count()
    }

    pub fn to_operation_outcome(&self) -> JsonValue {
        serde_json::json!({
            "resourceType": "OperationOutcome",
            "issue": self.issues.iter().map(|i| i.to_json()).collect::<Vec<_>>()
        })
    }
}

/// Individual validation issue
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: IssueCode,
    pub diagnostics: String,
    pub location: Option<String>,
}

impl ValidationIssue {
    pub fn error(code: IssueCode, diagnostics: String) -> Self {
        Self {
            severity: IssueSeverity::Error,
            code,
            diagnostics,
            location: None,
        }
    }

    pub fn warning(code: IssueCode, diagnostics: String) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            code,
            diagnostics,
            location: None,
        }
    }

    pub fn with_location(mut self, location: String) -> Self {
        self.location = Some(location);
        self
    }

    fn to_json(&self) -> JsonValue {
        let mut issue = serde_json::json!({
            "severity": self.severity.to_string().to_lowercase(),
            "code": self.code.to_string(),
            "diagnostics": self.diagnostics,
        });

        if let Some(ref loc) = self.location {
            issue["expression"] = serde_json::json!([loc]);
        }

        issue
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Fatal,
    Error,
    Warning,
    Information,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fatal => write!(f, "Fatal"),
            Self::Error => write!(f, "Error"),
            Self::Warning => write!(f, "Warning"),
            Self::Information => write!(f, "Information"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCode {
    Invalid,
    Structure,
    Required,
    Value,
    Invariant,
    Unknown,
    Informational,
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Invalid => "invalid",
            Self::Structure => "structure",
            Self::Required => "required",
            Self::Value => "value",
            Self::Invariant => "invariant",
            Self::Unknown => "unknown",
            Self::Informational => "informational",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_counts() {
        let outcome = ValidationOutcome {
            resource_type: Some("Patient".to_string()),
            valid: false,
            issues: vec![
                ValidationIssue::error(IssueCode::Required, "missing field".to_string()),
                ValidationIssue::warning(IssueCode::Unknown, "unknown type".to_string()),
            ],
        };

        assert!(outcome.has_errors());
        assert_eq!(outcome.error_count(), 1);
        assert_eq!(outcome.warning_count(), 1);
    }

    #[test]
    fn operation_outcome_shape() {
        let outcome = ValidationOutcome {
            resource_type: Some("Patient".to_string()),
            valid: false,
            issues: vec![ValidationIssue::error(
                IssueCode::Required,
                "required field 'status' is missing".to_string(),
            )
            .with_location("Patient.status".to_string())],
        };

        let op_outcome = outcome.to_operation_outcome();
        assert_eq!(op_outcome["resourceType"], "OperationOutcome");
        assert_eq!(op_outcome["issue"][0]["severity"], "error");
        assert_eq!(op_outcome["issue"][0]["code"], "required");
        assert_eq!(op_outcome["issue"][0]["expression"][0], "Patient.status");
    }
}
