//! Validator configuration and its compiled plan
//!
//! Configuration is declarative and serializable; `compile()` checks it
//! and produces the [`ValidationPlan`] the engine executes. The split
//! keeps misconfiguration failures out of the per-resource hot path.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Stop at the first element that produces an error
    pub fail_fast: bool,

    /// Hard cap on collected issues per run
    pub max_issues: usize,

    /// Check reference target allow-lists; systems that only use
    /// logical identifiers can switch this off
    pub check_references: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            max_issues: 1000,
            check_references: true,
        }
    }
}

impl ValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn max_issues(mut self, max_issues: usize) -> Self {
        self.max_issues = max_issues;
        self
    }

    pub fn check_references(mut self, check_references: bool) -> Self {
        self.check_references = check_references;
        self
    }

    /// Validate the configuration and produce an executable plan
    pub fn compile(&self) -> Result<ValidationPlan, ConfigError> {
        if self.max_issues == 0 {
            return Err(ConfigError::MaxIssuesZero);
        }
        Ok(ValidationPlan {
            fail_fast: self.fail_fast,
            max_issues: self.max_issues,
            check_references: self.check_references,
        })
    }
}

/// Compiled validation plan
#[derive(Debug, Clone)]
pub struct ValidationPlan {
    pub fail_fast: bool,
    pub max_issues: usize,
    pub check_references: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_compiles() {
        let plan = ValidatorConfig::new().compile().unwrap();
        assert!(!plan.fail_fast);
        assert_eq!(plan.max_issues, 1000);
        assert!(plan.check_references);
    }

    #[test]
    fn zero_issue_cap_rejected() {
        let err = ValidatorConfig::new().max_issues(0).compile().unwrap_err();
        assert!(matches!(err, ConfigError::MaxIssuesZero));
    }

    #[test]
    fn config_from_json() {
        let config: ValidatorConfig =
            serde_json::from_str(r#"{ "fail_fast": true, "max_issues": 10 }"#).unwrap();
        let plan = config.compile().unwrap();
        assert!(plan.fail_fast);
        assert_eq!(plan.max_issues, 10);
        assert!(plan.check_references);
    }
}
