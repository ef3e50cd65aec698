//! Whole-tree validation engine
//!
//! Where `cuprum-model` validates each element at its own `build()`,
//! this crate walks a complete tree after the fact (typically one read
//! from the wire through the unchecked path) and reports every
//! structural finding with a full dotted field path, in the shape of an
//! OperationOutcome-style report.
//!
//! Configuration compiles into an executable plan before any resource
//! is touched:
//!
//! ```rust
//! use cuprum_validator::{Validator, ValidatorConfig};
//! use cuprum_schema::DefaultSchemaContext;
//!
//! let config = ValidatorConfig::new().fail_fast(false).max_issues(100);
//! let validator = Validator::from_config(&config, DefaultSchemaContext::new()).unwrap();
//! # let _ = validator;
//! ```

pub mod config;
pub mod error;
pub mod validator;

pub use config::{ValidationPlan, ValidatorConfig};
pub use error::ConfigError;
pub use validator::{
    IssueCode, IssueSeverity, ValidationIssue, ValidationOutcome, Validator,
};
