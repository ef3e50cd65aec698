use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_issues must be at least 1")]
    MaxIssuesZero,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
