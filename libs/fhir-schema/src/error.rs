//! Error types for schema loading and lookup

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error reading schema: {0}")]
    Io(#[from] std::io::Error),

    #[error("schema parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate schema for type '{0}'")]
    DuplicateType(String),

    #[error("unknown primitive kind '{0}'")]
    UnknownPrimitive(String),

    #[error("schema not found for type '{0}'")]
    TypeNotFound(String),
}
