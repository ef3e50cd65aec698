//! Error types for the element model

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid {kind} value '{value}'")]
    InvalidValue { kind: &'static str, value: String },

    #[error(transparent)]
    Validation(#[from] crate::validate::ValidationError),
}
