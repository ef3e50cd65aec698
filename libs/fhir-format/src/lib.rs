//! JSON reading and writing for element trees.
//! The implementation is schema-guided and follows the official JSON
//! mapping rules used by HL7 FHIR:
//! - Root resource objects carry a `resourceType` property.
//! - Choice fields serialize as the field name plus the capitalized
//!   concrete type name (`deceasedBoolean`).
//! - Repeating fields are JSON arrays; scalars never are.
//! - `integer64` values travel as JSON strings.
//!
//! Writing is implemented as a [`cuprum_visit::Visitor`] so the
//! serializer exercises the same traversal contract as any other
//! consumer. Reading produces elements through the unchecked builder
//! path; semantic validation is the validator's job.

mod read;
mod write;

pub use read::{from_json, from_json_resource, from_json_str};
pub use write::{to_json, to_json_string, JsonWriter};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("expected a JSON object")]
    ExpectedObject,

    #[error("missing resourceType property")]
    MissingResourceType,

    #[error("resourceType '{found}' does not match expected type '{expected}'")]
    ResourceTypeMismatch { expected: String, found: String },

    #[error("unknown type '{0}'")]
    UnknownType(String),

    #[error("unknown property '{key}' for type '{type_name}'")]
    UnknownKey { type_name: String, key: String },

    #[error("choice field '{field}' is populated more than once")]
    DuplicateChoice { field: String },

    #[error("property '{key}' expects {expected}")]
    Shape { key: String, expected: &'static str },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] cuprum_model::Error),
}

/// Capitalize the first character, for choice-type JSON key suffixes
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
