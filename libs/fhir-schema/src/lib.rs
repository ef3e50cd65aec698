//! Schema source for the cuprum element model
//!
//! Supplies, per entity type, the ordered field list, each field's
//! cardinality, its type or choice-type set, and any reference target
//! allow-list. The model and validation crates treat this as static,
//! trusted input.
//!
//! # Example
//!
//! ```rust
//! use cuprum_schema::{TypeSchema, TypeKind, FieldDef, FieldKind, PrimitiveKind, Cardinality};
//!
//! let schema = TypeSchema::new("HumanName", TypeKind::Complex)
//!     .field(FieldDef::new(
//!         "family",
//!         FieldKind::Primitive(PrimitiveKind::String),
//!         Cardinality::optional(),
//!     ))
//!     .field(FieldDef::new(
//!         "given",
//!         FieldKind::Primitive(PrimitiveKind::String),
//!         Cardinality::repeating(),
//!     ));
//!
//! assert_eq!(schema.fields.len(), 2);
//! assert!(!schema.fields[0].is_required());
//! assert!(schema.fields[1].is_array());
//! ```

pub mod context;
pub mod error;
pub mod loader;
pub mod types;

pub use context::{DefaultSchemaContext, SchemaContext};
pub use error::{Error, Result};
pub use loader::SchemaLoader;
pub use types::{
    Cardinality, ChoiceType, FieldDef, FieldKind, MaxCardinality, PrimitiveKind, TypeKind,
    TypeSchema,
};
