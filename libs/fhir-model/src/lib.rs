//! Generic FHIR element model
//!
//! One schema-driven [`Element`] representation stands in for the usual
//! per-resource generated classes: instances carry their [`TypeSchema`]
//! and a field list in declaration order, and a single structural
//! validator enforces cardinality, choice-type, and reference-target
//! constraints for every type.
//!
//! # Lifecycle
//!
//! Elements are immutable. Construction is accumulate-then-freeze:
//!
//! ```rust
//! use std::sync::Arc;
//! use cuprum_model::{Element, Value};
//! use cuprum_schema::{TypeSchema, TypeKind, FieldDef, FieldKind, PrimitiveKind, Cardinality};
//!
//! let schema = Arc::new(
//!     TypeSchema::new("Coding", TypeKind::Complex)
//!         .field(FieldDef::new(
//!             "system",
//!             FieldKind::Primitive(PrimitiveKind::Uri),
//!             Cardinality::optional(),
//!         ))
//!         .field(FieldDef::new(
//!             "code",
//!             FieldKind::Primitive(PrimitiveKind::Code),
//!             Cardinality::required(),
//!         )),
//! );
//!
//! let coding = Element::builder(schema)
//!     .set("system", Value::uri("http://loinc.org"))
//!     .set("code", Value::code("8867-4").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(coding.value("code").unwrap().as_str(), Some("8867-4"));
//! ```
//!
//! `build()` collects every violated invariant into one
//! [`ValidationError`]; `build_unchecked()` is the explicit opt-out for
//! trusted reconstruction paths. "Editing" an instance means deriving a
//! new builder with [`Element::to_builder`].

pub mod builder;
pub mod element;
pub mod error;
pub mod extension;
pub mod reference;
pub mod validate;
pub mod value;

pub use builder::ElementBuilder;
pub use element::{Element, FieldValue, Meta, Node};
pub use error::{Error, Result};
pub use extension::Extension;
pub use reference::Reference;
pub use validate::{validate_element, ValidationError, Violation};
pub use value::Value;
