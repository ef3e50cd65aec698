//! Structural validation
//!
//! The checks every `build()` runs: presence and list cardinality,
//! choice-type membership, reference target allow-lists, and the
//! value-or-children rule. Violations are collected per element rather
//! than short-circuiting, so one failed `build()` reports everything
//! wrong with the entity at once.

use crate::element::{Element, FieldValue, Node};
use cuprum_schema::{ChoiceType, FieldDef, FieldKind, MaxCardinality};
use std::fmt;

/// One violated invariant, tied to a field of the element under check
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// Required field missing
    RequiredMissing { field: String },
    /// List below its minimum cardinality
    BelowMinimum { field: String, min: u32, len: usize },
    /// List above its maximum cardinality
    AboveMaximum { field: String, max: u32, len: usize },
    /// Scalar field entry with no content
    EmptyValue { field: String },
    /// List entry with no content (the null-placeholder analogue)
    EmptyEntry { field: String, index: usize },
    /// Populated choice field with a type outside the allowed set
    ChoiceType { field: String, found: String },
    /// Reference targeting a type outside the declared allow-list
    ReferenceType {
        field: String,
        entry: Option<usize>,
        found: String,
    },
    /// Node type does not match the field's declared type
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },
    /// Field name not declared by the schema
    UnknownField { field: String },
    /// The element itself has neither a value nor children
    EmptyElement,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequiredMissing { field } => {
                write!(f, "required field '{}' is missing", field)
            }
            Self::BelowMinimum { field, min, len } => write!(
                f,
                "field '{}' requires at least {} entries but has {}",
                field, min, len
            ),
            Self::AboveMaximum { field, max, len } => write!(
                f,
                "field '{}' allows at most {} entries but has {}",
                field, max, len
            ),
            Self::EmptyValue { field } => {
                write!(f, "field '{}' is present but has no content", field)
            }
            Self::EmptyEntry { field, index } => {
                write!(f, "field '{}' entry {} has no content", field, index)
            }
            Self::ChoiceType { field, found } => {
                write!(f, "field '{}' does not allow type '{}'", field, found)
            }
            Self::ReferenceType {
                field,
                entry: Some(index),
                found,
            } => write!(
                f,
                "field '{}' entry {} references disallowed type '{}'",
                field, index, found
            ),
            Self::ReferenceType {
                field,
                entry: None,
                found,
            } => write!(
                f,
                "field '{}' references disallowed type '{}'",
                field, found
            ),
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "field '{}' expects type '{}' but holds '{}'",
                field, expected, found
            ),
            Self::UnknownField { field } => {
                write!(f, "field '{}' is not declared for this type", field)
            }
            Self::EmptyElement => f.write_str("element has neither a value nor children"),
        }
    }
}

/// Failure surface of `build()`: every violation found in one pass
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub type_name: String,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// True if any violation concerns the named field
    pub fn mentions(&self, field: &str) -> bool {
        self.violations.iter().any(|v| match v {
            Violation::RequiredMissing { field: f }
            | Violation::BelowMinimum { field: f, .. }
            | Violation::AboveMaximum { field: f, .. }
            | Violation::EmptyValue { field: f }
            | Violation::EmptyEntry { field: f, .. }
            | Violation::ChoiceType { field: f, .. }
            | Violation::ReferenceType { field: f, .. }
            | Violation::TypeMismatch { field: f, .. }
            | Violation::UnknownField { field: f } => f == field,
            Violation::EmptyElement => false,
        })
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is invalid ({} violation{}): ",
            self.type_name,
            self.violations.len(),
            if self.violations.len() == 1 { "" } else { "s" }
        )?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Validate one element against its own schema, shallowly: nested
/// elements are assumed to have passed their own `build()` and only
/// their type membership and emptiness are re-checked here.
pub fn validate_element(element: &Element) -> Vec<Violation> {
    let schema = element.schema();
    let mut violations = Vec::new();

    for def in &schema.fields {
        check_field(def, element.field(&def.name), &mut violations);
    }

    for (name, _) in element.fields() {
        if schema.field_def(name).is_none() {
            violations.push(Violation::UnknownField {
                field: name.to_string(),
            });
        }
    }

    if let Err(v) = require_value_or_children(element) {
        violations.push(v);
    }

    violations
}

/// The value-or-children rule: an element that is structurally present
/// must carry content.
pub fn require_value_or_children(element: &Element) -> Result<(), Violation> {
    if element.has_content() {
        Ok(())
    } else {
        Err(Violation::EmptyElement)
    }
}

/// Closed-polymorphism check for one populated choice node.
pub fn check_choice(node: &Node, allowed: &[ChoiceType], field: &str) -> Result<(), Violation> {
    let found = node.type_name();
    if allowed.iter().any(|t| t.type_name() == found) {
        Ok(())
    } else {
        Err(Violation::ChoiceType {
            field: field.to_string(),
            found: found.to_string(),
        })
    }
}

/// Reference target allow-list check. References whose target type
/// cannot be determined statically are skipped, not failed.
pub fn check_reference_type(
    reference: &crate::reference::Reference,
    allowed: &[String],
    field: &str,
    entry: Option<usize>,
) -> Result<(), Violation> {
    let Some(target) = reference.target_type() else {
        return Ok(());
    };
    if allowed.iter().any(|t| t == target) {
        Ok(())
    } else {
        Err(Violation::ReferenceType {
            field: field.to_string(),
            entry,
            found: target.to_string(),
        })
    }
}

fn check_field(def: &FieldDef, value: Option<&FieldValue>, out: &mut Vec<Violation>) {
    let Some(value) = value else {
        if def.is_required() {
            out.push(Violation::RequiredMissing {
                field: def.name.clone(),
            });
        }
        return;
    };

    // A present-but-empty list is a cardinality-zero finding, distinct
    // from an absent field
    let len = value.len();
    if (len as u32) < def.cardinality.min {
        out.push(Violation::BelowMinimum {
            field: def.name.clone(),
            min: def.cardinality.min,
            len,
        });
    }
    if let MaxCardinality::Count(max) = def.cardinality.max {
        if len as u32 > max {
            out.push(Violation::AboveMaximum {
                field: def.name.clone(),
                max,
                len,
            });
        }
    }

    for (index, node) in value.nodes().iter().enumerate() {
        let entry = if def.is_array() { Some(index) } else { None };

        if node.is_empty() {
            match entry {
                Some(index) => out.push(Violation::EmptyEntry {
                    field: def.name.clone(),
                    index,
                }),
                None => out.push(Violation::EmptyValue {
                    field: def.name.clone(),
                }),
            }
            continue;
        }

        match &def.kind {
            FieldKind::Primitive(kind) => match node {
                Node::Value(v) if v.matches_kind(*kind) => {}
                _ => out.push(Violation::TypeMismatch {
                    field: def.name.clone(),
                    expected: kind.name().to_string(),
                    found: node.type_name().to_string(),
                }),
            },
            FieldKind::Complex(type_name) => match node {
                Node::Element(el) if el.type_name() == type_name => {}
                _ => out.push(Violation::TypeMismatch {
                    field: def.name.clone(),
                    expected: type_name.clone(),
                    found: node.type_name().to_string(),
                }),
            },
            FieldKind::Choice(types) => {
                if let Err(v) = check_choice(node, types, &def.name) {
                    out.push(v);
                }
            }
            FieldKind::Reference { targets } => match node {
                Node::Reference(reference) => {
                    if let Some(targets) = targets {
                        if let Err(v) = check_reference_type(reference, targets, &def.name, entry)
                        {
                            out.push(v);
                        }
                    }
                }
                _ => out.push(Violation::TypeMismatch {
                    field: def.name.clone(),
                    expected: "Reference".to_string(),
                    found: node.type_name().to_string(),
                }),
            },
        }
    }
}
