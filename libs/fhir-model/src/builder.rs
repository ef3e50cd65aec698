//! The mutable accumulator
//!
//! Builders collect field values through chained calls and freeze into
//! an immutable [`Element`] at `build()`, which runs the full structural
//! validation pass unless explicitly bypassed with `build_unchecked()`.
//! Builders are not thread-safe and are meant to be confined to one
//! owner during accumulation.

use crate::element::{Element, FieldValue, Meta, Node};
use crate::extension::Extension;
use crate::validate::{validate_element, ValidationError};
use cuprum_schema::TypeSchema;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ElementBuilder {
    schema: Arc<TypeSchema>,
    id: Option<String>,
    extensions: Vec<Extension>,
    modifier_extensions: Vec<Extension>,
    meta: Option<Meta>,
    staged: Vec<(String, FieldValue)>,
}

impl ElementBuilder {
    pub(crate) fn new(schema: Arc<TypeSchema>) -> Self {
        Self {
            schema,
            id: None,
            extensions: Vec::new(),
            modifier_extensions: Vec::new(),
            meta: None,
            staged: Vec::new(),
        }
    }

    pub(crate) fn from_element(element: &Element) -> Self {
        Self {
            schema: element.schema.clone(),
            id: element.id.clone(),
            extensions: element.extensions.clone(),
            modifier_extensions: element.modifier_extensions.clone(),
            meta: element.meta.clone(),
            staged: element.fields.clone(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn extension(mut self, extension: Extension) -> Self {
        self.extensions.push(extension);
        self
    }

    pub fn modifier_extension(mut self, extension: Extension) -> Self {
        self.modifier_extensions.push(extension);
        self
    }

    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Set a field, replacing any staged content
    pub fn set(mut self, field: &str, node: impl Into<Node>) -> Self {
        let node = node.into();
        match self.entry(field) {
            Some(slot) => *slot = FieldValue::Single(node),
            None => self
                .staged
                .push((field.to_string(), FieldValue::Single(node))),
        }
        self
    }

    /// Set a list field wholesale, replacing any staged content
    pub fn set_many(mut self, field: &str, nodes: Vec<Node>) -> Self {
        match self.entry(field) {
            Some(slot) => *slot = FieldValue::Many(nodes),
            None => self.staged.push((field.to_string(), FieldValue::Many(nodes))),
        }
        self
    }

    /// Append one entry to a field, promoting a scalar stage to a list
    pub fn add(mut self, field: &str, node: impl Into<Node>) -> Self {
        let node = node.into();
        match self.entry(field) {
            Some(slot) => {
                let prev = std::mem::replace(slot, FieldValue::Many(Vec::new()));
                *slot = match prev {
                    FieldValue::Many(mut nodes) => {
                        nodes.push(node);
                        FieldValue::Many(nodes)
                    }
                    FieldValue::Single(first) => FieldValue::Many(vec![first, node]),
                };
            }
            None => self
                .staged
                .push((field.to_string(), FieldValue::Many(vec![node]))),
        }
        self
    }

    /// Remove a staged field entirely
    pub fn unset(mut self, field: &str) -> Self {
        self.staged.retain(|(name, _)| name != field);
        self
    }

    /// Freeze and validate. Every violated invariant is reported in one
    /// [`ValidationError`]; no instance is produced on failure.
    pub fn build(self) -> Result<Element, ValidationError> {
        let element = self.freeze();
        let violations = validate_element(&element);
        if violations.is_empty() {
            Ok(element)
        } else {
            Err(ValidationError {
                type_name: element.type_name().to_string(),
                violations,
            })
        }
    }

    /// Freeze without validation, for trusted reconstruction paths. The
    /// produced instance carries no correctness guarantee.
    pub fn build_unchecked(self) -> Element {
        self.freeze()
    }

    fn entry(&mut self, field: &str) -> Option<&mut FieldValue> {
        self.staged
            .iter_mut()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Order staged fields by schema declaration (unknown names keep
    /// insertion order at the end) and normalize shape: declared lists
    /// always freeze as `Many`, scalars staged as a one-entry list
    /// collapse back to `Single`.
    fn freeze(self) -> Element {
        let mut staged = self.staged;
        let mut fields = Vec::with_capacity(staged.len());

        for def in &self.schema.fields {
            if let Some(pos) = staged.iter().position(|(name, _)| *name == def.name) {
                let (name, value) = staged.remove(pos);
                fields.push((name, normalize(value, def.is_array())));
            }
        }
        // Unknown fields survive the freeze so validation can name them
        fields.extend(staged);

        Element {
            schema: self.schema,
            id: self.id,
            extensions: self.extensions,
            modifier_extensions: self.modifier_extensions,
            meta: self.meta,
            fields,
        }
    }
}

fn normalize(value: FieldValue, is_array: bool) -> FieldValue {
    match (value, is_array) {
        (FieldValue::Single(node), true) => FieldValue::Many(vec![node]),
        (FieldValue::Many(mut nodes), false) if nodes.len() == 1 => {
            FieldValue::Single(nodes.remove(0))
        }
        (value, _) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use cuprum_schema::{Cardinality, FieldDef, FieldKind, PrimitiveKind, TypeKind};

    fn schema() -> Arc<TypeSchema> {
        Arc::new(
            TypeSchema::new("ContactPoint", TypeKind::Complex)
                .field(FieldDef::new(
                    "system",
                    FieldKind::Primitive(PrimitiveKind::Code),
                    Cardinality::optional(),
                ))
                .field(FieldDef::new(
                    "value",
                    FieldKind::Primitive(PrimitiveKind::String),
                    Cardinality::optional(),
                ))
                .field(FieldDef::new(
                    "rank",
                    FieldKind::Primitive(PrimitiveKind::Integer),
                    Cardinality::optional(),
                )),
        )
    }

    #[test]
    fn freeze_orders_fields_by_schema() {
        let element = Element::builder(schema())
            .set("rank", Value::integer(1))
            .set("system", Value::code("phone").unwrap())
            .build()
            .unwrap();

        let names: Vec<&str> = element.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["system", "rank"]);
    }

    #[test]
    fn set_replaces_add_appends() {
        let element = Element::builder(schema())
            .set("value", Value::string("first"))
            .set("value", Value::string("second"))
            .build()
            .unwrap();
        assert_eq!(element.value("value").unwrap().as_str(), Some("second"));

        let doubled = Element::builder(schema())
            .add("value", Value::string("a"))
            .add("value", Value::string("b"))
            .build_unchecked();
        assert_eq!(doubled.field("value").unwrap().len(), 2);
    }

    #[test]
    fn scalar_single_entry_list_collapses() {
        let element = Element::builder(schema())
            .add("value", Value::string("only"))
            .build()
            .unwrap();
        assert!(matches!(
            element.field("value"),
            Some(FieldValue::Single(_))
        ));
    }

    #[test]
    fn unset_removes_staged_content() {
        let element = Element::builder(schema())
            .set("value", Value::string("gone"))
            .set("rank", Value::integer(2))
            .unset("value")
            .build()
            .unwrap();
        assert!(element.field("value").is_none());
        assert!(element.field("rank").is_some());
    }
}
