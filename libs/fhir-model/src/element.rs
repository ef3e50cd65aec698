//! The generic element representation
//!
//! Every entity, top-level resource or nested structure, is an
//! [`Element`]: its schema, an optional id, extension lists, and fields
//! in schema declaration order. Children are exclusively owned by their
//! parent; the tree is acyclic by construction because schemas are.

use crate::builder::ElementBuilder;
use crate::extension::Extension;
use crate::reference::Reference;
use crate::value::Value;
use cuprum_schema::TypeSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// An immutable element instance
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) schema: Arc<TypeSchema>,
    pub(crate) id: Option<String>,
    pub(crate) extensions: Vec<Extension>,
    pub(crate) modifier_extensions: Vec<Extension>,
    pub(crate) meta: Option<Meta>,
    pub(crate) fields: Vec<(String, FieldValue)>,
}

impl Element {
    /// Start accumulating a new instance of the given type
    pub fn builder(schema: Arc<TypeSchema>) -> ElementBuilder {
        ElementBuilder::new(schema)
    }

    /// Derive a mutable accumulator pre-populated from this instance
    pub fn to_builder(&self) -> ElementBuilder {
        ElementBuilder::from_element(self)
    }

    pub fn schema(&self) -> &Arc<TypeSchema> {
        &self.schema
    }

    pub fn type_name(&self) -> &str {
        &self.schema.name
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    pub fn modifier_extensions(&self) -> &[Extension] {
        &self.modifier_extensions
    }

    pub fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    /// Populated fields in schema declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Single-valued field content
    pub fn single(&self, name: &str) -> Option<&Node> {
        match self.field(name)? {
            FieldValue::Single(node) => Some(node),
            FieldValue::Many(_) => None,
        }
    }

    /// List-valued field content; empty slice when absent
    pub fn many(&self, name: &str) -> &[Node] {
        match self.field(name) {
            Some(FieldValue::Many(nodes)) => nodes,
            _ => &[],
        }
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        match self.single(name)? {
            Node::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn reference(&self, name: &str) -> Option<&Reference> {
        match self.single(name)? {
            Node::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    pub fn element(&self, name: &str) -> Option<&Element> {
        match self.single(name)? {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// True iff the element itself or any populated field carries
    /// meaningful content ("every element must have either a value or
    /// children").
    pub fn has_content(&self) -> bool {
        self.id.is_some()
            || self.meta.is_some()
            || !self.extensions.is_empty()
            || !self.modifier_extensions.is_empty()
            || self.fields.iter().any(|(_, value)| !value.is_empty())
    }
}

/// A field's populated content: one node, or an ordered sequence
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Single(Node),
    Many(Vec<Node>),
}

impl FieldValue {
    /// All nodes, uniform over the single and sequence cases
    pub fn nodes(&self) -> &[Node] {
        match self {
            Self::Single(node) => std::slice::from_ref(node),
            Self::Many(nodes) => nodes,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Many(nodes) => nodes.len(),
        }
    }

    /// True when no node carries content
    pub fn is_empty(&self) -> bool {
        self.nodes().iter().all(Node::is_empty)
    }
}

/// One node in the element tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Value(Value),
    Element(Element),
    Reference(Reference),
}

impl Node {
    /// Concrete type name for choice-membership checks
    pub fn type_name(&self) -> &str {
        match self {
            Self::Value(value) => value.type_name(),
            Self::Element(element) => element.type_name(),
            Self::Reference(_) => "Reference",
        }
    }

    /// True when the node is structurally present but has no content
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Value(_) => false,
            Self::Element(element) => !element.has_content(),
            Self::Reference(reference) => reference.is_empty(),
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Reference(reference) => Some(reference),
            _ => None,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<Reference> for Node {
    fn from(reference: Reference) -> Self {
        Self::Reference(reference)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::Value(Value::string(s))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Self::Value(Value::boolean(b))
    }
}

impl From<i32> for Node {
    fn from(i: i32) -> Self {
        Self::Value(Value::integer(i))
    }
}

/// Resource-level metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl Meta {
    pub fn is_empty(&self) -> bool {
        self.version_id.is_none() && self.last_updated.is_none()
    }
}
