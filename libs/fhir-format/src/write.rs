//! Element tree → JSON, driven by the visitor dispatcher

use crate::capitalize;
use cuprum_model::{Element, Extension, Node, Reference, Value};
use cuprum_schema::{FieldKind, TypeSchema};
use cuprum_visit::{walk, Visitor};
use rust_decimal::prelude::ToPrimitive;
use serde_json::{json, Map, Value as JsonValue};
use std::sync::Arc;

/// Serialize an element tree to a JSON value
pub fn to_json(element: &Element) -> JsonValue {
    let mut writer = JsonWriter::new();
    walk(element.type_name(), element, &mut writer);
    writer.into_value()
}

/// Serialize an element tree to pretty-printed JSON text
pub fn to_json_string(element: &Element) -> String {
    let value = to_json(element);
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "null".to_string())
}

/// A [`Visitor`] that accumulates the JSON rendering of the walked tree
pub struct JsonWriter {
    stack: Vec<Frame>,
    root: Option<JsonValue>,
}

struct Frame {
    map: Map<String, JsonValue>,
    schema: Arc<TypeSchema>,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            root: None,
        }
    }

    /// The finished rendering; `Null` if nothing was walked
    pub fn into_value(self) -> JsonValue {
        self.root.unwrap_or(JsonValue::Null)
    }

    /// Insert a finished property into the innermost open object (or the
    /// root slot), appending to an array entry when the child came out
    /// of a list field.
    fn insert(&mut self, name: &str, index: Option<usize>, node_type: &str, value: JsonValue) {
        let Some(frame) = self.stack.last_mut() else {
            self.root = Some(value);
            return;
        };
        let key = json_key(&frame.schema, name, node_type);
        match index {
            None | Some(0) => {
                let slot = if index.is_some() {
                    JsonValue::Array(vec![value])
                } else {
                    value
                };
                frame.map.insert(key, slot);
            }
            Some(_) => {
                if let Some(JsonValue::Array(entries)) = frame.map.get_mut(&key) {
                    entries.push(value);
                }
            }
        }
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Visitor for JsonWriter {
    fn visit_start(&mut self, _name: &str, _index: Option<usize>, element: &Element) {
        let mut map = Map::new();
        if element.schema().is_resource() {
            map.insert(
                "resourceType".to_string(),
                JsonValue::String(element.type_name().to_string()),
            );
        }
        if let Some(id) = element.id() {
            map.insert("id".to_string(), JsonValue::String(id.to_string()));
        }
        if let Some(meta) = element.meta() {
            if let Ok(meta) = serde_json::to_value(meta) {
                map.insert("meta".to_string(), meta);
            }
        }
        if !element.extensions().is_empty() {
            map.insert(
                "extension".to_string(),
                extensions_to_json(element.extensions()),
            );
        }
        if !element.modifier_extensions().is_empty() {
            map.insert(
                "modifierExtension".to_string(),
                extensions_to_json(element.modifier_extensions()),
            );
        }

        self.stack.push(Frame {
            map,
            schema: element.schema().clone(),
        });
    }

    fn visit_end(&mut self, name: &str, index: Option<usize>, element: &Element) {
        let frame = match self.stack.pop() {
            Some(frame) => frame,
            None => return,
        };
        self.insert(name, index, element.type_name(), JsonValue::Object(frame.map));
    }

    fn visit_value(&mut self, name: &str, index: Option<usize>, value: &Value) {
        self.insert(name, index, value.type_name(), value_to_json(value));
    }

    fn visit_reference(&mut self, name: &str, index: Option<usize>, reference: &Reference) {
        self.insert(name, index, "Reference", reference_to_json(reference));
    }
}

fn json_key(schema: &TypeSchema, field: &str, node_type: &str) -> String {
    match schema.field_def(field).map(|def| &def.kind) {
        Some(FieldKind::Choice(types)) => {
            let suffix = types
                .iter()
                .find(|t| t.type_name() == node_type)
                .map(|t| t.json_suffix())
                .unwrap_or_else(|| capitalize(node_type));
            format!("{}{}", field, suffix)
        }
        _ => field.to_string(),
    }
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::String(s)
        | Value::Date(s)
        | Value::DateTime(s)
        | Value::Time(s)
        | Value::Uri(s)
        | Value::Code(s)
        | Value::Id(s) => JsonValue::String(s.clone()),
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Integer(i) => json!(*i),
        // integer64 exceeds interoperable JSON number precision
        Value::Integer64(i) => JsonValue::String(i.to_string()),
        Value::Decimal(d) => d
            .to_f64()
            .and_then(serde_json::Number::from_f64)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(d.to_string())),
    }
}

fn reference_to_json(reference: &Reference) -> JsonValue {
    let mut map = Map::new();
    if let Some(literal) = &reference.reference {
        map.insert("reference".to_string(), JsonValue::String(literal.clone()));
    }
    if let Some(tag) = &reference.type_tag {
        map.insert("type".to_string(), JsonValue::String(tag.clone()));
    }
    if let Some(display) = &reference.display {
        map.insert("display".to_string(), JsonValue::String(display.clone()));
    }
    JsonValue::Object(map)
}

fn extensions_to_json(extensions: &[Extension]) -> JsonValue {
    JsonValue::Array(extensions.iter().map(extension_to_json).collect())
}

fn extension_to_json(extension: &Extension) -> JsonValue {
    let mut map = Map::new();
    map.insert(
        "url".to_string(),
        JsonValue::String(extension.url.clone()),
    );
    if let Some(node) = &extension.value {
        let key = format!("value{}", capitalize(node.type_name()));
        map.insert(key, node_to_json(node));
    }
    JsonValue::Object(map)
}

fn node_to_json(node: &Node) -> JsonValue {
    match node {
        Node::Value(value) => value_to_json(value),
        Node::Reference(reference) => reference_to_json(reference),
        // A nested walk renders element-valued extension content
        Node::Element(element) => to_json(element),
    }
}
