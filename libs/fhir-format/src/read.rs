//! JSON → element tree, guided by a schema context
//!
//! The reader is strict about structure (unknown properties, duplicate
//! choice keys, and shape mismatches are errors) but produces elements
//! through the unchecked builder path: cardinality and reference-target
//! conformance are the validator's concern, not the parser's.

use crate::FormatError;
use cuprum_model::{Element, ElementBuilder, Extension, Node, Reference, Value};
use cuprum_schema::{ChoiceType, FieldDef, FieldKind, PrimitiveKind, SchemaContext, TypeSchema};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::str::FromStr;

type Result<T> = std::result::Result<T, FormatError>;

/// Parse JSON text into an element of the named type
pub fn from_json_str<C: SchemaContext>(text: &str, type_name: &str, ctx: &C) -> Result<Element> {
    let value: JsonValue = serde_json::from_str(text)?;
    from_json(&value, type_name, ctx)
}

/// Parse a resource object, taking the type from its `resourceType`
pub fn from_json_resource<C: SchemaContext>(value: &JsonValue, ctx: &C) -> Result<Element> {
    let obj = value.as_object().ok_or(FormatError::ExpectedObject)?;
    let type_name = obj
        .get("resourceType")
        .and_then(JsonValue::as_str)
        .ok_or(FormatError::MissingResourceType)?;
    from_json(value, type_name, ctx)
}

/// Parse a JSON object into an element of the named type
pub fn from_json<C: SchemaContext>(value: &JsonValue, type_name: &str, ctx: &C) -> Result<Element> {
    let schema = ctx
        .schema(type_name)
        .ok_or_else(|| FormatError::UnknownType(type_name.to_string()))?;
    let obj = value.as_object().ok_or(FormatError::ExpectedObject)?;

    let mut builder = Element::builder(schema.clone());
    let mut seen_choices: Vec<String> = Vec::new();

    for (key, val) in obj {
        match key.as_str() {
            "resourceType" => {
                let found = val.as_str().ok_or(FormatError::Shape {
                    key: key.clone(),
                    expected: "a string",
                })?;
                if !schema.is_resource() {
                    return Err(FormatError::UnknownKey {
                        type_name: schema.name.clone(),
                        key: key.clone(),
                    });
                }
                if found != schema.name {
                    return Err(FormatError::ResourceTypeMismatch {
                        expected: schema.name.clone(),
                        found: found.to_string(),
                    });
                }
            }
            "id" => {
                let id = val.as_str().ok_or(FormatError::Shape {
                    key: key.clone(),
                    expected: "a string",
                })?;
                builder = builder.id(id);
            }
            "meta" => {
                builder = builder.meta(serde_json::from_value(val.clone())?);
            }
            "extension" => {
                for ext in parse_extensions(key, val, ctx)? {
                    builder = builder.extension(ext);
                }
            }
            "modifierExtension" => {
                for ext in parse_extensions(key, val, ctx)? {
                    builder = builder.modifier_extension(ext);
                }
            }
            _ => {
                let (def, choice) =
                    resolve_field(&schema, key).ok_or_else(|| FormatError::UnknownKey {
                        type_name: schema.name.clone(),
                        key: key.clone(),
                    })?;
                builder = apply_field(builder, def, choice, key, val, ctx, &mut seen_choices)?;
            }
        }
    }

    Ok(builder.build_unchecked())
}

/// Match a JSON key to a schema field: either a plain field by name, or
/// a choice field through its type-suffixed spelling.
fn resolve_field<'a>(
    schema: &'a TypeSchema,
    key: &str,
) -> Option<(&'a FieldDef, Option<ChoiceType>)> {
    if let Some(def) = schema.field_def(key) {
        // A bare choice name is never a valid JSON spelling
        if !def.kind.is_choice() {
            return Some((def, None));
        }
        return None;
    }

    for def in &schema.fields {
        if let FieldKind::Choice(types) = &def.kind {
            for alt in types {
                if key == format!("{}{}", def.name, alt.json_suffix()) {
                    return Some((def, Some(alt.clone())));
                }
            }
        }
    }
    None
}

#[allow(clippy::too_many_arguments)]
fn apply_field<C: SchemaContext>(
    builder: ElementBuilder,
    def: &FieldDef,
    choice: Option<ChoiceType>,
    key: &str,
    val: &JsonValue,
    ctx: &C,
    seen_choices: &mut Vec<String>,
) -> Result<ElementBuilder> {
    if let Some(alt) = choice {
        if seen_choices.iter().any(|f| f == &def.name) {
            return Err(FormatError::DuplicateChoice {
                field: def.name.clone(),
            });
        }
        seen_choices.push(def.name.clone());
        let node = parse_choice_node(&alt, key, val, ctx)?;
        return Ok(builder.set(&def.name, node));
    }

    if def.is_array() {
        let items = val.as_array().ok_or(FormatError::Shape {
            key: key.to_string(),
            expected: "an array",
        })?;
        let mut nodes = Vec::with_capacity(items.len());
        for item in items {
            nodes.push(parse_plain_node(def, key, item, ctx)?);
        }
        Ok(builder.set_many(&def.name, nodes))
    } else {
        if val.is_array() {
            return Err(FormatError::Shape {
                key: key.to_string(),
                expected: "a single value, not an array",
            });
        }
        let node = parse_plain_node(def, key, val, ctx)?;
        Ok(builder.set(&def.name, node))
    }
}

fn parse_plain_node<C: SchemaContext>(
    def: &FieldDef,
    key: &str,
    val: &JsonValue,
    ctx: &C,
) -> Result<Node> {
    match &def.kind {
        FieldKind::Primitive(kind) => Ok(Node::Value(parse_primitive(*kind, key, val)?)),
        FieldKind::Complex(type_name) => Ok(Node::Element(from_json(val, type_name, ctx)?)),
        FieldKind::Reference { .. } => Ok(Node::Reference(parse_reference(key, val)?)),
        FieldKind::Choice(_) => unreachable!("choice fields resolve through suffixed keys"),
    }
}

fn parse_choice_node<C: SchemaContext>(
    alt: &ChoiceType,
    key: &str,
    val: &JsonValue,
    ctx: &C,
) -> Result<Node> {
    match alt {
        ChoiceType::Primitive(kind) => Ok(Node::Value(parse_primitive(*kind, key, val)?)),
        ChoiceType::Complex(name) if name == "Reference" => {
            Ok(Node::Reference(parse_reference(key, val)?))
        }
        ChoiceType::Complex(name) => Ok(Node::Element(from_json(val, name, ctx)?)),
    }
}

fn parse_primitive(kind: PrimitiveKind, key: &str, val: &JsonValue) -> Result<Value> {
    let shape = |expected: &'static str| FormatError::Shape {
        key: key.to_string(),
        expected,
    };

    match kind {
        PrimitiveKind::String => Ok(Value::string(val.as_str().ok_or(shape("a string"))?)),
        PrimitiveKind::Boolean => Ok(Value::boolean(val.as_bool().ok_or(shape("a boolean"))?)),
        PrimitiveKind::Integer => {
            let n = val.as_i64().ok_or(shape("an integer"))?;
            let n = i32::try_from(n).map_err(|_| shape("a 32-bit integer"))?;
            Ok(Value::integer(n))
        }
        PrimitiveKind::Integer64 => {
            // R5 rule: integer64 travels as a string; tolerate numbers
            if let Some(s) = val.as_str() {
                s.parse::<i64>()
                    .map(Value::integer64)
                    .map_err(|_| shape("a 64-bit integer string"))
            } else {
                val.as_i64()
                    .map(Value::integer64)
                    .ok_or(shape("a 64-bit integer string"))
            }
        }
        PrimitiveKind::Decimal => {
            let n = val.as_number().ok_or(shape("a decimal number"))?;
            Decimal::from_str(&n.to_string())
                .map(Value::decimal)
                .map_err(|_| shape("a decimal number"))
        }
        PrimitiveKind::Date => Ok(Value::date(val.as_str().ok_or(shape("a date string"))?)?),
        PrimitiveKind::DateTime => Ok(Value::date_time(
            val.as_str().ok_or(shape("a dateTime string"))?,
        )?),
        PrimitiveKind::Time => Ok(Value::time(val.as_str().ok_or(shape("a time string"))?)?),
        PrimitiveKind::Uri => Ok(Value::uri(val.as_str().ok_or(shape("a uri string"))?)),
        PrimitiveKind::Code => Ok(Value::code(val.as_str().ok_or(shape("a code string"))?)?),
        PrimitiveKind::Id => Ok(Value::id(val.as_str().ok_or(shape("an id string"))?)?),
    }
}

fn parse_reference(key: &str, val: &JsonValue) -> Result<Reference> {
    let obj = val.as_object().ok_or(FormatError::Shape {
        key: key.to_string(),
        expected: "an object",
    })?;

    let text = |prop: &str| -> Result<Option<String>> {
        match obj.get(prop) {
            None => Ok(None),
            Some(JsonValue::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(FormatError::Shape {
                key: format!("{}.{}", key, prop),
                expected: "a string",
            }),
        }
    };

    Ok(Reference {
        reference: text("reference")?,
        type_tag: text("type")?,
        display: text("display")?,
    })
}

fn parse_extensions<C: SchemaContext>(
    key: &str,
    val: &JsonValue,
    ctx: &C,
) -> Result<Vec<Extension>> {
    let items = val.as_array().ok_or(FormatError::Shape {
        key: key.to_string(),
        expected: "an array",
    })?;

    items
        .iter()
        .map(|item| parse_extension(item, ctx))
        .collect()
}

fn parse_extension<C: SchemaContext>(val: &JsonValue, ctx: &C) -> Result<Extension> {
    let obj = val.as_object().ok_or(FormatError::ExpectedObject)?;

    let url = obj
        .get("url")
        .and_then(JsonValue::as_str)
        .ok_or(FormatError::Shape {
            key: "extension.url".to_string(),
            expected: "a string",
        })?;

    let mut extension = Extension::new(url);
    for (key, item) in obj {
        if key == "url" {
            continue;
        }
        let Some(suffix) = key.strip_prefix("value") else {
            return Err(FormatError::UnknownKey {
                type_name: "Extension".to_string(),
                key: key.clone(),
            });
        };
        if extension.value.is_some() {
            return Err(FormatError::DuplicateChoice {
                field: "value".to_string(),
            });
        }
        extension.value = Some(parse_suffixed_node(suffix, key, item, ctx)?);
    }
    Ok(extension)
}

fn parse_suffixed_node<C: SchemaContext>(
    suffix: &str,
    key: &str,
    val: &JsonValue,
    ctx: &C,
) -> Result<Node> {
    let lowercased = lowercase_first(suffix);
    if let Some(kind) = PrimitiveKind::from_name(&lowercased) {
        return Ok(Node::Value(parse_primitive(kind, key, val)?));
    }
    if suffix == "Reference" {
        return Ok(Node::Reference(parse_reference(key, val)?));
    }
    Ok(Node::Element(from_json(val, suffix, ctx)?))
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
