//! Schema data types
//!
//! A [`TypeSchema`] declares the shape of one entity type: its kind
//! (resource, complex datatype, or backbone element) and an ordered list
//! of [`FieldDef`]s. Field order is significant: it fixes traversal and
//! serialization order for every instance of the type.

use crate::error::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Schema for one entity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSchema {
    /// Type name, e.g. "Patient" or "HumanName"
    pub name: String,

    /// Structural kind of the type
    pub kind: TypeKind,

    /// Ordered field declarations
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl TypeSchema {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            fields: Vec::new(),
        }
    }

    /// Append a field declaration (fixture-building convenience)
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field by declared name
    pub fn field_def(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_resource(&self) -> bool {
        self.kind == TypeKind::Resource
    }
}

/// Structural kind of a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// Top-level entity with independent identity and metadata
    Resource,
    /// Reusable complex datatype
    Complex,
    /// Nested structural component without independent identity
    Backbone,
}

/// One field declaration inside a [`TypeSchema`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name as it appears in instances
    pub name: String,

    /// Declared type of the field
    #[serde(rename = "type")]
    pub kind: FieldKind,

    /// Occurrence constraints
    #[serde(flatten)]
    pub cardinality: Cardinality,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            kind,
            cardinality,
        }
    }

    /// Check if the field is required (min > 0)
    pub fn is_required(&self) -> bool {
        self.cardinality.min > 0
    }

    /// Check if the field is a list (max = "*" or max > 1)
    pub fn is_array(&self) -> bool {
        match self.cardinality.max {
            MaxCardinality::Many => true,
            MaxCardinality::Count(n) => n > 1,
        }
    }
}

/// Declared type of a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Primitive wrapper value
    Primitive(PrimitiveKind),

    /// Nested element of the named type
    Complex(String),

    /// Exactly one of a fixed, closed set of concrete types
    Choice(SmallVec<[ChoiceType; 4]>),

    /// Pointer to another entity, optionally constrained to target types
    Reference {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        targets: Option<SmallVec<[String; 4]>>,
    },
}

impl FieldKind {
    pub fn is_choice(&self) -> bool {
        matches!(self, FieldKind::Choice(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, FieldKind::Reference { .. })
    }
}

/// Occurrence constraints for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cardinality {
    #[serde(default)]
    pub min: u32,
    pub max: MaxCardinality,
}

impl Cardinality {
    /// 0..1
    pub fn optional() -> Self {
        Self {
            min: 0,
            max: MaxCardinality::Count(1),
        }
    }

    /// 1..1
    pub fn required() -> Self {
        Self {
            min: 1,
            max: MaxCardinality::Count(1),
        }
    }

    /// 0..*
    pub fn repeating() -> Self {
        Self {
            min: 0,
            max: MaxCardinality::Many,
        }
    }

    /// 1..*
    pub fn at_least_one() -> Self {
        Self {
            min: 1,
            max: MaxCardinality::Many,
        }
    }

    pub fn new(min: u32, max: MaxCardinality) -> Self {
        Self { min, max }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}

/// Maximum occurrence count; `Many` is the schema's "*"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxCardinality {
    Count(u32),
    Many,
}

impl fmt::Display for MaxCardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{}", n),
            Self::Many => write!(f, "*"),
        }
    }
}

impl Serialize for MaxCardinality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Count(n) => serializer.serialize_u32(*n),
            Self::Many => serializer.serialize_str("*"),
        }
    }
}

impl<'de> Deserialize<'de> for MaxCardinality {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(u32),
            Token(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Ok(Self::Count(n)),
            Raw::Token(s) if s == "*" => Ok(Self::Many),
            Raw::Token(s) => Err(serde::de::Error::custom(format!(
                "invalid max cardinality '{}', expected a number or \"*\"",
                s
            ))),
        }
    }
}

/// One alternative in a choice field's closed type set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceType {
    Primitive(PrimitiveKind),
    Complex(String),
}

impl ChoiceType {
    /// The concrete type name used for membership checks and JSON key
    /// suffixes, e.g. "boolean", "dateTime", "Period"
    pub fn type_name(&self) -> &str {
        match self {
            Self::Primitive(kind) => kind.name(),
            Self::Complex(name) => name,
        }
    }

    /// Capitalized form appended to the field name in JSON ("Boolean",
    /// "DateTime", "Period")
    pub fn json_suffix(&self) -> String {
        let name = self.type_name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }
}

impl FromStr for ChoiceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(kind) = PrimitiveKind::from_name(s) {
            Ok(Self::Primitive(kind))
        } else {
            Ok(Self::Complex(s.to_string()))
        }
    }
}

impl fmt::Display for ChoiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl Serialize for ChoiceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.type_name())
    }
}

impl<'de> Deserialize<'de> for ChoiceType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Kinds of primitive wrapper values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrimitiveKind {
    String,
    Boolean,
    Integer,
    Integer64,
    Decimal,
    Date,
    DateTime,
    Time,
    Uri,
    Code,
    Id,
}

impl PrimitiveKind {
    /// Lowercase-initial type name as declared in schemas
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Integer64 => "integer64",
            Self::Decimal => "decimal",
            Self::Date => "date",
            Self::DateTime => "dateTime",
            Self::Time => "time",
            Self::Uri => "uri",
            Self::Code => "code",
            Self::Id => "id",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            "integer" => Some(Self::Integer),
            "integer64" => Some(Self::Integer64),
            "decimal" => Some(Self::Decimal),
            "date" => Some(Self::Date),
            "dateTime" => Some(Self::DateTime),
            "time" => Some(Self::Time),
            "uri" => Some(Self::Uri),
            "code" => Some(Self::Code),
            "id" => Some(Self::Id),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
