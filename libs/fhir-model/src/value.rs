//! Primitive wrapper values
//!
//! Lexical rules for date, dateTime, time, code, and id follow the HL7
//! FHIR datatype definitions; constructors for those kinds are fallible
//! and reject malformed literals at the boundary, so a stored [`Value`]
//! is always lexically well-formed.

use crate::error::{Error, Result};
use cuprum_schema::PrimitiveKind;
use regex::Regex;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A primitive wrapper value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Boolean(bool),
    Integer(i32),
    Integer64(i64),
    Decimal(Decimal),
    Date(String),
    DateTime(String),
    Time(String),
    Uri(String),
    Code(String),
    Id(String),
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1]))?)?$",
        )
        .expect("date regex must compile")
    })
}

fn date_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1])(T([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?(Z|(\+|-)((0[0-9]|1[0-3]):[0-5][0-9]|14:00))?)?)?)?$",
        )
        .expect("dateTime regex must compile")
    })
}

fn time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?$")
            .expect("time regex must compile")
    })
}

fn code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s]+( [^\s]+)*$").expect("code regex must compile"))
}

fn id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9\-\.]{1,64}$").expect("id regex must compile"))
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    pub fn boolean(b: bool) -> Self {
        Self::Boolean(b)
    }

    pub fn integer(i: i32) -> Self {
        Self::Integer(i)
    }

    pub fn integer64(i: i64) -> Self {
        Self::Integer64(i)
    }

    pub fn decimal(d: Decimal) -> Self {
        Self::Decimal(d)
    }

    /// Parse a decimal literal, preserving precision
    pub fn decimal_str(s: &str) -> Result<Self> {
        Decimal::from_str(s)
            .map(Self::Decimal)
            .map_err(|_| Error::InvalidValue {
                kind: "decimal",
                value: s.to_string(),
            })
    }

    /// A date literal: year, year-month, or full date
    pub fn date(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if date_re().is_match(&s) {
            Ok(Self::Date(s))
        } else {
            Err(Error::InvalidValue {
                kind: "date",
                value: s,
            })
        }
    }

    /// A dateTime literal: any date precision, optionally with time and
    /// timezone offset
    pub fn date_time(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if date_time_re().is_match(&s) {
            Ok(Self::DateTime(s))
        } else {
            Err(Error::InvalidValue {
                kind: "dateTime",
                value: s,
            })
        }
    }

    pub fn time(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if time_re().is_match(&s) {
            Ok(Self::Time(s))
        } else {
            Err(Error::InvalidValue {
                kind: "time",
                value: s,
            })
        }
    }

    /// A uri literal; any non-whitespace string is accepted
    pub fn uri(s: impl Into<String>) -> Self {
        Self::Uri(s.into())
    }

    pub fn code(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if code_re().is_match(&s) {
            Ok(Self::Code(s))
        } else {
            Err(Error::InvalidValue {
                kind: "code",
                value: s,
            })
        }
    }

    pub fn id(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if id_re().is_match(&s) {
            Ok(Self::Id(s))
        } else {
            Err(Error::InvalidValue {
                kind: "id",
                value: s,
            })
        }
    }

    /// The concrete primitive type name ("string", "dateTime", ...)
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// The schema kind this value belongs to
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::String(_) => PrimitiveKind::String,
            Self::Boolean(_) => PrimitiveKind::Boolean,
            Self::Integer(_) => PrimitiveKind::Integer,
            Self::Integer64(_) => PrimitiveKind::Integer64,
            Self::Decimal(_) => PrimitiveKind::Decimal,
            Self::Date(_) => PrimitiveKind::Date,
            Self::DateTime(_) => PrimitiveKind::DateTime,
            Self::Time(_) => PrimitiveKind::Time,
            Self::Uri(_) => PrimitiveKind::Uri,
            Self::Code(_) => PrimitiveKind::Code,
            Self::Id(_) => PrimitiveKind::Id,
        }
    }

    pub fn matches_kind(&self, kind: PrimitiveKind) -> bool {
        self.kind() == kind
    }

    /// Textual content for string-shaped kinds
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s)
            | Self::Date(s)
            | Self::DateTime(s)
            | Self::Time(s)
            | Self::Uri(s)
            | Self::Code(s)
            | Self::Id(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(i64::from(*i)),
            Self::Integer64(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s)
            | Self::Date(s)
            | Self::DateTime(s)
            | Self::Time(s)
            | Self::Uri(s)
            | Self::Code(s)
            | Self::Id(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Integer64(i) => write!(f, "{}", i),
            Self::Decimal(d) => write!(f, "{}", d),
        }
    }
}
