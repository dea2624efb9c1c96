//! Dynamic value model
//!
//! Supported kinds:
//! - int: 64-bit signed integer
//! - uint: 64-bit unsigned integer (only for values above i64::MAX when read from JSON)
//! - float: 64-bit floating point
//! - string: UTF-8 string
//! - bool, seq, nested, null: stored but never ordered
//!
//! # Numbers
//!
//! Host values keep their native kind: an `i64` field becomes `Int`.
//! Numbers read back from a table file are `Float`, except integers whose
//! magnitude exceeds 2^53, which stay `Int` (or `UInt` above `i64::MAX`).
//! A `Float` holding an integer within 2^53 is written as a plain integer,
//! so `30` survives a load/flush cycle byte for byte.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::document::Document;
use crate::error::DbResult;

/// Kind tag of a [`Value`], also used as the declared kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    UInt,
    Float,
    Str,
    Seq,
    Nested,
}

impl ValueKind {
    /// Returns the kind name for error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::UInt => "uint",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::Seq => "seq",
            ValueKind::Nested => "nested",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueKind::Int | ValueKind::UInt | ValueKind::Float)
    }

    /// Numeric and string kinds have a defined ordering
    pub fn is_comparable(&self) -> bool {
        self.is_numeric() || *self == ValueKind::Str
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Largest integer magnitude an `f64` holds exactly
const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// A dynamic document value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Seq(Vec<Value>),
    Nested(Document),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::UInt(_) => ValueKind::UInt,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Seq(_) => ValueKind::Seq,
            Value::Nested(_) => ValueKind::Nested,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Nested(doc) => Some(doc),
            _ => None,
        }
    }

    /// Converts any serializable host value into a dynamic value.
    ///
    /// Structs and maps become `Nested` documents, sequences become `Seq`.
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> DbResult<Value> {
        Ok(Value::from(serde_json::to_value(value)?))
    }

    /// Reconstructs a typed host value from this dynamic value.
    pub fn decode<T: DeserializeOwned>(self) -> DbResult<T> {
        Ok(serde_json::from_value(serde_json::Value::from(self))?)
    }

    /// Converts JSON read from storage, loading numbers as `Float` unless
    /// they are integers beyond the exact `f64` range.
    pub fn from_stored(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    if u <= MAX_EXACT_INTEGER {
                        Value::Float(u as f64)
                    } else if let Ok(i) = i64::try_from(u) {
                        Value::Int(i)
                    } else {
                        Value::UInt(u)
                    }
                } else if let Some(i) = n.as_i64() {
                    if i.unsigned_abs() <= MAX_EXACT_INTEGER {
                        Value::Float(i as f64)
                    } else {
                        Value::Int(i)
                    }
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::Array(items) => {
                Value::Seq(items.into_iter().map(Value::from_stored).collect())
            }
            serde_json::Value::Object(map) => Value::Nested(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from_stored(value)))
                    .collect(),
            ),
            other => Value::from(other),
        }
    }
}

/// The integer an integral float stands for, within the exact range
fn exact_integer(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::UInt(u) => serializer.serialize_u64(*u),
            Value::Float(f) => match exact_integer(*f) {
                Some(i) => serializer.serialize_i64(i),
                None if f.is_finite() => serializer.serialize_f64(*f),
                None => serializer.serialize_unit(),
            },
            Value::Str(s) => serializer.serialize_str(s),
            Value::Seq(items) => items.serialize(serializer),
            Value::Nested(doc) => doc.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Ok(Value::from_stored(json))
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::Seq(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Nested(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::from(i),
            Value::UInt(u) => serde_json::Value::from(u),
            // Non-finite floats have no JSON representation
            Value::Float(f) => match exact_integer(f) {
                Some(i) => serde_json::Value::from(i),
                None => serde_json::Number::from_f64(f)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null),
            },
            Value::Str(s) => serde_json::Value::String(s),
            Value::Seq(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Nested(doc) => serde_json::Value::Object(
                doc.into_iter()
                    .map(|(key, value)| (key, serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::UInt(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Document> for Value {
    fn from(v: Document) -> Self {
        Value::Nested(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Seq(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
