//! Value types for bloq query evaluation
//!
//! This module provides the core Value enum that represents every result a
//! query function can produce. The language is dynamically typed end to end,
//! so functions exchange values of this small closed set of kinds.

use serde::ser::{SerializeMap, SerializeSeq};
use serde_json::{Number as JsonNumber, Value as JsonValue};
use std::collections::HashMap;

use crate::error::Error;

/// A JSON-like value produced and consumed by query functions
#[derive(Clone, Debug)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (i64)
    Int(i64),
    /// Float value (f64)
    Float(f64),
    /// String value
    String(String),
    /// Array of values
    Array(Vec<Value>),
    /// Object (key-value pairs)
    Object(HashMap<String, Value>),
}

impl Value {
    /// Create a new string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }
}

impl Value {
    /// Check if value is null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the type name of this value
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Borrow the string content, if this is a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer content, if this is an integer
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Render as a plain string: strings without quotes, everything else
    /// in its display form
    #[must_use]
    pub fn to_raw_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> crate::Result<JsonValue> {
        match self {
            Value::Null => Ok(JsonValue::Null),
            Value::Bool(b) => Ok(JsonValue::Bool(*b)),
            Value::Int(i) => Ok(JsonValue::Number(JsonNumber::from(*i))),
            Value::Float(f) => JsonNumber::from_f64(*f)
                .map(JsonValue::Number)
                .ok_or_else(|| Error::Json(format!("invalid float: {f}"))),
            Value::String(s) => Ok(JsonValue::String(s.clone())),
            Value::Array(arr) => {
                let json_arr: crate::Result<Vec<JsonValue>> =
                    arr.iter().map(Value::to_json).collect();
                Ok(JsonValue::Array(json_arr?))
            }
            Value::Object(obj) => {
                let json_obj: crate::Result<serde_json::Map<String, JsonValue>> = obj
                    .iter()
                    .map(|(k, v)| v.to_json().map(|json_v| (k.clone(), json_v)))
                    .collect();
                Ok(JsonValue::Object(json_obj?))
            }
        }
    }

    /// Convert from JSON value
    pub fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    Value::Null
                }
            }
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(arr) => Value::Array(arr.into_iter().map(Value::from_json).collect()),
            JsonValue::Object(obj) => Value::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Get length for array-like values
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Array(arr) => Some(arr.len()),
            Value::String(s) => Some(s.len()),
            Value::Object(obj) => Some(obj.len()),
            _ => None,
        }
    }

    /// Check if value is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Index into arrays, negative indexes count from the end
    pub fn index(&self, idx: i64) -> crate::Result<Value> {
        match self {
            Value::Array(arr) => {
                #[allow(clippy::cast_possible_wrap)]
                let len = arr.len() as i64;
                let index = if idx < 0 { len + idx } else { idx };

                if index >= 0 && index < len {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    Ok(arr[index as usize].clone())
                } else {
                    Ok(Value::Null)
                }
            }
            Value::Null => Ok(Value::Null),
            _ => Err(Error::type_mismatch("array", self)),
        }
    }

    /// Get field from object-like values, missing keys yield null
    pub fn field(&self, key: &str) -> crate::Result<Value> {
        match self {
            Value::Null => Ok(Value::Null),
            Value::Object(obj) => Ok(obj.get(key).cloned().unwrap_or(Value::Null)),
            Value::Array(arr) => {
                // Numeric segments index, anything else maps over elements
                if let Ok(idx) = key.parse::<i64>() {
                    return self.index(idx);
                }
                let mut result = Vec::with_capacity(arr.len());
                for item in arr {
                    result.push(item.field(key)?);
                }
                Ok(Value::Array(result))
            }
            _ => Err(Error::type_mismatch("object", self)),
        }
    }

    /// Get nested field path from object-like values
    pub fn field_path<S: AsRef<str>>(&self, fields: &[S]) -> crate::Result<Value> {
        let mut result = self.clone();
        for field in fields {
            result = result.field(field.as_ref())?;
        }
        Ok(result)
    }

    /// Strict nested lookup: every segment must exist
    ///
    /// Missing keys fail with `PathNotFound` naming the full path, and
    /// descending into a scalar fails with `TypeMismatch`.
    pub fn lookup_path<S: AsRef<str>>(&self, fields: &[S]) -> crate::Result<&Value> {
        let mut current = self;
        for field in fields {
            let key = field.as_ref();
            current = match current {
                Value::Object(obj) => obj.get(key).ok_or_else(|| Error::PathNotFound(join(fields)))?,
                Value::Array(arr) => {
                    let idx = key
                        .parse::<usize>()
                        .map_err(|_| Error::PathNotFound(join(fields)))?;
                    arr.get(idx).ok_or_else(|| Error::PathNotFound(join(fields)))?
                }
                other => return Err(Error::type_mismatch("object", other)),
            };
        }
        Ok(current)
    }
}

fn join<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(".")
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            // Cross-type numeric comparisons
            #[allow(clippy::cast_precision_loss)]
            (Value::Int(a), Value::Float(b)) => *a as f64 == *b,
            #[allow(clippy::cast_precision_loss)]
            (Value::Float(a), Value::Int(b)) => *a == *b as f64,
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(fl) => write!(f, "{fl}"),
            Value::String(s) => write!(f, "\"{s}\""),
            Value::Array(arr) => {
                write!(f, "[")?;
                for (i, item) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Object(obj) => {
                // Sorted so the rendering is stable across runs
                let mut keys: Vec<&String> = obj.keys().collect();
                keys.sort();
                write!(f, "{{")?;
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{key}\": {}", obj[key])?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for item in arr {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (key, value) in obj {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        Value::from_json(json)
    }
}
