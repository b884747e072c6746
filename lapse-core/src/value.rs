//! Runtime values in Lapse
//!
//! Values can be integers, text, booleans, durations, objects (for help
//! output), lists, null, or errors. Errors propagate through function calls.

use crate::{DurationValue, LapseError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Runtime value passed to and returned from functions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Number(i64),
    Text(String),
    Bool(bool),
    Duration(DurationValue),
    Object(HashMap<String, Value>),
    List(Vec<Value>),
    Null,
    Error(LapseError),
}

impl Value {
    // ========== Safe Accessors (never panic) ==========

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<&DurationValue> {
        match self {
            Value::Duration(d) => Some(d),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn is_duration(&self) -> bool {
        matches!(self, Value::Duration(_))
    }

    // ========== Object Field Access ==========

    /// Get field from object. Returns Error value if not found or not an object.
    pub fn get(&self, key: &str) -> Value {
        match self {
            Value::Object(map) => {
                map.get(key).cloned().unwrap_or_else(|| {
                    Value::Error(LapseError::undefined_field(key))
                })
            }
            Value::Error(e) => Value::Error(e.clone()),
            _ => Value::Error(LapseError::type_error("Object", self.type_name())),
        }
    }

    /// Type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Text(_) => "Text",
            Value::Bool(_) => "Bool",
            Value::Duration(_) => "Duration",
            Value::Object(_) => "Object",
            Value::List(_) => "List",
            Value::Null => "Null",
            Value::Error(_) => "Error",
        }
    }

    // ========== Type Coercion ==========

    /// Convert to duration (may return Error)
    ///
    /// Text is parsed as an ISO 8601 duration. Numbers are not coerced:
    /// a bare count has no unit.
    pub fn to_duration(&self) -> Value {
        match self {
            Value::Duration(d) => Value::Duration(d.clone()),
            Value::Text(s) => match DurationValue::parse(s) {
                Ok(d) => Value::Duration(d),
                Err(e) => Value::Error(e.into()),
            },
            Value::Error(e) => Value::Error(e.clone()),
            _ => Value::Error(LapseError::type_error("Duration", self.type_name())),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Duration(d) => write!(f, "{}", d),
            Value::Object(_) => write!(f, "[Object]"),
            Value::List(items) => {
                // Small lists show their contents, large ones a count
                if items.len() <= 5 {
                    let contents: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                    write!(f, "[{}]", contents.join(", "))
                } else {
                    write!(f, "[{}]", items.len())
                }
            }
            Value::Null => write!(f, "null"),
            Value::Error(e) => write!(f, "#ERROR: {}", e.code),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

// From implementations for convenience
impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<DurationValue> for Value {
    fn from(d: DurationValue) -> Self {
        Value::Duration(d)
    }
}

impl From<LapseError> for Value {
    fn from(e: LapseError) -> Self {
        Value::Error(e)
    }
}
