//! Typed scalar values and their text form.
//!
//! Containers store attributes and dataset elements with their native type.
//! The table and the text exporter only ever see text, so the conversion in
//! both directions lives here: [`Value`]'s `Display` impl on the way out and
//! [`Value::parse_like`] on the way in.
use std::fmt;

use crate::error::{Error, Result};

/// A scalar read from, or written to, a container.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    UInt(u64),
    Float32(f32),
    Float(f64),
    Bool(bool),
    Text(String),
}

/// The type of a [`Value`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    UInt,
    Float32,
    Float,
    Bool,
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Int => "integer",
            ValueKind::UInt => "unsigned integer",
            ValueKind::Float32 => "32-bit float",
            ValueKind::Float => "float",
            ValueKind::Bool => "boolean",
            ValueKind::Text => "string",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}", v),
            // `{:?}` keeps the fractional part: 1.0 prints as "1.0", not "1".
            // Each width prints its own shortest form, so 0.1f32 stays "0.1".
            Value::Float32(v) => write!(f, "{:?}", v),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Text(v) => f.write_str(v),
        }
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::UInt(_) => ValueKind::UInt,
            Value::Float32(_) => ValueKind::Float32,
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::Text(_) => ValueKind::Text,
        }
    }

    /// Parse `text` as a value of `kind`. Surrounding whitespace is ignored
    /// for every kind except `Text`, which is taken verbatim.
    pub fn parse_as(kind: ValueKind, text: &str) -> Option<Value> {
        let trimmed = text.trim();
        match kind {
            ValueKind::Int => trimmed.parse().ok().map(Value::Int),
            ValueKind::UInt => trimmed.parse().ok().map(Value::UInt),
            ValueKind::Float32 => trimmed.parse().ok().map(Value::Float32),
            ValueKind::Float => trimmed.parse().ok().map(Value::Float),
            ValueKind::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Some(Value::Bool(true)),
                "false" | "0" | "no" => Some(Value::Bool(false)),
                _ => None,
            },
            ValueKind::Text => Some(Value::Text(text.to_string())),
        }
    }

    /// Convert user text for attribute `name`.
    ///
    /// When the attribute already exists (`existing` is `Some`) the text must
    /// parse as the stored kind so the attribute keeps its type; otherwise the
    /// new attribute is a string.
    pub fn parse_like(name: &str, existing: Option<&Value>, text: &str) -> Result<Value> {
        let kind = existing.map(Value::kind).unwrap_or(ValueKind::Text);
        Value::parse_as(kind, text).ok_or_else(|| Error::Conversion {
            name: name.to_string(),
            text: text.to_string(),
            kind,
        })
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

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float32(v)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_keep_fraction() {
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Int(-3).to_string(), "-3");
    }

    #[test]
    fn single_precision_prints_shortest_form() {
        assert_eq!(Value::Float32(0.1).to_string(), "0.1");
        assert_eq!(Value::from(1.0f32).to_string(), "1.0");
        let v = Value::parse_like("gain", Some(&Value::Float32(0.5)), "0.3").unwrap();
        assert_eq!(v, Value::Float32(0.3));
        assert_eq!(v.to_string(), "0.3");
    }

    #[test]
    fn parse_like_keeps_existing_kind() {
        let v = Value::parse_like("n", Some(&Value::Int(1)), " 42 ").unwrap();
        assert_eq!(v, Value::Int(42));

        let v = Value::parse_like("f", Some(&Value::Float(0.5)), "3").unwrap();
        assert_eq!(v, Value::Float(3.0));

        let v = Value::parse_like("b", Some(&Value::Bool(false)), "True").unwrap();
        assert_eq!(v, Value::Bool(true));
    }

    #[test]
    fn parse_like_new_attribute_is_text() {
        let v = Value::parse_like("unit", None, " m ").unwrap();
        assert_eq!(v, Value::Text(" m ".to_string()));
    }

    #[test]
    fn parse_like_rejects_mismatched_text() {
        let err = Value::parse_like("n", Some(&Value::UInt(1)), "-1").unwrap_err();
        match err {
            Error::Conversion { name, kind, .. } => {
                assert_eq!(name, "n");
                assert_eq!(kind, ValueKind::UInt);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
