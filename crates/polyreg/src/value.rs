// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic field values.

use crate::object::TypedObject;

/// A field value held by a [`TypedObject`].
///
/// Mirrors the JSON data model, with one addition: a nested tagged object
/// that was resolved against a registry decodes to `Object` rather than
/// staying a raw map.  Untagged maps stay `Raw`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<FieldValue>),
    /// A decoded polymorphic envelope.
    Object(Box<TypedObject>),
    /// A JSON map without a discriminator field.
    Raw(serde_json::Map<String, serde_json::Value>),
}

impl FieldValue {
    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64.  Integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Try to get as str.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as list.
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as decoded nested object.
    pub fn as_object(&self) -> Option<&TypedObject> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as raw JSON map.
    pub fn as_raw(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        match self {
            Self::Raw(v) => Some(v),
            _ => None,
        }
    }

    /// Shallow conversion from a JSON value.
    ///
    /// Maps become `Raw` regardless of any discriminator field they carry;
    /// registry-aware decoding lives in [`crate::envelope`].
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(0.0)),
            },
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(map) => Self::Raw(map),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(v: Vec<FieldValue>) -> Self {
        Self::List(v)
    }
}

impl From<TypedObject> for FieldValue {
    fn from(v: TypedObject) -> Self {
        Self::Object(Box::new(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        assert_eq!(FieldValue::Bool(true).as_bool(), Some(true));
        assert_eq!(FieldValue::Integer(7).as_i64(), Some(7));
        assert_eq!(FieldValue::Integer(7).as_f64(), Some(7.0));
        assert_eq!(FieldValue::Text("x".into()).as_str(), Some("x"));
        assert!(FieldValue::Null.is_null());
        assert_eq!(FieldValue::Text("x".into()).as_i64(), None);
    }

    #[test]
    fn from_json_scalars() {
        assert_eq!(
            FieldValue::from_json(serde_json::json!(42)),
            FieldValue::Integer(42)
        );
        assert_eq!(
            FieldValue::from_json(serde_json::json!(2.5)),
            FieldValue::Float(2.5)
        );
        assert_eq!(
            FieldValue::from_json(serde_json::json!("s")),
            FieldValue::Text("s".into())
        );
        assert_eq!(FieldValue::from_json(serde_json::json!(null)), FieldValue::Null);
    }

    #[test]
    fn from_json_composites() {
        let list = FieldValue::from_json(serde_json::json!([1, "two"]));
        assert_eq!(
            list,
            FieldValue::List(vec![FieldValue::Integer(1), FieldValue::Text("two".into())])
        );

        let raw = FieldValue::from_json(serde_json::json!({"a": 1}));
        assert!(raw.as_raw().is_some());
    }
}
