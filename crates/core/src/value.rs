//! Comparable field values
//!
//! A [`Value`] is one JSON literal interpreted under a declared
//! [`FieldType`]. Strings carry the [`Collation`] they were built with, and
//! that collation governs every comparison where the string is on the left.
//!
//! ## Comparison rules
//!
//! - `Int` and `Double` compare numerically with each other
//! - `Null` equals only `Null`
//! - Arrays compare element by element, then by length
//! - Objects support equality only
//! - Any other pair of different types is incomparable (`None`)

use crate::collation::Collation;
use crate::error::{Error, Result};
use crate::schema::FieldType;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;
use uuid::Uuid;

/// String together with its collation
#[derive(Debug, Clone, PartialEq)]
pub struct StringValue {
    value: String,
    collation: Collation,
}

impl StringValue {
    /// Create a string value
    pub fn new(value: impl Into<String>, collation: Collation) -> Self {
        StringValue {
            value: value.into(),
            collation,
        }
    }

    /// The raw string
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Collation this string compares under
    pub fn collation(&self) -> Collation {
        self.collation
    }
}

/// Typed, comparable field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit null or an absent field
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Double(f64),
    /// Collated string
    String(StringValue),
    /// Decoded bytes
    Bytes(Vec<u8>),
    /// UUID
    Uuid(Uuid),
    /// Timestamp with offset
    DateTime(DateTime<FixedOffset>),
    /// Array of values
    Array(Vec<Value>),
    /// Object, compared structurally
    Object(serde_json::Map<String, serde_json::Value>),
}

impl Value {
    /// Build a value from JSON under the given type
    ///
    /// `null` always becomes [`Value::Null`]. An `Unknown` type is resolved
    /// from the shape of the JSON value.
    pub fn from_json(
        field_type: FieldType,
        raw: &serde_json::Value,
        collation: Option<Collation>,
    ) -> Result<Value> {
        if raw.is_null() {
            return Ok(Value::Null);
        }
        let collation = collation.unwrap_or_default();
        let field_type = match field_type {
            FieldType::Unknown => FieldType::of_json(raw),
            declared => declared,
        };

        let mismatch = || Error::InvalidValue {
            field_type: field_type.name(),
            reason: format!("cannot read {} as {}", json_kind(raw), field_type.name()),
        };

        match field_type {
            FieldType::Bool => raw.as_bool().map(Value::Bool).ok_or_else(mismatch),
            FieldType::Int => raw.as_i64().map(Value::Int).ok_or_else(mismatch),
            FieldType::Double => raw.as_f64().map(Value::Double).ok_or_else(mismatch),
            FieldType::String => raw
                .as_str()
                .map(|s| Value::String(StringValue::new(s, collation)))
                .ok_or_else(mismatch),
            FieldType::Bytes => {
                let encoded = raw.as_str().ok_or_else(mismatch)?;
                STANDARD
                    .decode(encoded)
                    .map(Value::Bytes)
                    .map_err(|e| Error::InvalidValue {
                        field_type: field_type.name(),
                        reason: e.to_string(),
                    })
            }
            FieldType::Uuid => {
                let s = raw.as_str().ok_or_else(mismatch)?;
                Uuid::parse_str(s)
                    .map(Value::Uuid)
                    .map_err(|e| Error::InvalidValue {
                        field_type: field_type.name(),
                        reason: e.to_string(),
                    })
            }
            FieldType::DateTime => {
                let s = raw.as_str().ok_or_else(mismatch)?;
                DateTime::parse_from_rfc3339(s)
                    .map(Value::DateTime)
                    .map_err(|e| Error::InvalidValue {
                        field_type: field_type.name(),
                        reason: e.to_string(),
                    })
            }
            FieldType::Array => {
                let items = raw.as_array().ok_or_else(mismatch)?;
                items
                    .iter()
                    .map(|item| Value::from_json(FieldType::Unknown, item, Some(collation)))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array)
            }
            FieldType::Object => raw
                .as_object()
                .map(|obj| Value::Object(obj.clone()))
                .ok_or_else(mismatch),
            FieldType::Null | FieldType::Unknown => Err(mismatch()),
        }
    }

    /// Type this value was built as
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Null => FieldType::Null,
            Value::Bool(_) => FieldType::Bool,
            Value::Int(_) => FieldType::Int,
            Value::Double(_) => FieldType::Double,
            Value::String(_) => FieldType::String,
            Value::Bytes(_) => FieldType::Bytes,
            Value::Uuid(_) => FieldType::Uuid,
            Value::DateTime(_) => FieldType::DateTime,
            Value::Array(_) => FieldType::Array,
            Value::Object(_) => FieldType::Object,
        }
    }

    /// Check if this is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this is an array
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Get as str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Order `self` relative to `other`
    ///
    /// Returns `None` when the two values are not comparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Double(a), Value::Double(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Double(b)) => (*a as f64).partial_cmp(b),
            (Value::Double(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::String(a), Value::String(b)) => {
                Some(a.collation.compare(a.as_str(), b.as_str()))
            }
            (Value::Bytes(a), Value::Bytes(b)) => Some(a.cmp(b)),
            (Value::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Value::Array(a), Value::Array(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.compare(y)? {
                        Ordering::Equal => continue,
                        unequal => return Some(unequal),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            (Value::Object(a), Value::Object(b)) if a == b => Some(Ordering::Equal),
            _ => None,
        }
    }
}

fn json_kind(raw: &serde_json::Value) -> &'static str {
    match raw {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(field_type: FieldType, raw: serde_json::Value) -> Value {
        Value::from_json(field_type, &raw, None).unwrap()
    }

    #[test]
    fn test_null_is_always_null() {
        assert_eq!(v(FieldType::Int, json!(null)), Value::Null);
        assert_eq!(v(FieldType::String, json!(null)), Value::Null);
    }

    #[test]
    fn test_unknown_resolves_from_shape() {
        assert_eq!(v(FieldType::Unknown, json!(3)), Value::Double(3.0));
        assert_eq!(v(FieldType::Unknown, json!(true)), Value::Bool(true));
        assert_eq!(v(FieldType::Unknown, json!("a")).as_str(), Some("a"));
    }

    #[test]
    fn test_int_rejects_fraction() {
        let err = Value::from_json(FieldType::Int, &json!(1.5), None).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { field_type: "int", .. }));
    }

    #[test]
    fn test_type_mismatch() {
        assert!(Value::from_json(FieldType::Bool, &json!("true"), None).is_err());
        assert!(Value::from_json(FieldType::String, &json!(1), None).is_err());
        assert!(Value::from_json(FieldType::Null, &json!(1), None).is_err());
    }

    #[test]
    fn test_bytes_uuid_datetime() {
        assert_eq!(v(FieldType::Bytes, json!("aGk=")), Value::Bytes(b"hi".to_vec()));
        assert!(Value::from_json(FieldType::Bytes, &json!("%%%"), None).is_err());

        let id = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        assert_eq!(v(FieldType::Uuid, json!(id)), Value::Uuid(Uuid::parse_str(id).unwrap()));
        assert!(Value::from_json(FieldType::Uuid, &json!("nope"), None).is_err());

        let early = v(FieldType::DateTime, json!("2023-01-01T00:00:00Z"));
        let late = v(FieldType::DateTime, json!("2023-01-01T02:00:00+01:00"));
        assert_eq!(early.compare(&late), Some(Ordering::Less));
    }

    #[test]
    fn test_numeric_cross_compare() {
        assert_eq!(Value::Int(10).compare(&Value::Double(10.0)), Some(Ordering::Equal));
        assert_eq!(Value::Double(9.5).compare(&Value::Int(10)), Some(Ordering::Less));
    }

    #[test]
    fn test_cross_type_incomparable() {
        assert_eq!(Value::Int(1).compare(&v(FieldType::String, json!("1"))), None);
        assert_eq!(Value::Null.compare(&Value::Int(0)), None);
        assert_eq!(Value::Bool(false).compare(&Value::Null), None);
    }

    #[test]
    fn test_string_uses_left_collation() {
        let ci = Value::from_json(
            FieldType::String,
            &json!("ALICE"),
            Some(Collation::case_insensitive()),
        )
        .unwrap();
        let cs = v(FieldType::String, json!("alice"));
        assert_eq!(ci.compare(&cs), Some(Ordering::Equal));
        assert_eq!(cs.compare(&ci), Some(Ordering::Greater));
    }

    #[test]
    fn test_array_compare() {
        let a = v(FieldType::Array, json!([1, 2]));
        let b = v(FieldType::Array, json!([1, 2]));
        let c = v(FieldType::Array, json!([1, 2, 3]));
        let d = v(FieldType::Array, json!(["x"]));
        assert_eq!(a.compare(&b), Some(Ordering::Equal));
        assert_eq!(a.compare(&c), Some(Ordering::Less));
        assert_eq!(a.compare(&d), None);
    }

    #[test]
    fn test_array_elements_inherit_collation() {
        let arr = Value::from_json(
            FieldType::Array,
            &json!(["A"]),
            Some(Collation::case_insensitive()),
        )
        .unwrap();
        let other = v(FieldType::Array, json!(["a"]));
        assert_eq!(arr.compare(&other), Some(Ordering::Equal));
    }

    #[test]
    fn test_object_equality_only() {
        let a = v(FieldType::Object, json!({"k": 1}));
        let b = v(FieldType::Object, json!({"k": 1}));
        let c = v(FieldType::Object, json!({"k": 2}));
        assert_eq!(a.compare(&b), Some(Ordering::Equal));
        assert_eq!(a.compare(&c), None);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_scalar(collation: Collation) -> impl Strategy<Value = Value> {
            prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::Bool),
                (-5i64..5).prop_map(Value::Int),
                (-5.0f64..5.0).prop_map(Value::Double),
                "[a-cA-C]{0,3}".prop_map(move |s| Value::String(StringValue::new(s, collation))),
            ]
        }

        fn arb_value(collation: Collation) -> impl Strategy<Value = Value> {
            prop_oneof![
                arb_scalar(collation),
                prop::collection::vec(arb_scalar(collation), 0..3).prop_map(Value::Array),
            ]
        }

        fn arb_pair() -> impl Strategy<Value = (Value, Value)> {
            prop_oneof![Just(Collation::case_sensitive()), Just(Collation::case_insensitive())]
                .prop_flat_map(|c| (arb_value(c), arb_value(c)))
        }

        proptest! {
            #[test]
            fn prop_compare_is_antisymmetric((a, b) in arb_pair()) {
                prop_assert_eq!(a.compare(&b), b.compare(&a).map(Ordering::reverse));
            }

            #[test]
            fn prop_compare_is_reflexive((a, _) in arb_pair()) {
                prop_assert_eq!(a.compare(&a), Some(Ordering::Equal));
            }
        }
    }
}
