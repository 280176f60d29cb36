//! Filter JSON parsing that rejects repeated object keys
//!
//! `serde_json::Map` keeps only the last of two equal keys, which would drop
//! a clause without telling anyone. Filters go through [`UniqueKeys`] so a
//! repeated key at any depth fails the parse instead.

use serde::de::{Deserialize, Deserializer, Error as DeError, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value as JsonValue};
use std::fmt;

/// A JSON value in which no object repeats a key
pub(crate) struct UniqueKeys(pub(crate) JsonValue);

/// Parse filter bytes, failing on the first repeated key
pub(crate) fn from_slice(raw: &[u8]) -> serde_json::Result<JsonValue> {
    serde_json::from_slice::<UniqueKeys>(raw).map(|parsed| parsed.0)
}

struct UniqueKeysVisitor;

impl<'de> Visitor<'de> for UniqueKeysVisitor {
    type Value = UniqueKeys;

    fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "a JSON value")
    }

    fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(UniqueKeys(JsonValue::Bool(value)))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(UniqueKeys(JsonValue::Number(Number::from(value))))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(UniqueKeys(JsonValue::Number(Number::from(value))))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Number::from_f64(value)
            .map(|n| UniqueKeys(JsonValue::Number(n)))
            .ok_or_else(|| E::custom("number is not finite"))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(UniqueKeys(JsonValue::String(value.to_string())))
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(UniqueKeys(JsonValue::String(value)))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(UniqueKeys(JsonValue::Null))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: DeError,
    {
        Ok(UniqueKeys(JsonValue::Null))
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        UniqueKeys::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or_default());
        while let Some(UniqueKeys(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(UniqueKeys(JsonValue::Array(items)))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut object = Map::new();
        while let Some(key) = map.next_key::<String>()? {
            if object.contains_key(&key) {
                return Err(A::Error::custom(format!("duplicate key '{}'", key)));
            }
            let UniqueKeys(value) = map.next_value()?;
            object.insert(key, value);
        }
        Ok(UniqueKeys(JsonValue::Object(object)))
    }
}

impl<'de> Deserialize<'de> for UniqueKeys {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(UniqueKeysVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_same_as_serde_json_without_repeats() {
        let raw = br#"{"a": 1, "b": [true, null, -2, 2.5, "s"], "c": {"d": {"e": 18446744073709551615}}}"#;
        let expected: JsonValue = serde_json::from_slice(raw).unwrap();
        assert_eq!(from_slice(raw).unwrap(), expected);
    }

    #[test]
    fn test_keeps_key_order() {
        let parsed = from_slice(br#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<&String> = parsed.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_rejects_top_level_repeat() {
        let err = from_slice(br#"{"f1": 10, "f1": 11}"#).unwrap_err();
        assert!(err.to_string().contains("duplicate key 'f1'"));
    }

    #[test]
    fn test_rejects_nested_repeat() {
        assert!(from_slice(br#"{"f1": {"$gt": 1, "$gt": 2}}"#).is_err());
        assert!(from_slice(br#"{"$or": [{"a": 1, "a": 2}]}"#).is_err());
    }

    #[test]
    fn test_same_key_in_sibling_objects_is_fine() {
        let parsed = from_slice(br#"{"$or": [{"a": 1}, {"a": 2}]}"#).unwrap();
        assert_eq!(parsed, json!({"$or": [{"a": 1}, {"a": 2}]}));
    }
}
