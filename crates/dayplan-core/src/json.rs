//! Helpers for reading loosely-typed JSON documents.
//!
//! Saved plans are authored conversationally and drift over time, so every
//! accessor here treats a wrong type the same as a missing key.

use serde_json::{Map, Value};

/// A JSON object, as stored in every plan document.
pub type Object = Map<String, Value>;

/// Whether a value counts as "set": `null`, `false`, zero, and empty
/// strings, arrays or objects do not.
pub fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// The value under `key`, if it is set.
pub fn get_set<'a>(map: &'a Object, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| is_set(v))
}

/// The object under `key`, if the key holds an object.
pub fn get_object<'a>(map: &'a Object, key: &str) -> Option<&'a Object> {
    map.get(key).and_then(Value::as_object)
}

/// The non-empty string under `key`.
pub fn get_str<'a>(map: &'a Object, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// A display string for the value under `key`: non-empty strings as-is,
/// numbers formatted. Anything else is treated as absent.
pub fn get_text(map: &Object, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The value under `key` when the key exists (even if `null`), else `default`.
pub fn get_or(map: &Object, key: &str, default: Value) -> Value {
    map.get(key).cloned().unwrap_or(default)
}

/// The value under `key`, or `null`.
pub fn get_or_null(map: &Object, key: &str) -> Value {
    get_or(map, key, Value::Null)
}

/// The integer schema `version` of a document, if any. Integral floats
/// such as `3.0` count as their integer.
pub fn version(map: &Object) -> Option<u64> {
    let version = map.get("version")?;
    version.as_u64().or_else(|| {
        version
            .as_f64()
            .filter(|v| v.fract() == 0.0 && *v >= 0.0)
            .map(|v| v as u64)
    })
}

/// Short type name of a JSON value, for diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Object {
        value.as_object().cloned().expect("fixture must be an object")
    }

    #[test]
    fn unset_values() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!is_set(&value), "{value} should be unset");
        }
        for value in [json!(true), json!(1), json!("x"), json!([0]), json!({"a": null})] {
            assert!(is_set(&value), "{value} should be set");
        }
    }

    #[test]
    fn get_or_keeps_explicit_null() {
        let map = obj(json!({"macros": null}));
        assert_eq!(get_or(&map, "macros", json!({})), Value::Null);
        assert_eq!(get_or(&map, "meals", json!([])), json!([]));
    }

    #[test]
    fn text_accepts_strings_and_numbers_only() {
        let map = obj(json!({"a": "Cut", "b": 3, "c": "", "d": ["x"]}));
        assert_eq!(get_text(&map, "a").as_deref(), Some("Cut"));
        assert_eq!(get_text(&map, "b").as_deref(), Some("3"));
        assert_eq!(get_text(&map, "c"), None);
        assert_eq!(get_text(&map, "d"), None);
        assert_eq!(get_text(&map, "missing"), None);
    }

    #[test]
    fn version_requires_an_integer() {
        assert_eq!(version(&obj(json!({"version": 3}))), Some(3));
        assert_eq!(version(&obj(json!({"version": 3.0}))), Some(3));
        assert_eq!(version(&obj(json!({"version": 2.5}))), None);
        assert_eq!(version(&obj(json!({"version": -1}))), None);
        assert_eq!(version(&obj(json!({"version": "3"}))), None);
        assert_eq!(version(&obj(json!({}))), None);
    }
}
