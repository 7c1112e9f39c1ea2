// src/domain/fields.rs

use serde_json::{Map, Value};
use std::sync::LazyLock;

static EMPTY: LazyLock<Map<String, Value>> = LazyLock::new(Map::new);

/// Borrow the object stored under `key`, or an empty map when the key is
/// missing or holds something that is not an object. Lets callers chain
/// into nested payloads without null checks.
pub fn obj<'a>(map: &'a Map<String, Value>, key: &str) -> &'a Map<String, Value> {
    map.get(key).and_then(Value::as_object).unwrap_or(&EMPTY)
}

/// Clone the object stored under `key`, or an empty map. Used by the
/// unpacker, which owns its sub-records.
pub fn obj_owned(map: &Map<String, Value>, key: &str) -> Map<String, Value> {
    map.get(key)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Non-empty string under `key`; whitespace-only counts as absent.
pub fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub fn bool_field(map: &Map<String, Value>, key: &str) -> Option<bool> {
    map.get(key).and_then(Value::as_bool)
}

/// Render a scalar JSON value as display text. Containers and null count
/// as absent: a payload that hands us an object where a scalar belongs is
/// treated the same as a missing field.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Scalar display text under `key`.
pub fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(scalar_text)
}

/// Evaluate an ordered `(map, key)` priority chain and return the first
/// non-empty scalar. Every "a or b or c" fallback in the derivation rules
/// goes through here so the precedence stays auditable in one place.
pub fn first_text(chain: &[(&Map<String, Value>, &str)]) -> Option<String> {
    chain.iter().find_map(|(map, key)| text_field(map, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Map<String, Value> {
        json!({
            "nested": {"inner": "x"},
            "name": "  Fremont  ",
            "blank": "   ",
            "count": 3,
            "flag": true,
            "wrong": "not an object",
            "list": [1, 2]
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn obj_returns_empty_for_missing_or_wrong_type() {
        let map = sample();
        assert_eq!(obj(&map, "nested").get("inner"), Some(&json!("x")));
        assert!(obj(&map, "missing").is_empty());
        assert!(obj(&map, "wrong").is_empty());
        assert!(obj(&map, "list").is_empty());
    }

    #[test]
    fn str_field_trims_and_drops_blank() {
        let map = sample();
        assert_eq!(str_field(&map, "name"), Some("Fremont"));
        assert_eq!(str_field(&map, "blank"), None);
        assert_eq!(str_field(&map, "count"), None);
        assert_eq!(str_field(&map, "missing"), None);
    }

    #[test]
    fn scalar_text_rejects_containers() {
        assert_eq!(scalar_text(&json!("hi")), Some("hi".to_string()));
        assert_eq!(scalar_text(&json!(42)), Some("42".to_string()));
        assert_eq!(scalar_text(&json!(true)), Some("true".to_string()));
        assert_eq!(scalar_text(&json!(null)), None);
        assert_eq!(scalar_text(&json!({"a": 1})), None);
        assert_eq!(scalar_text(&json!([1])), None);
    }

    #[test]
    fn first_text_takes_priority_order() {
        let a = json!({"date": ""}).as_object().unwrap().clone();
        let b = json!({"date": "2024-01-01"}).as_object().unwrap().clone();
        let c = json!({"date": "2023-01-01"}).as_object().unwrap().clone();

        let found = first_text(&[(&a, "date"), (&b, "date"), (&c, "date")]);
        assert_eq!(found, Some("2024-01-01".to_string()));

        assert_eq!(first_text(&[(&a, "date"), (&a, "other")]), None);
    }
}
