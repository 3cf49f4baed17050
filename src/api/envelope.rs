//! Response envelope normalization.
//!
//! Endpoints wrap their payload inconsistently. Every shape the API is known
//! to produce is handled here so the rest of the crate sees plain records.
//!
//! List precedence:
//! 1. the payload itself is an array
//! 2. `data` is an array
//! 3. `data.data` is an array (paginator wrapping a resource collection)
//! 4. a named field (`products`, `categories`) is an array
//!
//! Anything else normalizes to an empty list.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Whether the envelope reports success.
///
/// Success is the default: only a literal `"status": false` negates it.
pub fn is_success(payload: &Value) -> bool {
    payload.get("status") != Some(&Value::Bool(false))
}

/// Human-readable reason carried by a rejected envelope.
pub fn rejection_message(payload: &Value) -> String {
    payload
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "request was not successful".to_string())
}

/// Extract the record list from a list envelope.
pub fn extract_list<'a>(payload: &'a Value, named: &str) -> &'a [Value] {
    if let Some(items) = payload.as_array() {
        return items;
    }

    let data = payload.get("data");
    if let Some(items) = data.and_then(Value::as_array) {
        return items;
    }
    if let Some(items) = data.and_then(|d| d.get("data")).and_then(Value::as_array) {
        return items;
    }
    if let Some(items) = payload.get(named).and_then(Value::as_array) {
        return items;
    }

    &[]
}

/// Pagination metadata from `meta` or `data.meta`, passed through untouched.
pub fn extract_meta(payload: &Value) -> Option<Value> {
    payload
        .get("meta")
        .filter(|m| !m.is_null())
        .or_else(|| payload.get("data").and_then(|d| d.get("meta")))
        .filter(|m| !m.is_null())
        .cloned()
}

/// Extract a single record: `data` object, then the named field, then the
/// payload itself when it has neither.
pub fn extract_object<'a>(payload: &'a Value, named: &str) -> Option<&'a Map<String, Value>> {
    if let Some(object) = payload.get("data").and_then(Value::as_object) {
        return Some(object);
    }
    if let Some(object) = payload.get(named).and_then(Value::as_object) {
        return Some(object);
    }

    let object = payload.as_object()?;
    let wrapped = object.get("data").is_some_and(|v| !v.is_null())
        || object.get(named).is_some_and(|v| !v.is_null());
    (!wrapped).then_some(object)
}

/// Settings object: `data` when it is an object, else the payload itself.
pub fn extract_settings(payload: &Value) -> Map<String, Value> {
    payload
        .get("data")
        .and_then(Value::as_object)
        .or_else(|| payload.as_object())
        .cloned()
        .unwrap_or_default()
}

/// Decode each record independently; records that don't fit `T` are skipped.
pub fn decode_items<T: DeserializeOwned>(values: &[Value], what: &str) -> Vec<T> {
    let mut items = Vec::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        match serde_json::from_value::<T>(value.clone()) {
            Ok(item) => items.push(item),
            Err(e) => {
                tracing::warn!(what, index, error = %e, "Skipping malformed record");
            }
        }
    }
    items
}
