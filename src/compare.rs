//! Loose value comparison for checked and selected states
//!
//! Submitted input is always text, while models hold booleans and numbers.
//! A stored `true` must match a checkbox valued `"1"`, and a stored `0`
//! must match a radio valued `"0"`. Comparison goes through explicit
//! normalization instead of ambient coercion:
//!
//! - `true`, `1`, `"1"`, `"true"`  → canonical `true`
//! - `false`, `0`, `"0"`, `"false"`, `""`, `null` → canonical `false`
//! - numeric strings compare as numbers (`"2" == 2`, `"2.0" == 2`)
//! - everything else compares as text

use serde_json::Value;

/// Canonical boolean for flag-like values
pub fn as_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Null => Some(false),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 1.0 => Some(true),
            Some(f) if f == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) => match s.as_str() {
            "1" | "true" => Some(true),
            "0" | "false" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Truthiness of a value (empty strings, zero, null and empty collections are false)
pub fn truthy(value: &Value) -> bool {
    if let Some(flag) = as_flag(value) {
        return flag;
    }
    match value {
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(b) => *b,
        Value::Null => false,
    }
}

/// Text form of a scalar (booleans render as `"1"` / `""`)
///
/// Sequences and mappings have no text form.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Loose equality between a resolved value and a candidate
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Bool(_), _) | (_, Value::Bool(_)) => truthy(a) == truthy(b),
        (Value::Null, Value::Null) => true,
        (Value::Null, other) | (other, Value::Null) => !truthy(other) && as_flag(other).is_some(),
        (Value::Array(_), _) | (_, Value::Array(_)) | (Value::Object(_), _) | (_, Value::Object(_)) => {
            a == b
        }
        _ => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => x == y,
            _ => scalar_string(a) == scalar_string(b),
        },
    }
}

/// Does a resolved collection contain the candidate?
///
/// Elements that are objects match on their `id` member, so a list of
/// related records checks the boxes of the records it contains.
pub fn contains_loose(items: &[Value], candidate: &Value) -> bool {
    items.iter().any(|item| match item {
        Value::Object(map) => map.get("id").is_some_and(|id| loose_eq(id, candidate)),
        other => loose_eq(other, candidate),
    })
}

/// Is an option with this value selected by the resolved selection?
///
/// Sequences select by membership of the option's text form. A boolean
/// selection matches flag-like option values (`"1"`, `"0"`).
pub fn option_selected(option_value: &str, selected: &Value) -> bool {
    match selected {
        Value::Array(items) => items
            .iter()
            .any(|item| scalar_string(item).as_deref() == Some(option_value)),
        Value::Bool(flag) => {
            as_flag(&Value::String(option_value.to_string())) == Some(*flag)
                && !option_value.is_empty()
        }
        other => scalar_string(other).as_deref() == Some(option_value),
    }
}
