//! Field-path helpers over loosely typed JSON documents.
//!
//! Module payloads arrive as arbitrary nested JSON. Paths use dots to walk
//! objects (`"reportingFramework.primaryStandard"`) and plain integers to
//! index arrays (`"sites.0.name"`). A missing link anywhere along the path
//! resolves to `None`; nothing here panics on malformed data.

use serde_json::Value;

/// Resolve a dotted path inside `value`
pub fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }

    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
        _ => None,
    })
}

/// A field counts as filled unless it is absent, `null` or an empty string
pub fn is_filled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Whether a document carries any data at all
pub fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.trim().is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Read a numeric field, accepting numbers and numeric strings
pub fn number_at(value: &Value, path: &str) -> Option<f64> {
    match resolve_path(value, path)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
