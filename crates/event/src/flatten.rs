//! Nested record flattening
//!
//! Converts a nested record into a flat mapping keyed by dot-joined
//! paths. Keys beginning with `@` are reserved for system-internal
//! fields (`@timestamp`, `@version`) and are excluded at every level.

use serde_json::{Map, Value};

/// Flatten a nested record into dot-separated flat keys.
///
/// Nested objects recurse with their key as the new prefix; scalars and
/// arrays bind directly under the joined path. Inputs are tree-shaped,
/// so no cycle detection is needed.
///
/// # Example
///
/// ```
/// use relay_event::flatten;
/// use serde_json::json;
///
/// let record = json!({"@timestamp": "t", "nested": {"key": "value"}});
/// let flat = flatten(record.as_object().unwrap());
///
/// assert_eq!(flat.len(), 1);
/// assert_eq!(flat["nested.key"], json!("value"));
/// ```
pub fn flatten(record: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    flatten_into("", record, &mut out);
    out
}

fn flatten_into(prefix: &str, record: &Map<String, Value>, out: &mut Map<String, Value>) {
    for (key, value) in record {
        if key.starts_with('@') {
            continue;
        }

        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Object(nested) => flatten_into(&full_key, nested, out),
            other => {
                out.insert(full_key, other.clone());
            }
        }
    }
}

#[cfg(test)]
#[path = "flatten_test.rs"]
mod flatten_test;
