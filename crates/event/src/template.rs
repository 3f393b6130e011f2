//! Template rendering
//!
//! Resolves `%{field}` placeholders against a record. Dotted names
//! (`%{nested.field}`) traverse nested objects. A placeholder that does
//! not resolve to a scalar is left in place literally, so a malformed
//! template degrades to its own text instead of failing the delivery.

use serde_json::Value;

/// Render a template string against a record.
///
/// # Example
///
/// ```
/// use relay_event::render;
/// use serde_json::json;
///
/// let record = json!({"host": "web-1", "level": "warn"});
/// assert_eq!(render("%{host}/%{level}", &record), "web-1/warn");
/// assert_eq!(render("%{missing}", &record), "%{missing}");
/// ```
pub fn render(template: &str, record: &Value) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("%{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match lookup(record, name) {
                    Some(text) => out.push_str(&text),
                    None => {
                        out.push_str("%{");
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                // Unterminated placeholder, copy through literally
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Resolve a (possibly dotted) field path to its scalar text form.
fn lookup(record: &Value, path: &str) -> Option<String> {
    let mut current = record;
    for part in path.split('.') {
        current = current.get(part)?;
    }

    match current {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "template_test.rs"]
mod template_test;
