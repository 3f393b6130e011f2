//! Payload construction
//!
//! Maps one input record into the flat event payload transmitted to the
//! collector. Reserved and static fields take precedence over flattened
//! record fields on key collision: the flattened-field merge never
//! overwrites a key that is already present.
//!
//! Payload construction has no error path. Numeric coercion failures
//! default to `0.0`, unresolvable templates fall back to their literal
//! text, and missing record fields simply produce no key.

use chrono::DateTime;
use serde_json::{Map, Value};

use crate::flatten::flatten;
use crate::template::render;

/// Flat event payload ready for serialization.
pub type Payload = Map<String, Value>;

/// Builds normalized event payloads from input records.
///
/// Holds the event-shaping slice of the configuration; one builder is
/// created at startup and reused for every record.
///
/// # Example
///
/// ```
/// use relay_event::PayloadBuilder;
/// use serde_json::json;
///
/// let builder = PayloadBuilder::new("%{host}")
///     .with_static_fields([("ttl".to_string(), "60".to_string())])
///     .with_map_fields(true);
///
/// let payload = builder.build(&json!({"host": "web-1", "value": 0.93}));
/// assert_eq!(payload["ttl"], json!(60.0));
/// assert_eq!(payload["metric"], json!(0.93));
/// ```
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    /// Template producing the payload `host` field
    sender: String,

    /// Static payload fields, name -> template
    static_fields: Vec<(String, String)>,

    /// Merge flattened record fields into the payload
    map_fields: bool,
}

impl PayloadBuilder {
    /// Create a builder with the given sender template.
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            static_fields: Vec::new(),
            map_fields: false,
        }
    }

    /// Set static payload fields (name -> template).
    ///
    /// Fields named `ttl` or `metric` are coerced to floating point
    /// after rendering; a non-numeric result coerces to `0.0`.
    #[must_use]
    pub fn with_static_fields(
        mut self,
        fields: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        self.static_fields = fields.into_iter().collect();
        self
    }

    /// Enable or disable merging flattened record fields.
    #[must_use]
    pub fn with_map_fields(mut self, enabled: bool) -> Self {
        self.map_fields = enabled;
        self
    }

    /// Build the payload for one record.
    pub fn build(&self, record: &Value) -> Payload {
        let mut payload = Payload::new();

        let host = match record.get("@source_host") {
            Some(Value::String(s)) => s.clone(),
            // Non-string scalars are taken by their JSON text form
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
            _ => render(&self.sender, record),
        };
        payload.insert("host".into(), Value::String(host));

        if let Some(service) = record.get("service").or_else(|| record.get("@source")) {
            payload.insert("service".into(), service.clone());
        }

        if let Some(millis) = record.get("@timestamp").and_then(timestamp_millis) {
            payload.insert("time".into(), Value::from(millis));
        }

        if let Some(message) = record.get("message") {
            payload.insert("description".into(), message.clone());
        }

        // Full original record, retained for downstream inspection
        payload.insert("meta".into(), record.clone());

        if let Some(value) = record.get("value") {
            payload.insert("metric".into(), value.clone());
        }

        // Static fields overwrite anything set above
        for (name, template) in &self.static_fields {
            let rendered = render(template, record);
            let value = if name == "ttl" || name == "metric" {
                Value::from(coerce_float(&rendered))
            } else {
                Value::String(rendered)
            };
            payload.insert(name.clone(), value);
        }

        // Flattened fields are only added for keys not already present.
        // `tags` is excluded here: it only enters the payload below, and
        // only as an array.
        if self.map_fields {
            if let Value::Object(fields) = record {
                for (key, value) in flatten(fields) {
                    if key == "tags" {
                        continue;
                    }
                    payload.entry(key).or_insert(value);
                }
            }
        }

        if let Some(tags) = record.get("tags") {
            if tags.is_array() {
                payload.insert("tags".into(), tags.clone());
            }
        }

        payload
    }
}

/// Parse a rendered template as f64, defaulting to `0.0`.
fn coerce_float(text: &str) -> f64 {
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

/// Convert a record timestamp to integer epoch milliseconds.
///
/// Accepts epoch seconds as a JSON number or numeric string, or an
/// RFC 3339 string. Fractional seconds are truncated to whole seconds
/// before scaling. Values whose millisecond form does not fit i64
/// produce no timestamp.
fn timestamp_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(|secs| secs.checked_mul(1000)),
        Value::String(s) => {
            if let Ok(secs) = s.parse::<i64>() {
                return secs.checked_mul(1000);
            }
            if let Ok(secs) = s.parse::<f64>() {
                return (secs as i64).checked_mul(1000);
            }
            DateTime::parse_from_rfc3339(s)
                .ok()
                .and_then(|dt| dt.timestamp().checked_mul(1000))
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "payload_test.rs"]
mod payload_test;
