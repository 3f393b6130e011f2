//! Relay - Event
//!
//! Record-to-payload transformation: maps an arbitrarily nested input
//! record into the flat event schema sent to the collector.
//!
//! # Pipeline
//!
//! ```text
//! [Record] → [PayloadBuilder] → [Payload] → (serialize, transport)
//! ```
//!
//! # Modules
//!
//! - `flatten` - Nested record flattening into dot-joined paths
//! - `template` - `%{field}` template rendering against a record
//! - `payload` - Payload construction with precedence rules
//!
//! Records are `serde_json::Value` trees: the `Object`/`Array`/scalar
//! variants give the flattening recursion exhaustive, type-safe cases.
//!
//! # Example
//!
//! ```
//! use relay_event::PayloadBuilder;
//! use serde_json::json;
//!
//! let builder = PayloadBuilder::new("%{host}");
//! let record = json!({"host": "web-1", "message": "disk full"});
//! let payload = builder.build(&record);
//!
//! assert_eq!(payload["host"], json!("web-1"));
//! assert_eq!(payload["description"], json!("disk full"));
//! ```

mod flatten;
mod payload;
mod template;

pub use flatten::flatten;
pub use payload::{Payload, PayloadBuilder};
pub use template::render;
