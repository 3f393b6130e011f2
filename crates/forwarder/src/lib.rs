//! Relay - Forwarder
//!
//! Resilient event delivery to a Riemann-style collector.
//!
//! # Architecture
//!
//! ```text
//! [Record] → [gate] → [PayloadBuilder] → [JSON] → [Transport] → [Collector]
//! ```
//!
//! The `Forwarder` owns one transport instance (TCP or UDP, selected at
//! construction from configuration) and delivers one record at a time.
//! There is no internal queue: retry sleeps suspend the calling task,
//! which is the forwarder's backpressure mechanism - a stalled collector
//! stalls the caller instead of buffering unbounded events.
//!
//! # Failure policy
//!
//! No delivery failure escapes `deliver`. Transport errors trigger
//! sleep-reconnect-resend (or drop, when `resend_on_failure` is off);
//! serialization errors drop the event with a log line.
//!
//! # Example
//!
//! ```ignore
//! use relay_config::ForwarderConfig;
//! use relay_forwarder::Forwarder;
//!
//! let config = ForwarderConfig::default();
//! let mut forwarder = Forwarder::connect(&config).await;
//! forwarder.deliver(&record).await;
//! ```

mod delivery;
mod error;
mod metrics;
pub mod transport;

pub use delivery::Forwarder;
pub use error::ForwarderError;
pub use metrics::{ForwarderMetrics, MetricsSnapshot};
pub use transport::Transport;
