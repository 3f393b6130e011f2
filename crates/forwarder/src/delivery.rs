//! Delivery controller
//!
//! Orchestrates gate → payload build → serialize → transport send.
//! Failures never escape `deliver`: transport errors are absorbed by the
//! retry policy and serialization errors drop the event with a log line.

use relay_config::ForwarderConfig;
use relay_event::PayloadBuilder;
use serde_json::Value;

use crate::error::ForwarderError;
use crate::metrics::{ForwarderMetrics, MetricsSnapshot};
use crate::transport::Transport;

/// Gating predicate deciding whether a record is forwarded at all
pub type Gate = Box<dyn Fn(&Value) -> bool + Send + Sync>;

/// Forwards records to the collector, one delivery in flight at a time.
///
/// The socket handle is exclusively owned by the transport and is not
/// safe for concurrent use; `deliver` takes `&mut self` to make the
/// single-delivery constraint a compile-time property.
pub struct Forwarder {
    transport: Transport,
    builder: PayloadBuilder,
    gate: Option<Gate>,
    debug: bool,
    metrics: ForwarderMetrics,
}

impl Forwarder {
    /// Connect the configured transport and build a forwarder.
    ///
    /// For TCP this blocks (retrying at `reconnect_interval`) until the
    /// collector accepts the connection.
    pub async fn connect(config: &ForwarderConfig) -> Self {
        let transport = Transport::connect(config).await;
        Self::with_transport(config, transport)
    }

    /// Build a forwarder over an already-connected transport.
    pub fn with_transport(config: &ForwarderConfig, transport: Transport) -> Self {
        let builder = PayloadBuilder::new(&config.sender)
            .with_static_fields(config.static_fields.clone())
            .with_map_fields(config.map_fields);

        Self {
            transport,
            builder,
            gate: None,
            debug: config.debug,
            metrics: ForwarderMetrics::new(),
        }
    }

    /// Install a gating predicate; records it rejects are skipped before
    /// any payload work.
    #[must_use]
    pub fn with_gate(mut self, gate: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.gate = Some(Box::new(gate));
        self
    }

    /// Transform and deliver one record.
    ///
    /// Never fails: transport errors are retried or dropped per the
    /// configured policy, everything else is absorbed with a log line.
    pub async fn deliver(&mut self, record: &Value) {
        if let Some(gate) = &self.gate {
            if !gate(record) {
                tracing::trace!("record rejected by gate");
                self.metrics.record_rejected();
                return;
            }
        }

        self.metrics.record_received();
        let payload = self.builder.build(record);

        let bytes = match serde_json::to_vec(&payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                let e = ForwarderError::from(e);
                tracing::error!(error = %e, "dropping event");
                self.metrics.record_dropped();
                return;
            }
        };

        if self.debug {
            tracing::debug!(
                payload = %String::from_utf8_lossy(&bytes),
                "forwarding event"
            );
        }

        if self.transport.send(&bytes).await {
            self.metrics.record_sent(bytes.len() as u64);
        } else {
            self.metrics.record_dropped();
        }
    }

    /// Metrics counters for this forwarder
    pub fn metrics(&self) -> &ForwarderMetrics {
        &self.metrics
    }

    /// Point-in-time snapshot, including the transport's recovery count
    pub fn snapshot(&self) -> MetricsSnapshot {
        let mut snapshot = self.metrics.snapshot();
        snapshot.reconnects = self.transport.reconnect_count();
        snapshot
    }
}

#[cfg(test)]
#[path = "delivery_test.rs"]
mod delivery_test;
