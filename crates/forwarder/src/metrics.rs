//! Forwarder metrics
//!
//! Per-instance counters, updated on the delivery path and reported as a
//! snapshot at shutdown.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one forwarder instance
#[derive(Debug, Default)]
pub struct ForwarderMetrics {
    /// Records accepted by `deliver` (past the gate)
    pub events_received: AtomicU64,

    /// Records the gate turned away before any payload work
    pub events_rejected: AtomicU64,

    /// Payloads confirmed written to the transport
    pub events_sent: AtomicU64,

    /// Payloads dropped (serialization failure or retry policy)
    pub events_dropped: AtomicU64,

    /// Serialized bytes handed to the transport
    pub bytes_sent: AtomicU64,
}

impl ForwarderMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            events_received: AtomicU64::new(0),
            events_rejected: AtomicU64::new(0),
            events_sent: AtomicU64::new(0),
            events_dropped: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
        }
    }

    /// Record a received record
    #[inline]
    pub fn record_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a gate-rejected record
    #[inline]
    pub fn record_rejected(&self) {
        self.events_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successfully sent payload
    #[inline]
    pub fn record_sent(&self, bytes: u64) {
        self.events_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a dropped payload
    #[inline]
    pub fn record_dropped(&self) {
        self.events_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    ///
    /// `reconnects` is tracked by the transport; `Forwarder::snapshot`
    /// fills it in.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            events_received: self.events_received.load(Ordering::Relaxed),
            events_rejected: self.events_rejected.load(Ordering::Relaxed),
            events_sent: self.events_sent.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            reconnects: 0,
        }
    }
}

/// Point-in-time snapshot of forwarder metrics
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub events_received: u64,
    pub events_rejected: u64,
    pub events_sent: u64,
    pub events_dropped: u64,
    pub bytes_sent: u64,
    pub reconnects: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_zero() {
        let snapshot = ForwarderMetrics::new().snapshot();
        assert_eq!(snapshot.events_received, 0);
        assert_eq!(snapshot.events_rejected, 0);
        assert_eq!(snapshot.events_sent, 0);
        assert_eq!(snapshot.events_dropped, 0);
        assert_eq!(snapshot.bytes_sent, 0);
    }

    #[test]
    fn test_record_received() {
        let metrics = ForwarderMetrics::new();
        metrics.record_received();
        metrics.record_received();
        assert_eq!(metrics.snapshot().events_received, 2);
    }

    #[test]
    fn test_record_sent_accumulates_bytes() {
        let metrics = ForwarderMetrics::new();
        metrics.record_sent(100);
        metrics.record_sent(250);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.events_sent, 2);
        assert_eq!(snapshot.bytes_sent, 350);
    }

    #[test]
    fn test_record_rejected() {
        let metrics = ForwarderMetrics::new();
        metrics.record_rejected();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.events_rejected, 1);
        assert_eq!(snapshot.events_received, 0);
    }

    #[test]
    fn test_record_dropped() {
        let metrics = ForwarderMetrics::new();
        metrics.record_dropped();
        assert_eq!(metrics.snapshot().events_dropped, 1);
    }
}
