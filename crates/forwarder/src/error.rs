//! Forwarder error types
//!
//! Every error here is absorbed inside the forwarder: transport errors
//! feed the retry policy, serialization errors drop the event. The type
//! exists so retry decisions and log lines carry a structured cause.

use std::io;
use thiserror::Error;

/// Errors absorbed by the forwarder's retry policy
#[derive(Debug, Error)]
pub enum ForwarderError {
    /// Connection attempt to the collector failed
    #[error("connection failed to {target}: {source}")]
    ConnectionFailed {
        /// Destination address
        target: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Writing to the transport failed
    #[error("send failed: {0}")]
    SendFailed(#[from] io::Error),

    /// No live connection to send on
    #[error("no connection to collector")]
    NotConnected,

    /// The payload could not be serialized
    #[error("failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),
}
