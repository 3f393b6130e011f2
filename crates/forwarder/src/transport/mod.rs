//! Transport layer
//!
//! One transport instance owns one socket handle; the handle is mutated
//! only by connect/reconnect and is not safe for concurrent sends.
//!
//! TCP connect retries indefinitely at a fixed interval and does not
//! return until connected - there is deliberately no attempt cap, no
//! circuit breaker, and no timeout beyond the OS default. An unreachable
//! collector therefore stalls the delivery path; that availability
//! trade-off is what keeps events from being silently lost.
//!
//! Send failures are absorbed on both variants: log, sleep, recover the
//! handle, then resend when `resend_on_failure` is set, otherwise drop.

mod tcp;
mod udp;

pub use tcp::TcpTransport;
pub use udp::UdpTransport;

use relay_config::{ForwarderConfig, Protocol};

/// Transport variant, selected once at construction from configuration
#[derive(Debug)]
pub enum Transport {
    /// Newline-delimited JSON over a persistent stream
    Tcp(TcpTransport),
    /// One JSON datagram per event, best effort
    Udp(UdpTransport),
}

impl Transport {
    /// Connect the transport selected by `config.protocol`.
    ///
    /// For TCP this does not return until a connection is established.
    pub async fn connect(config: &ForwarderConfig) -> Self {
        match config.protocol {
            Protocol::Tcp => Self::Tcp(TcpTransport::connect(config).await),
            Protocol::Udp => Self::Udp(UdpTransport::connect(config).await),
        }
    }

    /// Send one serialized payload.
    ///
    /// Returns whether the payload was delivered; a `false` means it was
    /// dropped under the configured retry policy. Errors never escape.
    pub async fn send(&mut self, bytes: &[u8]) -> bool {
        match self {
            Self::Tcp(tcp) => tcp.send(bytes).await,
            Self::Udp(udp) => udp.send(bytes).await,
        }
    }

    /// Number of recovery cycles (reconnects or socket rebinds) so far
    pub fn reconnect_count(&self) -> u64 {
        match self {
            Self::Tcp(tcp) => tcp.reconnect_count(),
            Self::Udp(udp) => udp.reconnect_count(),
        }
    }
}
