//! UDP transport
//!
//! One JSON datagram per payload, no delimiter. UDP has no connection to
//! lose, but a handle that has started returning errors (for example
//! ECONNREFUSED fed back from ICMP) is replaced before a resend.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::{lookup_host, UdpSocket};
use tokio::time::sleep;

use relay_config::ForwarderConfig;

use crate::error::ForwarderError;

/// UDP transport with sleep-then-conditional-resend recovery
#[derive(Debug)]
pub struct UdpTransport {
    /// Destination address (host:port)
    target: String,

    /// Connected send handle
    socket: UdpSocket,

    /// Wait between send retries
    reconnect_delay: Duration,

    /// Resend a failed payload on a fresh socket instead of dropping it
    resend_on_failure: bool,

    /// Completed socket rebind cycles
    rebinds: u64,
}

impl UdpTransport {
    /// Acquire a send handle for the collector.
    ///
    /// There is no handshake; only local socket acquisition can fail,
    /// and that is retried on the same fixed interval as TCP connect.
    pub async fn connect(config: &ForwarderConfig) -> Self {
        let target = config.target();
        let reconnect_delay = config.reconnect_delay();
        let socket = acquire(&target, reconnect_delay).await;

        Self {
            target,
            socket,
            reconnect_delay,
            resend_on_failure: config.resend_on_failure,
            rebinds: 0,
        }
    }

    /// Send one datagram.
    ///
    /// On failure: log, sleep, then either rebuild the socket and resend
    /// (when `resend_on_failure` is set) or drop the payload and return.
    pub async fn send(&mut self, bytes: &[u8]) -> bool {
        loop {
            match self.socket.send(bytes).await {
                Ok(_) => return true,
                Err(e) => {
                    tracing::warn!(
                        collector = %self.target,
                        error = %e,
                        "datagram send failed"
                    );
                    sleep(self.reconnect_delay).await;

                    if !self.resend_on_failure {
                        tracing::debug!(collector = %self.target, "dropping payload");
                        return false;
                    }
                    self.rebind().await;
                }
            }
        }
    }

    /// Completed socket rebind cycles
    pub fn reconnect_count(&self) -> u64 {
        self.rebinds
    }

    async fn rebind(&mut self) {
        self.socket = acquire(&self.target, self.reconnect_delay).await;
        self.rebinds += 1;
        tracing::debug!(collector = %self.target, "rebound UDP socket");
    }
}

/// Bind and connect a fresh socket, retrying indefinitely on failure.
async fn acquire(target: &str, delay: Duration) -> UdpSocket {
    loop {
        match try_acquire(target).await {
            Ok(socket) => return socket,
            Err(e) => {
                tracing::warn!(
                    collector = %target,
                    error = %e,
                    "failed to acquire UDP socket, retrying"
                );
                sleep(delay).await;
            }
        }
    }
}

async fn try_acquire(target: &str) -> Result<UdpSocket, ForwarderError> {
    let failed = |e| ForwarderError::ConnectionFailed {
        target: target.to_string(),
        source: e,
    };

    let peer = resolve(target).await.map_err(failed)?;

    // Bind the wildcard of the peer's address family
    let local: SocketAddr = if peer.is_ipv4() {
        ([0, 0, 0, 0], 0).into()
    } else {
        ([0u16; 8], 0).into()
    };

    let socket = UdpSocket::bind(local).await.map_err(failed)?;
    socket.connect(peer).await.map_err(failed)?;
    Ok(socket)
}

async fn resolve(target: &str) -> io::Result<SocketAddr> {
    lookup_host(target).await?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("no address found for {}", target),
        )
    })
}
