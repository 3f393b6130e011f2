//! TCP transport
//!
//! Newline-delimited JSON over a persistent stream. The stream is not
//! closed between sends; it is torn down and redialed only after a write
//! failure.

use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::sleep;

use relay_config::ForwarderConfig;

use crate::error::ForwarderError;

/// TCP transport with reconnect-then-conditional-resend recovery
#[derive(Debug)]
pub struct TcpTransport {
    /// Destination address (host:port)
    target: String,

    /// Live stream; `None` while disconnected during recovery
    stream: Option<TcpStream>,

    /// Wait between connection/send retries
    reconnect_delay: Duration,

    /// Resend a failed payload after reconnecting instead of dropping it
    resend_on_failure: bool,

    /// Keep-alive probe interval, if enabled
    keepalive: Option<Duration>,

    /// Completed reconnect cycles
    reconnects: u64,
}

impl TcpTransport {
    /// Connect to the collector, retrying indefinitely at
    /// `reconnect_interval` until a connection is established.
    pub async fn connect(config: &ForwarderConfig) -> Self {
        let target = config.target();
        let reconnect_delay = config.reconnect_delay();
        let keepalive = config.tcp_keepalive.then(|| config.keepalive_interval());

        let stream = dial(&target, reconnect_delay, keepalive).await;
        tracing::info!(collector = %target, "connected to collector");

        Self {
            target,
            stream: Some(stream),
            reconnect_delay,
            resend_on_failure: config.resend_on_failure,
            keepalive,
            reconnects: 0,
        }
    }

    /// Send one payload, newline-terminated.
    ///
    /// On a write failure the stale handle is dropped and the connection
    /// redialed (blocking until it succeeds). The payload is then resent
    /// when `resend_on_failure` is set, otherwise dropped after the
    /// reconnection.
    pub async fn send(&mut self, bytes: &[u8]) -> bool {
        loop {
            match self.try_send(bytes).await {
                Ok(()) => return true,
                Err(e) => {
                    tracing::warn!(
                        collector = %self.target,
                        error = %e,
                        "send failed, reconnecting"
                    );
                    sleep(self.reconnect_delay).await;
                    self.reconnect().await;

                    if !self.resend_on_failure {
                        tracing::debug!(
                            collector = %self.target,
                            "dropping payload after reconnect"
                        );
                        return false;
                    }
                }
            }
        }
    }

    /// Completed reconnect cycles
    pub fn reconnect_count(&self) -> u64 {
        self.reconnects
    }

    async fn try_send(&mut self, bytes: &[u8]) -> Result<(), ForwarderError> {
        let stream = self.stream.as_mut().ok_or(ForwarderError::NotConnected)?;
        stream.write_all(bytes).await?;
        stream.write_all(b"\n").await?;
        stream.flush().await?;
        Ok(())
    }

    async fn reconnect(&mut self) {
        // Release the stale handle before dialing again
        self.stream.take();
        self.stream = Some(dial(&self.target, self.reconnect_delay, self.keepalive).await);
        self.reconnects += 1;
        tracing::info!(collector = %self.target, "reconnected to collector");
    }
}

/// Dial the collector, retrying indefinitely on failure.
async fn dial(target: &str, delay: Duration, keepalive: Option<Duration>) -> TcpStream {
    loop {
        match try_dial(target, keepalive).await {
            Ok(stream) => return stream,
            Err(e) => {
                tracing::warn!(
                    collector = %target,
                    error = %e,
                    delay_ms = delay.as_millis() as u64,
                    "connection failed, retrying"
                );
                sleep(delay).await;
            }
        }
    }
}

async fn try_dial(target: &str, keepalive: Option<Duration>) -> Result<TcpStream, ForwarderError> {
    let stream =
        TcpStream::connect(target)
            .await
            .map_err(|e| ForwarderError::ConnectionFailed {
                target: target.to_string(),
                source: e,
            })?;
    configure_stream(&stream, keepalive);
    Ok(stream)
}

/// Set TCP_NODELAY and keep-alive; both are non-fatal if they fail.
fn configure_stream(stream: &TcpStream, keepalive: Option<Duration>) {
    if let Err(e) = stream.set_nodelay(true) {
        tracing::debug!(error = %e, "failed to set TCP_NODELAY, continuing with default buffering");
    }

    if let Some(interval) = keepalive {
        let sock_ref = SockRef::from(stream);
        let params = TcpKeepalive::new().with_time(interval);

        // On Linux, also set the interval between probes
        #[cfg(target_os = "linux")]
        let params = params.with_interval(interval);

        if let Err(e) = sock_ref.set_tcp_keepalive(&params) {
            tracing::debug!(error = %e, "failed to set TCP keep-alive, continuing without it");
        }
    }
}
