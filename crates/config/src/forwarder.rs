//! Forwarder configuration
//!
//! Destination, protocol selection, payload shaping, and retry policy.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Wire protocol used to reach the collector
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Newline-delimited JSON over a persistent stream (default)
    #[default]
    Tcp,
    /// One JSON datagram per event, best effort
    Udp,
}

impl Protocol {
    /// Protocol name as used in config files and log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }
}

/// Forwarder configuration
///
/// # Example
///
/// ```toml
/// [forwarder]
/// host = "riemann.example.com"
/// port = 5555
/// protocol = "tcp"
/// reconnect_interval = 2
/// resend_on_failure = true
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForwarderConfig {
    /// Destination host
    /// Default: localhost
    pub host: String,

    /// Destination port
    /// Default: 1337
    pub port: u16,

    /// Wire protocol (tcp, udp)
    /// Default: tcp
    pub protocol: Protocol,

    /// Template producing the payload `host` field
    /// Default: "%{host}"
    pub sender: String,

    /// Static payload fields, name -> template.
    /// `ttl` and `metric` results are coerced to floating point.
    pub static_fields: HashMap<String, String>,

    /// Merge flattened record fields into the payload
    /// Default: false
    pub map_fields: bool,

    /// Log each serialized payload before transmission
    /// Default: false
    pub debug: bool,

    /// Seconds to wait between connection/send retries
    /// Default: 2
    pub reconnect_interval: f64,

    /// Retry a failed send after recovery instead of dropping it
    /// Default: false
    pub resend_on_failure: bool,

    /// Enable TCP keep-alive on the forwarding connection
    /// Default: true
    pub tcp_keepalive: bool,

    /// TCP keep-alive probe interval in seconds
    /// Default: 30
    pub tcp_keepalive_interval: u64,
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1337,
            protocol: Protocol::Tcp,
            sender: "%{host}".to_string(),
            static_fields: HashMap::new(),
            map_fields: false,
            debug: false,
            reconnect_interval: 2.0,
            resend_on_failure: false,
            tcp_keepalive: true,
            tcp_keepalive_interval: 30,
        }
    }
}

impl ForwarderConfig {
    /// Destination address as `host:port`
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Retry interval as a `Duration`
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs_f64(self.reconnect_interval)
    }

    /// Keep-alive probe interval as a `Duration`
    pub fn keepalive_interval(&self) -> Duration {
        Duration::from_secs(self.tcp_keepalive_interval)
    }
}
