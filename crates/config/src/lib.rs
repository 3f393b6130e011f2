//! Relay Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! A minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use relay_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[forwarder]\nhost = \"riemann.example.com\"").unwrap();
//! assert_eq!(config.forwarder.host, "riemann.example.com");
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [forwarder]
//! host = "riemann.example.com"
//! port = 5555
//! protocol = "tcp"
//! resend_on_failure = true
//!
//! [forwarder.static_fields]
//! ttl = "60"
//!
//! [log]
//! level = "info"
//! ```

mod error;
mod forwarder;
mod logging;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use forwarder::{ForwarderConfig, Protocol};
pub use logging::{LogConfig, LogFormat, LogLevel, LogOutput};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Forwarder settings (destination, protocol, retry policy)
    pub forwarder: ForwarderConfig,

    /// Logging configuration
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, contains invalid TOML,
    /// or fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.forwarder.host, "localhost");
        assert_eq!(config.forwarder.port, 1337);
        assert_eq!(config.log.level, LogLevel::Info);
    }

    #[test]
    fn test_full_config_parses() {
        let toml = r#"
[forwarder]
host = "riemann.example.com"
port = 5555
protocol = "udp"
sender = "%{source}"
map_fields = true
debug = true
reconnect_interval = 0.5
resend_on_failure = true

[forwarder.static_fields]
ttl = "60"
state = "%{level}"

[log]
level = "debug"
format = "json"
"#;
        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.forwarder.host, "riemann.example.com");
        assert_eq!(config.forwarder.port, 5555);
        assert_eq!(config.forwarder.protocol, Protocol::Udp);
        assert_eq!(config.forwarder.sender, "%{source}");
        assert!(config.forwarder.map_fields);
        assert!(config.forwarder.debug);
        assert_eq!(config.forwarder.reconnect_interval, 0.5);
        assert!(config.forwarder.resend_on_failure);
        assert_eq!(
            config.forwarder.static_fields.get("ttl"),
            Some(&"60".to_string())
        );
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(Config::from_str("forwarder = not toml").is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let result = Config::from_file("/nonexistent/relay.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
