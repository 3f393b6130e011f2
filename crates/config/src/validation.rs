//! Configuration validation
//!
//! Post-parse checks that catch values TOML accepts but the forwarder
//! cannot operate with.

use crate::{Config, ConfigError, Result};

/// Validate a parsed configuration
pub(crate) fn validate_config(config: &Config) -> Result<()> {
    let fwd = &config.forwarder;

    if fwd.host.is_empty() {
        return Err(ConfigError::invalid_value(
            "forwarder",
            "host",
            "must not be empty",
        ));
    }

    if fwd.port == 0 {
        return Err(ConfigError::invalid_value(
            "forwarder",
            "port",
            "must be between 1 and 65535",
        ));
    }

    if fwd.sender.is_empty() {
        return Err(ConfigError::invalid_value(
            "forwarder",
            "sender",
            "must not be empty",
        ));
    }

    if !fwd.reconnect_interval.is_finite() || fwd.reconnect_interval <= 0.0 {
        return Err(ConfigError::invalid_value(
            "forwarder",
            "reconnect_interval",
            "must be a positive number of seconds",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn parse(toml: &str) -> Result<Config> {
        Config::from_str(toml)
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(parse("[forwarder]\nhost = \"riemann\"\nport = 5555").is_ok());
    }

    #[test]
    fn test_empty_host_rejected() {
        let result = parse("[forwarder]\nhost = \"\"");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "host", .. })
        ));
    }

    #[test]
    fn test_zero_port_rejected() {
        let result = parse("[forwarder]\nport = 0");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "port", .. })
        ));
    }

    #[test]
    fn test_empty_sender_rejected() {
        let result = parse("[forwarder]\nsender = \"\"");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "sender", .. })
        ));
    }

    #[test]
    fn test_nonpositive_reconnect_interval_rejected() {
        let result = parse("[forwarder]\nreconnect_interval = 0");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                field: "reconnect_interval",
                ..
            })
        ));

        let result = parse("[forwarder]\nreconnect_interval = -1.5");
        assert!(result.is_err());
    }
}
