//! Server configuration.

use std::time::Duration;

use netui_core::Color;

use crate::ServerError;

/// Per-connection settings, shared by every connection of a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Terminal width in columns. Fixed for every client.
    pub width: u16,
    /// Terminal height in rows. Fixed for every client.
    pub height: u16,
    /// Background of every frame (the first frame is diffed against a
    /// default-background baseline, so it repaints the whole grid).
    pub background: Color,
    /// Upper bound on how long a connection waits for input before
    /// re-rendering. Also how quickly externally pushed screen changes show
    /// up on an idle client.
    pub poll_interval: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 48,
            background: Color::Black,
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Server configuration for the production runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind to (e.g., "0.0.0.0:8080")
    pub bind_address: String,
    /// Connection configuration (terminal size, polling)
    pub connection: ConnectionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_address: "0.0.0.0:8080".to_string(), connection: ConnectionConfig::default() }
    }
}

impl ServerConfig {
    /// Reject configurations the server cannot run with.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.bind_address.trim().is_empty() {
            return Err(ServerError::Config("bind address must not be empty".to_string()));
        }
        if self.connection.width == 0 || self.connection.height == 0 {
            return Err(ServerError::Config(format!(
                "terminal size must be non-zero, got {}x{}",
                self.connection.width, self.connection.height
            )));
        }
        if self.connection.poll_interval.is_zero() {
            return Err(ServerError::Config("poll interval must be non-zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!((config.connection.width, config.connection.height), (64, 48));
        assert_eq!(config.connection.poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn zero_sized_terminal_is_rejected() {
        let mut config = ServerConfig::default();
        config.connection.height = 0;
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let mut config = ServerConfig::default();
        config.connection.poll_interval = Duration::ZERO;
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }
}
