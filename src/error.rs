//! Error types for the monitor

use thiserror::Error;

/// Top-level error type
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Missing or invalid configuration. Fatal at startup.
    #[error("Config error: {0}")]
    Config(String),

    /// Failed to fetch or parse market data from an exchange.
    /// Recovered by skipping the poll cycle.
    #[error("Fetch error from {exchange}: {message}")]
    Fetch { exchange: String, message: String },

    /// Failed to deliver a notification. Logged and dropped, never fatal.
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl MonitorError {
    /// Attach a market source name to a transport or parse failure
    pub fn fetch(exchange: &str, err: impl std::fmt::Display) -> Self {
        Self::Fetch {
            exchange: exchange.to_string(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
