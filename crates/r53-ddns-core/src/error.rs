//! Error types for the DDNS updater
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS updater
#[derive(Error, Debug)]
pub enum Error {
    /// The supplied address is not a dotted-decimal IPv4 literal
    #[error("'{0}' is not a valid IPv4 address")]
    InvalidAddress(String),

    /// Invalid input other than the address (e.g. a malformed commit flag)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The hostname has no entry in the `records` configuration
    #[error("Hostname not found in config: {0}")]
    UnknownHost(String),

    /// The DNS provider rejected or failed the record change
    #[error("Remote update failed ({provider}) for {host}: {message}")]
    RemoteUpdate {
        /// Provider name
        provider: String,
        /// Hostname whose record set was being changed
        host: String,
        /// Error message
        message: String,
    },

    /// The push notification could not be delivered
    #[error("Notification failed ({notifier}): {message}")]
    Notification {
        /// Notifier name
        notifier: String,
        /// Error message
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid address error
    pub fn invalid_address(raw: impl Into<String>) -> Self {
        Self::InvalidAddress(raw.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an unknown host error
    pub fn unknown_host(host: impl Into<String>) -> Self {
        Self::UnknownHost(host.into())
    }

    /// Create a remote update error
    pub fn remote_update(
        provider: impl Into<String>,
        host: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::RemoteUpdate {
            provider: provider.into(),
            host: host.into(),
            message: message.into(),
        }
    }

    /// Create a notification error
    pub fn notification(notifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Notification {
            notifier: notifier.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error was raised before any remote service was contacted
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidAddress(_) | Self::InvalidInput(_) | Self::UnknownHost(_)
        )
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
