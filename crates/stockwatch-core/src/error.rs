//! Error types for stockwatch
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for stockwatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for stockwatch
#[derive(Error, Debug)]
pub enum Error {
    /// Inventory provider errors (transport, HTTP status)
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// The provider answered, but not with the expected shape
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// Notifier-related errors
    #[error("Notifier error: {0}")]
    Notifier(String),

    /// State store-related errors
    #[error("State store error: {0}")]
    StateStore(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP errors (non-success status codes)
    #[error("HTTP error: {0}")]
    Http(String),
}

impl Error {
    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a notifier error
    pub fn notifier(msg: impl Into<String>) -> Self {
        Self::Notifier(msg.into())
    }

    /// Create a state store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Whether this error means nothing can be delivered no matter how often
    /// the call is repeated.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
