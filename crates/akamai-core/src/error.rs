//! Error types for the Akamai provider
//!
//! This module defines all error types used throughout the workspace.

use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the Akamai provider
#[derive(Error, Debug)]
pub enum Error {
    /// The remote entity does not exist
    ///
    /// Reconcilers treat this as a signal during existence checks,
    /// not as a failure.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Declared configuration or record data was rejected
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Provider configuration errors (edgerc, sections, missing keys)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Two sub-providers registered the same schema, resource or data source key
    #[error("duplicate schema key: {0}")]
    DuplicateSchemaKey(String),

    /// Authentication errors (401/403 from the API)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors (429 from the API)
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Transport-level HTTP errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Remote API errors (conflicts, server errors, unexpected statuses)
    #[error("Remote error ({status}): {message}")]
    Remote {
        /// HTTP status code returned by the API
        status: u16,
        /// Error message
        message: String,
    },

    /// Local I/O errors (reading edgerc files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a duplicate key error
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateSchemaKey(key.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create an HTTP transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a remote API error
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Whether this error is the expected "entity does not exist" signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the host may reasonably retry the failed operation
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimited(_) => true,
            Self::Remote { status, .. } => *status >= 500 || *status == 409,
            _ => false,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
