//! Access layer error types

use thiserror::Error;

/// Errors that can occur while loading, storing or configuring permissions
///
/// Resolution itself never fails: an unavailable permission set denies
/// every query instead of producing one of these.
#[derive(Error, Debug)]
pub enum AccessError {
    /// Session not found
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Session ID cannot be used as a storage directory name
    #[error("Invalid session id: {0:?}")]
    InvalidSessionId(String),

    /// Permission payload had a shape that cannot be normalized
    #[error("Malformed permissions: {0}")]
    MalformedPermissions(String),

    /// Permission source failed to produce a payload
    #[error("Permission source error: {0}")]
    Source(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl AccessError {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        AccessError::Other(msg.into())
    }

    /// Create a malformed-permissions error
    pub fn malformed(msg: impl Into<String>) -> Self {
        AccessError::MalformedPermissions(msg.into())
    }
}

/// Result type alias for access operations
pub type AccessResult<T> = Result<T, AccessError>;
