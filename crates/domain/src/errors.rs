//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for DocPulse
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum DocPulseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    /// The connection's refresh credential is absent, rejected, or invalid.
    /// The caller must prompt the user to re-authorize; never retried.
    #[error("Re-authorization required: {0}")]
    ReauthRequired(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocPulseError {
    /// Whether the failure is connection-scoped and final until the user acts.
    ///
    /// Everything else is a transient source failure that callers degrade
    /// around.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DocPulseError::ReauthRequired(_))
    }

    /// Stable label suitable for structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            DocPulseError::Config(_) => "config",
            DocPulseError::Network(_) => "network",
            DocPulseError::Auth(_) => "auth",
            DocPulseError::ReauthRequired(_) => "reauth_required",
            DocPulseError::Provider(_) => "provider",
            DocPulseError::NotFound(_) => "not_found",
            DocPulseError::InvalidInput(_) => "invalid_input",
            DocPulseError::Storage(_) => "storage",
            DocPulseError::Internal(_) => "internal",
        }
    }
}

/// Result type alias for DocPulse operations
pub type Result<T> = std::result::Result<T, DocPulseError>;
