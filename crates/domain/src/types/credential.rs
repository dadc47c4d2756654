//! Per-connection OAuth credential state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialStatus {
    Active,
    /// Refresh was rejected. Only an external re-authorization resets this.
    Expired,
    Revoked,
    /// Last refresh failed for a transient reason; the next request retries.
    Error,
}

/// Stored tokens for one linked account.
///
/// `Debug` never prints token material.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialState {
    pub connection_id: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub status: CredentialStatus,
}

impl CredentialState {
    pub fn active(
        connection_id: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            connection_id: connection_id.into(),
            access_token: access_token.into(),
            refresh_token,
            expires_at,
            status: CredentialStatus::Active,
        }
    }

    /// `Expired` and `Revoked` connections cannot be used or refreshed.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, CredentialStatus::Expired | CredentialStatus::Revoked)
    }

    /// Whether the access token must be refreshed before use at `now`.
    pub fn needs_refresh(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        self.status != CredentialStatus::Active || now >= self.expires_at - skew
    }
}

impl std::fmt::Debug for CredentialState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialState")
            .field("connection_id", &self.connection_id)
            .field("access_token", &"[redacted]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[redacted]"))
            .field("expires_at", &self.expires_at)
            .field("status", &self.status)
            .finish()
    }
}

/// Successful refresh-grant response.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshedToken {
    pub access_token: String,
    pub expires_in_secs: i64,
    /// Present when the provider rotates refresh tokens.
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for RefreshedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshedToken")
            .field("access_token", &"[redacted]")
            .field("expires_in_secs", &self.expires_in_secs)
            .field("rotated", &self.refresh_token.is_some())
            .finish()
    }
}

/// Why a refresh grant failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshFailure {
    /// The provider says the refresh token is no longer valid.
    #[error("invalid grant: {0}")]
    InvalidGrant(String),
    /// Any other client-side rejection (bad client, malformed request).
    #[error("refresh rejected: {0}")]
    Rejected(String),
    /// Network failure, timeout, or provider-side error.
    #[error("refresh failed transiently: {0}")]
    Transient(String),
}

impl RefreshFailure {
    pub fn is_permanent(&self) -> bool {
        !matches!(self, RefreshFailure::Transient(_))
    }
}
