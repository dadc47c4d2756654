//! Port interfaces for credential storage and the OAuth refresh grant
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use docpulse_domain::{CredentialState, RefreshFailure, RefreshedToken, Result};

/// Persistence for per-connection credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the credential for a connection, `None` if it was never linked.
    async fn load(&self, connection_id: &str) -> Result<Option<CredentialState>>;

    /// Persist the credential, replacing the previous state.
    async fn save(&self, state: &CredentialState) -> Result<()>;
}

/// The provider's refresh-grant endpoint.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Exchange a refresh token for a new access token.
    async fn refresh(&self, refresh_token: &str) -> std::result::Result<RefreshedToken, RefreshFailure>;
}
