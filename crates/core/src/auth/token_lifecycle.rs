//! Token lifecycle service
//!
//! Expiry is judged from the stored `expires_at` only; the provider is never
//! asked. Refresh is single-flight per connection: concurrent callers for
//! the same expired connection wait on one refresh and reuse its result.

use std::sync::Arc;

use chrono::Duration;
use docpulse_common::{Clock, KeyedLock};
use docpulse_domain::constants::DEFAULT_REFRESH_SKEW_SECS;
use docpulse_domain::{CredentialState, CredentialStatus, DocPulseError, Result};
use tracing::{debug, error, info, instrument, warn};

use super::ports::{CredentialStore, TokenRefresher};

/// Writes attempted before a refreshed credential is reported unsaved.
const SAVE_ATTEMPTS: usize = 2;

/// Hands out valid access tokens, refreshing on demand.
pub struct TokenLifecycle {
    store: Arc<dyn CredentialStore>,
    refresher: Arc<dyn TokenRefresher>,
    clock: Arc<dyn Clock>,
    refresh_locks: KeyedLock<String>,
    skew: Duration,
}

impl TokenLifecycle {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        refresher: Arc<dyn TokenRefresher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            refresher,
            clock,
            refresh_locks: KeyedLock::new(),
            skew: Duration::seconds(DEFAULT_REFRESH_SKEW_SECS),
        }
    }

    /// Treat tokens as expired `skew` before their stored expiry.
    pub fn with_refresh_skew(mut self, skew: Duration) -> Self {
        self.skew = skew;
        self
    }

    /// Return a usable access token for the connection.
    ///
    /// # Errors
    /// - `NotFound` when the connection has no stored credential
    /// - `ReauthRequired` when the connection is expired/revoked, has no
    ///   refresh token, or the refresh grant is rejected
    /// - `Network` when the refresh failed transiently; the next call retries
    /// - `Storage` when a refreshed credential could not be persisted; the
    ///   token is withheld so a rotated refresh token is never lost silently
    #[instrument(skip(self))]
    pub async fn ensure_valid_token(&self, connection_id: &str) -> Result<String> {
        let state = self.load(connection_id).await?;
        if let Some(token) = self.usable_token(&state)? {
            return Ok(token);
        }

        let _guard = self.refresh_locks.acquire(&connection_id.to_string()).await;

        // Another caller may have refreshed while we were waiting.
        let state = self.load(connection_id).await?;
        if let Some(token) = self.usable_token(&state)? {
            debug!(connection_id, "token refreshed by a concurrent request");
            return Ok(token);
        }

        self.refresh(state).await
    }

    async fn load(&self, connection_id: &str) -> Result<CredentialState> {
        self.store.load(connection_id).await?.ok_or_else(|| {
            DocPulseError::NotFound(format!("no credentials for connection {connection_id}"))
        })
    }

    fn usable_token(&self, state: &CredentialState) -> Result<Option<String>> {
        if state.is_terminal() {
            return Err(DocPulseError::ReauthRequired(format!(
                "connection {} is {:?}",
                state.connection_id, state.status
            )));
        }
        if state.needs_refresh(self.clock.now(), self.skew) {
            Ok(None)
        } else {
            Ok(Some(state.access_token.clone()))
        }
    }

    async fn refresh(&self, mut state: CredentialState) -> Result<String> {
        let connection_id = state.connection_id.clone();

        let Some(refresh_token) = state.refresh_token.clone() else {
            error!(connection_id, "no refresh token stored; marking connection expired");
            self.transition(&mut state, CredentialStatus::Expired).await;
            return Err(DocPulseError::ReauthRequired(format!(
                "connection {connection_id} has no refresh token"
            )));
        };

        info!(connection_id, "access token expired, refreshing");
        match self.refresher.refresh(&refresh_token).await {
            Ok(refreshed) => {
                state.access_token = refreshed.access_token;
                state.expires_at = self.clock.now() + Duration::seconds(refreshed.expires_in_secs);
                if let Some(rotated) = refreshed.refresh_token {
                    state.refresh_token = Some(rotated);
                }
                state.status = CredentialStatus::Active;

                if let Err(err) = self.persist(&state).await {
                    error!(connection_id, error = %err, "failed to persist refreshed token");
                    return Err(DocPulseError::Storage(format!(
                        "refreshed credentials for connection {connection_id} were not saved: {err}"
                    )));
                }
                info!(connection_id, expires_at = %state.expires_at, "access token refreshed");
                Ok(state.access_token)
            }
            Err(failure) if failure.is_permanent() => {
                error!(connection_id, error = %failure, "refresh rejected; marking connection expired");
                self.transition(&mut state, CredentialStatus::Expired).await;
                Err(DocPulseError::ReauthRequired(format!("connection {connection_id}: {failure}")))
            }
            Err(failure) => {
                warn!(connection_id, error = %failure, "token refresh failed transiently");
                self.transition(&mut state, CredentialStatus::Error).await;
                Err(DocPulseError::Network(format!(
                    "token refresh for connection {connection_id} failed: {failure}"
                )))
            }
        }
    }

    async fn persist(&self, state: &CredentialState) -> Result<()> {
        let mut attempt = 1;
        loop {
            match self.store.save(state).await {
                Ok(()) => return Ok(()),
                Err(err) if attempt < SAVE_ATTEMPTS => {
                    warn!(
                        connection_id = %state.connection_id,
                        attempt,
                        error = %err,
                        "credential save failed; retrying"
                    );
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn transition(&self, state: &mut CredentialState, status: CredentialStatus) {
        state.status = status;
        if let Err(err) = self.store.save(state).await {
            error!(
                connection_id = %state.connection_id,
                ?status,
                error = %err,
                "failed to persist credential status"
            );
        }
    }
}
