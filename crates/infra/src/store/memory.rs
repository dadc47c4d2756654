//! In-memory stores
//!
//! Credential, ignore-pattern and quota state live outside the engine in a
//! deployed system; these implementations back the CLI and integration
//! tests.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use docpulse_core::{CredentialStore, IgnorePatternSource, QuotaStore};
use docpulse_domain::{
    parse_patterns, AccountQuota, CredentialState, DocPulseError, IgnoreConfig, Result,
};
use parking_lot::RwLock;
use tracing::{debug, info};

/* -------------------------------------------------------------------------- */
/* Credentials */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Default, Clone)]
pub struct InMemoryCredentialStore {
    entries: Arc<DashMap<String, CredentialState>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a connection, replacing any existing state.
    pub fn insert(&self, state: CredentialState) {
        self.entries.insert(state.connection_id.clone(), state);
    }

    pub fn connection_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self, connection_id: &str) -> Result<Option<CredentialState>> {
        Ok(self.entries.get(connection_id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, state: &CredentialState) -> Result<()> {
        debug!(connection_id = %state.connection_id, status = ?state.status, "credential saved");
        self.entries.insert(state.connection_id.clone(), state.clone());
        Ok(())
    }
}

/* -------------------------------------------------------------------------- */
/* Ignore patterns */
/* -------------------------------------------------------------------------- */

/// Patterns from configuration, optionally overridden per connection.
#[derive(Debug, Default)]
pub struct ConfiguredIgnorePatterns {
    shared: Vec<String>,
    per_connection: DashMap<String, Vec<String>>,
}

impl ConfiguredIgnorePatterns {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { shared: patterns, per_connection: DashMap::new() }
    }

    /// Inline patterns plus the pattern file, if one is configured.
    ///
    /// # Errors
    /// Returns `DocPulseError::Config` when the pattern file cannot be read.
    pub fn from_config(config: &IgnoreConfig) -> Result<Self> {
        let mut text = config.patterns.join("\n");
        if let Some(path) = &config.patterns_file {
            let file = std::fs::read_to_string(path).map_err(|e| {
                DocPulseError::Config(format!("failed to read ignore patterns from {path}: {e}"))
            })?;
            text.push('\n');
            text.push_str(&file);
        }

        let patterns = parse_patterns(&text);
        info!(count = patterns.len(), "ignore patterns configured");
        Ok(Self::new(patterns))
    }

    /// Replace a connection's patterns with newline-separated source text.
    pub fn set_connection_text(&self, connection_id: impl Into<String>, text: &str) {
        self.per_connection.insert(connection_id.into(), parse_patterns(text));
    }
}

#[async_trait]
impl IgnorePatternSource for ConfiguredIgnorePatterns {
    async fn patterns(&self, connection_id: &str) -> Result<Vec<String>> {
        Ok(self
            .per_connection
            .get(connection_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| self.shared.clone()))
    }
}

/* -------------------------------------------------------------------------- */
/* Quota snapshots */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Default)]
pub struct InMemoryQuotaStore {
    quotas: RwLock<Vec<AccountQuota>>,
}

impl InMemoryQuotaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuotaStore for InMemoryQuotaStore {
    async fn load_all(&self) -> Result<Vec<AccountQuota>> {
        Ok(self.quotas.read().clone())
    }

    async fn save(&self, quota: &AccountQuota) -> Result<()> {
        let mut quotas = self.quotas.write();
        match quotas.iter_mut().find(|existing| existing.account_id == quota.account_id) {
            Some(existing) => *existing = quota.clone(),
            None => quotas.push(quota.clone()),
        }
        Ok(())
    }
}
