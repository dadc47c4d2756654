//! Quota service: refreshes per-account usage and aggregates a selection.

use std::sync::Arc;

use docpulse_common::Clock;
use docpulse_domain::{AccountQuota, QuotaSummary, Result};
use tracing::{info, instrument};

use super::aggregator::{aggregate, QuotaSelection};
use super::ports::{QuotaSource, QuotaStore};
use crate::auth::TokenLifecycle;

pub struct QuotaService {
    tokens: Arc<TokenLifecycle>,
    source: Arc<dyn QuotaSource>,
    store: Arc<dyn QuotaStore>,
    clock: Arc<dyn Clock>,
}

impl QuotaService {
    pub fn new(
        tokens: Arc<TokenLifecycle>,
        source: Arc<dyn QuotaSource>,
        store: Arc<dyn QuotaStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { tokens, source, store, clock }
    }

    /// Fetch current usage for one connection and store it.
    #[instrument(skip(self))]
    pub async fn refresh(&self, connection_id: &str) -> Result<AccountQuota> {
        let token = self.tokens.ensure_valid_token(connection_id).await?;
        let usage = self.source.fetch_usage(&token).await?;

        let quota = AccountQuota {
            account_id: connection_id.to_string(),
            label: usage.account_label,
            used_bytes: usage.used_bytes,
            limit_bytes: usage.limit_bytes,
            captured_at: self.clock.now(),
        };
        self.store.save(&quota).await?;

        info!(
            connection_id,
            used_bytes = quota.used_bytes,
            limit_bytes = quota.limit_bytes,
            "quota refreshed"
        );
        Ok(quota)
    }

    /// Every account with a stored snapshot, all selected.
    pub async fn default_selection(&self) -> Result<QuotaSelection> {
        let accounts = self.store.load_all().await?;
        Ok(QuotaSelection::new(accounts.into_iter().map(|account| account.account_id)))
    }

    /// Aggregate the stored snapshots of the selected accounts.
    #[instrument(skip(self, selection), fields(selected = selection.len()))]
    pub async fn summary(&self, selection: &QuotaSelection) -> Result<QuotaSummary> {
        let accounts = self.store.load_all().await?;
        Ok(aggregate(&accounts, selection))
    }
}
