//! Port interfaces for storage quota

use async_trait::async_trait;
use docpulse_domain::{AccountQuota, Result};

/// Raw usage as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaUsage {
    pub used_bytes: u64,
    /// Zero when the account has no fixed limit.
    pub limit_bytes: u64,
    pub account_label: String,
}

#[async_trait]
pub trait QuotaSource: Send + Sync {
    async fn fetch_usage(&self, access_token: &str) -> Result<QuotaUsage>;
}

/// Last known quota per linked account.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    async fn load_all(&self) -> Result<Vec<AccountQuota>>;

    async fn save(&self, quota: &AccountQuota) -> Result<()>;
}
