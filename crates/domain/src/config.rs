//! Configuration structures
//!
//! Every section implements `Default` with the documented constants and is
//! `#[serde(default)]`, so partial JSON/TOML files are accepted.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CLEANUP_INACTIVE_DAYS, DEFAULT_ACTIVITY_PAGE_SIZE, DEFAULT_BACKFILL_LIMIT,
    DEFAULT_LISTING_PAGE_SIZE, DEFAULT_REFRESH_SKEW_SECS, DEFAULT_SOURCE_TIMEOUT_SECS,
    IGNORE_CACHE_TTL_HOURS, INVENTORY_MAX_RESULT_LIMIT, LARGE_FILE_BYTES, MAX_RESULT_LIMIT,
    STALE_INACTIVE_DAYS,
};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub fetch: FetchConfig,
    pub classifier: ClassifierConfig,
    pub ignore: IgnoreConfig,
    pub logging: LoggingConfig,
}

/// External provider endpoints and OAuth client credentials
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub token_endpoint: String,
    pub drive_api_base: String,
    pub activity_api_base: String,
    pub people_api_base: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub request_timeout_secs: u64,
    /// Total attempts per HTTP call, 1 disables retries.
    pub max_attempts: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            token_endpoint: "https://oauth2.googleapis.com/token".into(),
            drive_api_base: "https://www.googleapis.com/drive/v3".into(),
            activity_api_base: "https://driveactivity.googleapis.com/v2".into(),
            people_api_base: "https://people.googleapis.com/v1".into(),
            client_id: None,
            client_secret: None,
            request_timeout_secs: DEFAULT_SOURCE_TIMEOUT_SECS,
            max_attempts: 1,
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("token_endpoint", &self.token_endpoint)
            .field("drive_api_base", &self.drive_api_base)
            .field("activity_api_base", &self.activity_api_base)
            .field("people_api_base", &self.people_api_base)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[redacted]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

/// Multi-source fetch and result-window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// First-K cap on per-ID metadata lookups.
    pub backfill_limit: usize,
    pub source_timeout_secs: u64,
    pub listing_page_size: u32,
    pub activity_page_size: u32,
    pub max_limit: usize,
    pub inventory_max_limit: usize,
    /// Tokens are treated as expired this many seconds before `expires_at`.
    pub refresh_skew_secs: i64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            backfill_limit: DEFAULT_BACKFILL_LIMIT,
            source_timeout_secs: DEFAULT_SOURCE_TIMEOUT_SECS,
            listing_page_size: DEFAULT_LISTING_PAGE_SIZE,
            activity_page_size: DEFAULT_ACTIVITY_PAGE_SIZE,
            max_limit: MAX_RESULT_LIMIT,
            inventory_max_limit: INVENTORY_MAX_RESULT_LIMIT,
            refresh_skew_secs: DEFAULT_REFRESH_SKEW_SECS,
        }
    }
}

impl FetchConfig {
    pub fn source_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.source_timeout_secs)
    }

    pub fn refresh_skew(&self) -> Duration {
        Duration::seconds(self.refresh_skew_secs)
    }

    /// Clamp a caller-supplied limit into `1..=max`, where inventory views
    /// get the larger ceiling.
    pub fn clamp_limit(&self, requested: usize, inventory: bool) -> usize {
        let ceiling = if inventory { self.inventory_max_limit } else { self.max_limit };
        requested.clamp(1, ceiling.max(1))
    }
}

/// Badge classifier thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub cleanup_inactive_days: i64,
    pub stale_inactive_days: i64,
    pub large_file_bytes: u64,
    /// Appended to the built-in sensitive keyword set.
    pub extra_sensitive_keywords: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            cleanup_inactive_days: CLEANUP_INACTIVE_DAYS,
            stale_inactive_days: STALE_INACTIVE_DAYS,
            large_file_bytes: LARGE_FILE_BYTES,
            extra_sensitive_keywords: Vec::new(),
        }
    }
}

impl ClassifierConfig {
    pub fn cleanup_threshold(&self) -> Duration {
        Duration::days(self.cleanup_inactive_days)
    }

    pub fn stale_threshold(&self) -> Duration {
        Duration::days(self.stale_inactive_days)
    }

    pub fn cleanup_badge_text(&self) -> String {
        format!("Large and unused for {}+ days", self.cleanup_inactive_days)
    }

    pub fn stale_badge_text(&self) -> String {
        format!("Not opened in {}+ days", self.stale_inactive_days)
    }
}

/// Ignore-set settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    pub cache_ttl_hours: i64,
    /// Inline folder-name patterns.
    pub patterns: Vec<String>,
    /// Optional path to a newline-separated pattern file.
    pub patterns_file: Option<String>,
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self { cache_ttl_hours: IGNORE_CACHE_TTL_HOURS, patterns: Vec::new(), patterns_file: None }
    }
}

impl IgnoreConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::hours(self.cache_ttl_hours)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Tracing subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".into(), format: LogFormat::Pretty }
    }
}
