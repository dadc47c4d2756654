//! Application context - dependency injection container
//!
//! Builds every adapter from a [`Config`] and hands the services to the
//! command layer as `Arc`s.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use docpulse_common::{Clock, SystemClock};
use docpulse_core::{
    ActivityService, BadgeClassifier, DriveSource, IgnorePatternSource, IgnoreSetResolver,
    QuotaService, QuotaSource, TokenLifecycle,
};
use docpulse_domain::{Config, CredentialState, DocPulseError, Result};
use docpulse_infra::{
    ConfiguredIgnorePatterns, GoogleDriveSource, GoogleTokenRefresher, HttpClient,
    InMemoryCredentialStore, InMemoryQuotaStore,
};
use tracing::{info, warn};

/// Connection id used when a single refresh token is supplied.
pub const DEFAULT_CONNECTION_ID: &str = "default";

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub credentials: Arc<InMemoryCredentialStore>,
    pub ignore_patterns: Arc<ConfiguredIgnorePatterns>,
    pub tokens: Arc<TokenLifecycle>,
    pub activity: Arc<ActivityService>,
    pub quota: Arc<QuotaService>,
    clock: Arc<dyn Clock>,
}

impl AppContext {
    /// Wire the context against the real system clock.
    ///
    /// # Errors
    /// Returns `DocPulseError::Config` when the provider endpoints or OAuth
    /// client settings are missing or invalid.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let http = HttpClient::from_config(&config.provider)?;

        let drive = Arc::new(GoogleDriveSource::new(http.clone(), &config.provider)?);
        let refresher = Arc::new(GoogleTokenRefresher::new(http, &config.provider)?);
        let credentials = Arc::new(InMemoryCredentialStore::new());
        let ignore_patterns = Arc::new(ConfiguredIgnorePatterns::from_config(&config.ignore)?);

        let tokens = Arc::new(
            TokenLifecycle::new(credentials.clone(), refresher, Arc::clone(&clock))
                .with_refresh_skew(config.fetch.refresh_skew()),
        );

        let drive_source: Arc<dyn DriveSource> = drive.clone();
        let pattern_source: Arc<dyn IgnorePatternSource> = ignore_patterns.clone();
        let ignore = Arc::new(
            IgnoreSetResolver::new(pattern_source, Arc::clone(&drive_source), Arc::clone(&clock))
                .with_ttl(config.ignore.cache_ttl())
                .with_timeout(config.fetch.source_timeout()),
        );

        let activity = Arc::new(
            ActivityService::new(Arc::clone(&tokens), ignore, drive_source, Arc::clone(&clock))
                .with_fetch_config(config.fetch.clone())
                .with_classifier(BadgeClassifier::new(config.classifier.clone())),
        );

        let quota_source: Arc<dyn QuotaSource> = drive;
        let quota = Arc::new(QuotaService::new(
            Arc::clone(&tokens),
            quota_source,
            Arc::new(InMemoryQuotaStore::new()),
            Arc::clone(&clock),
        ));

        info!(
            drive_api = %config.provider.drive_api_base,
            backfill_limit = config.fetch.backfill_limit,
            "application context initialized"
        );

        Ok(Self { config, credentials, ignore_patterns, tokens, activity, quota, clock })
    }

    /// Register a linked account by its refresh token.
    ///
    /// The stored access token is empty and already expired, so the first
    /// request for the connection performs a refresh grant.
    pub fn link_connection(&self, connection_id: &str, refresh_token: &str) {
        let expired: DateTime<Utc> = self.clock.now() - chrono::Duration::seconds(1);
        self.credentials.insert(CredentialState::active(
            connection_id,
            String::new(),
            Some(refresh_token.to_string()),
            expired,
        ));
        info!(connection_id, "connection linked");
    }

    pub fn connection_ids(&self) -> Vec<String> {
        self.credentials.connection_ids()
    }

    /// Link connections from `DOCPULSE_CONNECTIONS` (`id=token,id=token`) or,
    /// failing that, a single `DOCPULSE_REFRESH_TOKEN`.
    ///
    /// Returns the number of connections linked.
    ///
    /// # Errors
    /// Returns `DocPulseError::Config` when `DOCPULSE_CONNECTIONS` is malformed.
    pub fn seed_connections_from_env(&self) -> Result<usize> {
        let pairs = match std::env::var("DOCPULSE_CONNECTIONS") {
            Ok(value) => parse_connections(&value)?,
            Err(_) => match std::env::var("DOCPULSE_REFRESH_TOKEN") {
                Ok(token) if !token.trim().is_empty() => {
                    vec![(DEFAULT_CONNECTION_ID.to_string(), token.trim().to_string())]
                }
                _ => Vec::new(),
            },
        };

        if pairs.is_empty() {
            warn!("no connections configured; set DOCPULSE_CONNECTIONS or DOCPULSE_REFRESH_TOKEN");
        }
        for (connection_id, refresh_token) in &pairs {
            self.link_connection(connection_id, refresh_token);
        }
        Ok(pairs.len())
    }
}

/// Parse `id=refresh_token` pairs separated by commas.
///
/// # Errors
/// Returns `DocPulseError::Config` for an entry without `=`, an empty id or
/// token, or a repeated id.
pub fn parse_connections(value: &str) -> Result<Vec<(String, String)>> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for entry in value.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let (id, token) = entry.split_once('=').ok_or_else(|| {
            DocPulseError::Config(format!("connection entry '{entry}' must be id=refresh_token"))
        })?;
        let (id, token) = (id.trim(), token.trim());
        if id.is_empty() || token.is_empty() {
            return Err(DocPulseError::Config(format!(
                "connection entry '{entry}' has an empty id or token"
            )));
        }
        if pairs.iter().any(|(existing, _)| existing == id) {
            return Err(DocPulseError::Config(format!("connection '{id}' listed twice")));
        }
        pairs.push((id.to_string(), token.to_string()));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_connections_reads_pairs() {
        let pairs = parse_connections(" work=1//a , home=1//b=c ,").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("work".to_string(), "1//a".to_string()),
                ("home".to_string(), "1//b=c".to_string()),
            ]
        );
    }

    #[test]
    fn parse_connections_rejects_bad_entries() {
        assert!(matches!(parse_connections("work"), Err(DocPulseError::Config(_))));
        assert!(matches!(parse_connections("=token"), Err(DocPulseError::Config(_))));
        assert!(matches!(parse_connections("a=1,a=2"), Err(DocPulseError::Config(_))));
        assert!(parse_connections("").unwrap().is_empty());
    }
}
