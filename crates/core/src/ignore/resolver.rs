//! Ignore-set resolver
//!
//! Resolved sets are cached per connection in a [`TtlMap`] owned by the
//! resolver. An expired entry is recomputed in full; concurrent recomputation
//! for the same connection is allowed and the last write wins.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use docpulse_common::{Clock, TtlMap};
use docpulse_domain::constants::{DEFAULT_SOURCE_TIMEOUT_SECS, IGNORE_CACHE_TTL_HOURS};
use docpulse_domain::{DocPulseError, IgnoreSet, Result};
use tracing::{debug, info, instrument, warn};

use super::ports::IgnorePatternSource;
use crate::fetch::ports::DriveSource;

pub struct IgnoreSetResolver {
    patterns: Arc<dyn IgnorePatternSource>,
    drive: Arc<dyn DriveSource>,
    clock: Arc<dyn Clock>,
    cache: TtlMap<String, IgnoreSet>,
    timeout: StdDuration,
}

impl IgnoreSetResolver {
    pub fn new(
        patterns: Arc<dyn IgnorePatternSource>,
        drive: Arc<dyn DriveSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            patterns,
            drive,
            clock,
            cache: TtlMap::new(Duration::hours(IGNORE_CACHE_TTL_HOURS)),
            timeout: StdDuration::from_secs(DEFAULT_SOURCE_TIMEOUT_SECS),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.cache = TtlMap::new(ttl);
        self
    }

    pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Return the ignore-set for the connection, recomputing it when the
    /// cached copy is older than the TTL.
    ///
    /// Never fails: a resolution error yields an empty, uncached set so the
    /// request proceeds without exclusions.
    #[instrument(skip(self, access_token))]
    pub async fn resolve(&self, connection_id: &str, access_token: &str) -> IgnoreSet {
        let now = self.clock.now();
        if let Some(cached) = self.cache.get_fresh(connection_id, now) {
            debug!(connection_id, folders = cached.resolved_ids.len(), "ignore-set cache hit");
            return cached;
        }

        match self.compute(connection_id, access_token, now).await {
            Ok(set) => {
                info!(
                    connection_id,
                    patterns = set.patterns.len(),
                    folders = set.resolved_ids.len(),
                    "ignore-set resolved"
                );
                self.cache.insert(connection_id.to_string(), set.clone(), now);
                set
            }
            Err(err) => {
                warn!(connection_id, error = %err, "ignore-set resolution failed; no exclusions applied");
                IgnoreSet::empty(now)
            }
        }
    }

    /// Drop the cached set so the next request recomputes it.
    pub fn invalidate(&self, connection_id: &str) -> bool {
        self.cache.invalidate(connection_id)
    }

    async fn compute(
        &self,
        connection_id: &str,
        access_token: &str,
        now: DateTime<Utc>,
    ) -> Result<IgnoreSet> {
        let patterns = self.patterns.patterns(connection_id).await?;
        if patterns.is_empty() {
            return Ok(IgnoreSet::new(patterns, BTreeSet::new(), now));
        }

        let folders =
            tokio::time::timeout(self.timeout, self.drive.find_folders_by_name(access_token, &patterns))
                .await
                .map_err(|_| {
                    DocPulseError::Network(format!(
                        "folder lookup timed out after {:?}",
                        self.timeout
                    ))
                })??;

        let resolved_ids = folders
            .into_iter()
            .filter(|record| record.is_folder())
            .map(|record| record.id)
            .collect();

        Ok(IgnoreSet::new(patterns, resolved_ids, now))
    }
}
