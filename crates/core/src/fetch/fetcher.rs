//! Multi-source fetcher
//!
//! Fan-out/fan-in over independent provider calls. Every call runs under its
//! own timeout and a failure only empties that source's contribution; the
//! caller decides whether an all-sources failure is fatal.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use docpulse_domain::constants::{DEFAULT_BACKFILL_LIMIT, DEFAULT_SOURCE_TIMEOUT_SECS};
use docpulse_domain::{
    ActivityEvent, ActivityQuery, DocPulseError, FetchConfig, FileRecord, ListingQuery, Result,
};
use futures::future::{join, join_all};
use tracing::{debug, instrument, warn};

use super::ports::DriveSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    EventLog,
    Listing,
    Backfill,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::EventLog => "event_log",
            SourceKind::Listing => "listing",
            SourceKind::Backfill => "backfill",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: SourceKind,
    pub error: DocPulseError,
}

/// Queries for one activity fetch.
#[derive(Debug, Clone)]
pub struct FetchPlan {
    pub activity: ActivityQuery,
    pub listing: ListingQuery,
}

/// Everything the sources returned, plus what failed.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub events: Vec<ActivityEvent>,
    pub listing: Vec<FileRecord>,
    pub backfilled: Vec<FileRecord>,
    pub failures: Vec<SourceFailure>,
    /// Event-log file IDs that were not looked up because the cap was hit.
    pub backfill_skipped: usize,
}

impl FetchOutcome {
    fn failed(&self, source: SourceKind) -> bool {
        self.failures.iter().any(|failure| failure.source == source)
    }

    /// Both primary sources failed, so there is nothing to reconcile.
    pub fn all_sources_failed(&self) -> bool {
        self.failed(SourceKind::EventLog) && self.failed(SourceKind::Listing)
    }

    /// First primary-source error, for reporting an all-sources failure.
    pub fn first_error(&self) -> Option<&DocPulseError> {
        self.failures
            .iter()
            .find(|failure| failure.source != SourceKind::Backfill)
            .map(|failure| &failure.error)
    }
}

pub struct MultiSourceFetcher {
    drive: Arc<dyn DriveSource>,
    timeout: Duration,
    backfill_limit: usize,
}

impl MultiSourceFetcher {
    pub fn new(drive: Arc<dyn DriveSource>) -> Self {
        Self {
            drive,
            timeout: Duration::from_secs(DEFAULT_SOURCE_TIMEOUT_SECS),
            backfill_limit: DEFAULT_BACKFILL_LIMIT,
        }
    }

    pub fn from_config(drive: Arc<dyn DriveSource>, config: &FetchConfig) -> Self {
        Self { drive, timeout: config.source_timeout(), backfill_limit: config.backfill_limit }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_backfill_limit(mut self, limit: usize) -> Self {
        self.backfill_limit = limit;
        self
    }

    /// Run the event-log and listing queries concurrently, then backfill
    /// metadata for the first K event-log files the listing did not cover.
    #[instrument(skip(self, access_token, plan))]
    pub async fn fetch(
        &self,
        connection_id: &str,
        access_token: &str,
        plan: &FetchPlan,
    ) -> FetchOutcome {
        let (events, listing) = join(
            self.bounded(SourceKind::EventLog, self.drive.query_activity(access_token, &plan.activity)),
            self.bounded(SourceKind::Listing, self.drive.list_files(access_token, &plan.listing)),
        )
        .await;

        let mut outcome = FetchOutcome::default();
        match events {
            Ok(events) => outcome.events = events,
            Err(error) => outcome.record(connection_id, SourceKind::EventLog, error),
        }
        match listing {
            Ok(listing) => outcome.listing = listing,
            Err(error) => outcome.record(connection_id, SourceKind::Listing, error),
        }

        let missing = missing_file_ids(&outcome.events, &outcome.listing);
        let take = missing.len().min(self.backfill_limit);
        outcome.backfill_skipped = missing.len() - take;
        if outcome.backfill_skipped > 0 {
            debug!(
                connection_id,
                skipped = outcome.backfill_skipped,
                limit = self.backfill_limit,
                "backfill capped"
            );
        }

        let lookups = join_all(
            missing[..take]
                .iter()
                .map(|id| self.bounded(SourceKind::Backfill, self.drive.get_file(access_token, id))),
        )
        .await;

        for (id, lookup) in missing[..take].iter().zip(lookups) {
            match lookup {
                Ok(Some(record)) => outcome.backfilled.push(record),
                Ok(None) => debug!(connection_id, file_id = %id, "backfill target no longer exists"),
                Err(error) => outcome.record(connection_id, SourceKind::Backfill, error),
            }
        }

        debug!(
            connection_id,
            events = outcome.events.len(),
            listing = outcome.listing.len(),
            backfilled = outcome.backfilled.len(),
            failures = outcome.failures.len(),
            "fetch complete"
        );
        outcome
    }

    /// Run several listing queries concurrently and merge the results by
    /// file ID, first occurrence winning.
    ///
    /// # Errors
    /// Returns the first error only when every query failed.
    #[instrument(skip(self, access_token, queries), fields(queries = queries.len()))]
    pub async fn list(
        &self,
        connection_id: &str,
        access_token: &str,
        queries: &[ListingQuery],
    ) -> Result<(Vec<FileRecord>, Vec<SourceFailure>)> {
        let results = join_all(
            queries
                .iter()
                .map(|query| self.bounded(SourceKind::Listing, self.drive.list_files(access_token, query))),
        )
        .await;

        let mut seen = HashSet::new();
        let mut records = Vec::new();
        let mut outcome = FetchOutcome::default();
        let mut any_ok = queries.is_empty();

        for result in results {
            match result {
                Ok(batch) => {
                    any_ok = true;
                    records.extend(batch.into_iter().filter(|record| seen.insert(record.id.clone())));
                }
                Err(error) => outcome.record(connection_id, SourceKind::Listing, error),
            }
        }

        if !any_ok && !outcome.failures.is_empty() {
            return Err(outcome.failures.swap_remove(0).error);
        }
        Ok((records, outcome.failures))
    }

    async fn bounded<T, F>(&self, source: SourceKind, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(DocPulseError::Network(format!(
                "{} request timed out after {:?}",
                source.as_str(),
                self.timeout
            ))),
        }
    }
}

impl FetchOutcome {
    fn record(&mut self, connection_id: &str, source: SourceKind, error: DocPulseError) {
        warn!(
            connection_id,
            source = source.as_str(),
            error = %error,
            "source failed; continuing without its results"
        );
        self.failures.push(SourceFailure { source, error });
    }
}

/// Event-log file IDs absent from the listing, deduplicated, in first-seen
/// order.
fn missing_file_ids(events: &[ActivityEvent], listing: &[FileRecord]) -> Vec<String> {
    let listed: HashSet<&str> = listing.iter().map(|record| record.id.as_str()).collect();
    let mut seen = HashSet::new();
    events
        .iter()
        .map(|event| event.file_id.as_str())
        .filter(|id| !listed.contains(id) && seen.insert(*id))
        .map(str::to_string)
        .collect()
}
