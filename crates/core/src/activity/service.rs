//! Activity service
//!
//! One request runs the whole pipeline: valid token, ignore-set, concurrent
//! fetch, reconcile, classify, then filter/order/window for the requested
//! view. Source failures degrade to partial results; only credential
//! failures and an all-sources failure surface as errors.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use docpulse_common::Clock;
use docpulse_domain::constants::{DEFAULT_ACTIVITY_LOOKBACK_DAYS, INSIGHT_SAMPLE_SIZE};
use docpulse_domain::{
    ActivityQuery, CanonicalActivity, DocPulseError, DuplicateGroup, FetchConfig, FileQuery,
    FileRecord, IgnoreSet, ListingOrder, ListingQuery, Page, Result, ShareDirection,
    SortMode, SummaryMetrics, View,
};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::hydrate::hydrate_actors;
use crate::auth::TokenLifecycle;
use crate::classify::{BadgeClassifier, ClassifyContext};
use crate::fetch::ports::DriveSource;
use crate::fetch::{FetchPlan, MultiSourceFetcher};
use crate::ignore::IgnoreSetResolver;
use crate::insights::{find_duplicates, summarize};
use crate::ranking::{apply_filters, filter_shared, order_for_view, take_window};
use crate::reconcile::{assemble, listing_events, Reconciler};

/// A connection left out of a multi-connection result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionFailure {
    pub connection_id: String,
    pub error: DocPulseError,
}

/// Merged result over several linked connections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedFiles {
    pub page: Page<CanonicalActivity>,
    /// Connections that need re-authorization.
    pub failed_connections: Vec<ConnectionFailure>,
}

pub struct ActivityService {
    tokens: Arc<TokenLifecycle>,
    ignore: Arc<IgnoreSetResolver>,
    drive: Arc<dyn DriveSource>,
    fetcher: MultiSourceFetcher,
    classifier: BadgeClassifier,
    config: FetchConfig,
    clock: Arc<dyn Clock>,
}

impl ActivityService {
    pub fn new(
        tokens: Arc<TokenLifecycle>,
        ignore: Arc<IgnoreSetResolver>,
        drive: Arc<dyn DriveSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let config = FetchConfig::default();
        Self {
            fetcher: MultiSourceFetcher::from_config(Arc::clone(&drive), &config),
            tokens,
            ignore,
            drive,
            classifier: BadgeClassifier::default(),
            config,
            clock,
        }
    }

    pub fn with_fetch_config(mut self, config: FetchConfig) -> Self {
        self.fetcher = MultiSourceFetcher::from_config(Arc::clone(&self.drive), &config);
        self.config = config;
        self
    }

    pub fn with_classifier(mut self, classifier: BadgeClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn classifier(&self) -> &BadgeClassifier {
        &self.classifier
    }

    /// Files for one connection, ordered and windowed for `query.view`.
    ///
    /// # Errors
    /// - `ReauthRequired` / `NotFound` from the token lifecycle
    /// - the first source error when every source failed
    #[instrument(skip(self, query), fields(view = ?query.view, limit = query.limit))]
    pub async fn files(
        &self,
        connection_id: &str,
        query: &FileQuery,
    ) -> Result<Page<CanonicalActivity>> {
        let as_of = self.clock.now();
        let candidates = self.candidates(connection_id, query, as_of).await?;
        let page = self.window(candidates, query, as_of);

        info!(
            connection_id,
            returned = page.items.len(),
            total = page.total,
            "files ready"
        );
        Ok(page)
    }

    /// Run [`Self::files`] for every connection concurrently and merge.
    ///
    /// A connection needing re-authorization is reported in
    /// `failed_connections`; any other failure only drops its results.
    #[instrument(skip(self, connection_ids, query), fields(connections = connection_ids.len()))]
    pub async fn recent_across(
        &self,
        connection_ids: &[String],
        query: &FileQuery,
    ) -> Result<AggregatedFiles> {
        let as_of = self.clock.now();
        let results =
            join_all(connection_ids.iter().map(|id| self.candidates(id, query, as_of))).await;

        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        let mut failed_connections = Vec::new();

        for (connection_id, result) in connection_ids.iter().zip(results) {
            match result {
                Ok(records) => merged.extend(
                    records
                        .into_iter()
                        .filter(|record| seen.insert(record.file_id.clone()))
                        .map(|mut record| {
                            record.connection_id = Some(connection_id.clone());
                            record
                        }),
                ),
                Err(error) if error.is_terminal() => {
                    warn!(connection_id = %connection_id, error = %error, "connection needs re-authorization");
                    failed_connections.push(ConnectionFailure {
                        connection_id: connection_id.clone(),
                        error,
                    });
                }
                Err(error) => {
                    warn!(connection_id = %connection_id, error = %error, "connection failed; skipping its results");
                }
            }
        }

        Ok(AggregatedFiles { page: self.window(merged, query, as_of), failed_connections })
    }

    /// Dashboard counters over a sample of the caller's files.
    #[instrument(skip(self))]
    pub async fn summary(&self, connection_id: &str) -> Result<SummaryMetrics> {
        let sample = self.insight_sample(connection_id).await?;
        Ok(summarize(&self.classifier, &sample, self.clock.now()))
    }

    /// Likely duplicate files among the caller's largest files.
    #[instrument(skip(self))]
    pub async fn duplicates(&self, connection_id: &str) -> Result<Vec<DuplicateGroup>> {
        let sample = self.insight_sample(connection_id).await?;
        Ok(find_duplicates(&sample))
    }

    /* ---------------------------------------------------------------------- */
    /* Pipeline */
    /* ---------------------------------------------------------------------- */

    /// Classified, unwindowed candidates for one connection.
    async fn candidates(
        &self,
        connection_id: &str,
        query: &FileQuery,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<CanonicalActivity>> {
        let token = self.tokens.ensure_valid_token(connection_id).await?;
        let ignore = self.ignore.resolve(connection_id, &token).await;

        let mut records = match query.view {
            View::Recent | View::Trending => {
                self.activity_records(connection_id, &token, query, &ignore, as_of).await?
            }
            View::Shared => self.shared_records(connection_id, &token, &ignore).await?,
            View::Storage | View::Stale => {
                self.inventory_records(connection_id, &token, query, &ignore, as_of).await?
            }
        };

        let ctx = ClassifyContext { as_of, inventory: query.view.is_inventory(), last_activity: None };
        for record in &mut records {
            record.badges = self.classifier.classify(&record.file, &ctx);
        }

        if matches!(query.view, View::Recent | View::Trending) {
            hydrate_actors(self.drive.as_ref(), &token, &mut records).await;
        }
        Ok(records)
    }

    fn window(
        &self,
        mut candidates: Vec<CanonicalActivity>,
        query: &FileQuery,
        as_of: DateTime<Utc>,
    ) -> Page<CanonicalActivity> {
        let limit = self.config.clamp_limit(query.limit, query.view.is_inventory());
        if query.view == View::Shared {
            candidates = filter_shared(candidates, query);
        }
        let mut filtered = apply_filters(candidates, query, as_of);
        order_for_view(&mut filtered, query.view, query.sort);
        take_window(filtered, limit)
    }

    /// Event log plus recently viewed listing, reconciled.
    async fn activity_records(
        &self,
        connection_id: &str,
        token: &str,
        query: &FileQuery,
        ignore: &IgnoreSet,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<CanonicalActivity>> {
        let since = query
            .time_range
            .lower_bound(as_of)
            .unwrap_or_else(|| as_of - Duration::days(DEFAULT_ACTIVITY_LOOKBACK_DAYS));

        let plan = FetchPlan {
            activity: ActivityQuery {
                since,
                actions: Vec::new(),
                page_size: self.config.activity_page_size,
                max_results: self.config.activity_page_size as usize,
            },
            listing: ListingQuery {
                viewed_after: Some(since),
                excluded_parents: ignore.resolved_ids.iter().cloned().collect(),
                order: ListingOrder::RecentlyViewed,
                ..self.listing_defaults()
            },
        };

        let outcome = self.fetcher.fetch(connection_id, token, &plan).await;
        if outcome.all_sources_failed() {
            return Err(outcome
                .first_error()
                .cloned()
                .unwrap_or_else(|| DocPulseError::Internal("all sources failed".into())));
        }

        let mut reconciler = Reconciler::new();
        reconciler.extend(outcome.events);
        for file in &outcome.listing {
            reconciler.extend(listing_events(file));
        }

        let files = outcome.listing.into_iter().chain(outcome.backfilled);
        Ok(self.assemble_visible(reconciler, files, ignore, connection_id))
    }

    /// Files shared by or with the caller.
    async fn shared_records(
        &self,
        connection_id: &str,
        token: &str,
        ignore: &IgnoreSet,
    ) -> Result<Vec<CanonicalActivity>> {
        let excluded: Vec<String> = ignore.resolved_ids.iter().cloned().collect();
        let queries: Vec<ListingQuery> = [ShareDirection::ByMe, ShareDirection::WithMe]
            .into_iter()
            .map(|direction| ListingQuery {
                owned_by_me: Some(direction == ShareDirection::ByMe),
                shared: Some(direction),
                excluded_parents: excluded.clone(),
                ..self.listing_defaults()
            })
            .collect();

        let (files, _failures) = self.fetcher.list(connection_id, token, &queries).await?;
        Ok(self.from_listing(files, ignore, connection_id))
    }

    /// The caller's own files for storage and stale views.
    async fn inventory_records(
        &self,
        connection_id: &str,
        token: &str,
        query: &FileQuery,
        ignore: &IgnoreSet,
        as_of: DateTime<Utc>,
    ) -> Result<Vec<CanonicalActivity>> {
        let order = match (query.view, query.sort) {
            (View::Stale, _) | (_, SortMode::OldestFirst) => ListingOrder::OldestViewedFirst,
            _ => ListingOrder::LargestFirst,
        };
        let listing = ListingQuery {
            owned_by_me: Some(true),
            excluded_parents: ignore.resolved_ids.iter().cloned().collect(),
            order,
            ..self.listing_defaults()
        };

        let (mut files, _failures) =
            self.fetcher.list(connection_id, token, std::slice::from_ref(&listing)).await?;

        match query.view {
            View::Stale => files.retain(|file| self.classifier.is_stale(file, as_of)),
            _ => {
                let min_size =
                    query.size_ranges.iter().map(|range| range.bounds().0).min().unwrap_or(0);
                files.retain(|file| file.size_bytes.is_some_and(|bytes| bytes >= min_size));
            }
        }

        Ok(self.from_listing(files, ignore, connection_id))
    }

    async fn insight_sample(&self, connection_id: &str) -> Result<Vec<FileRecord>> {
        let token = self.tokens.ensure_valid_token(connection_id).await?;
        let ignore = self.ignore.resolve(connection_id, &token).await;
        let excluded: Vec<String> = ignore.resolved_ids.iter().cloned().collect();

        let queries: Vec<ListingQuery> =
            [ListingOrder::RecentlyViewed, ListingOrder::LargestFirst, ListingOrder::OldestViewedFirst]
                .into_iter()
                .map(|order| ListingQuery {
                    owned_by_me: Some(true),
                    excluded_parents: excluded.clone(),
                    order,
                    max_results: INSIGHT_SAMPLE_SIZE,
                    ..self.listing_defaults()
                })
                .collect();

        let (mut files, failures) = self.fetcher.list(connection_id, &token, &queries).await?;
        files.retain(|file| !ignore.excludes(file));
        debug!(connection_id, sampled = files.len(), failures = failures.len(), "insight sample");
        Ok(files)
    }

    fn listing_defaults(&self) -> ListingQuery {
        ListingQuery {
            page_size: self.config.listing_page_size,
            max_results: self.config.listing_page_size as usize,
            ..ListingQuery::default()
        }
    }

    fn from_listing(
        &self,
        files: Vec<FileRecord>,
        ignore: &IgnoreSet,
        connection_id: &str,
    ) -> Vec<CanonicalActivity> {
        let mut reconciler = Reconciler::new();
        for file in &files {
            reconciler.extend(listing_events(file));
        }
        self.assemble_visible(reconciler, files, ignore, connection_id)
    }

    /// Join reconciled events with metadata, dropping ignored files.
    fn assemble_visible(
        &self,
        reconciler: Reconciler,
        files: impl IntoIterator<Item = FileRecord>,
        ignore: &IgnoreSet,
        connection_id: &str,
    ) -> Vec<CanonicalActivity> {
        let files: HashMap<String, FileRecord> = files
            .into_iter()
            .filter(|file| !ignore.excludes(file))
            .map(|file| (file.id.clone(), file))
            .collect();

        let (records, skipped) = assemble(reconciler.finish(), &files);
        if skipped > 0 {
            debug!(connection_id, skipped, "dropped files without metadata or in ignored folders");
        }
        records
    }
}
