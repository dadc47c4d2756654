//! Multi-source fetch: event log, listing and bounded metadata backfill.

pub mod fetcher;
pub mod ports;

pub use fetcher::{FetchOutcome, FetchPlan, MultiSourceFetcher, SourceFailure, SourceKind};
