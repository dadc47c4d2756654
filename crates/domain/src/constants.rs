//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application. Most of these are defaults for [`crate::Config`] fields.

// Reconciliation
pub const HIGH_RANK_BUFFER_HOURS: i64 = 12;
pub const LOW_RANK_BUFFER_MINUTES: i64 = 10;
pub const VIEW_AFTER_EDIT_WINDOW_MINUTES: i64 = 5;

// Ignore-set cache
pub const IGNORE_CACHE_TTL_HOURS: i64 = 24;

// Fetching
pub const DEFAULT_BACKFILL_LIMIT: usize = 10;
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LISTING_PAGE_SIZE: u32 = 100;
pub const DEFAULT_ACTIVITY_PAGE_SIZE: u32 = 100;
pub const PRINCIPAL_BATCH_SIZE: usize = 50;
/// Event-log lower bound when the caller asks for all time.
pub const DEFAULT_ACTIVITY_LOOKBACK_DAYS: i64 = 28;
/// Listing sample used for dashboard summaries and duplicate detection.
pub const INSIGHT_SAMPLE_SIZE: usize = 500;

// Token lifecycle
pub const DEFAULT_REFRESH_SKEW_SECS: i64 = 60;

// Classification thresholds
pub const CLEANUP_INACTIVE_DAYS: i64 = 90;
pub const STALE_INACTIVE_DAYS: i64 = 180;
pub const LARGE_FILE_BYTES: u64 = 500 * 1024 * 1024;

// Result windows
pub const DEFAULT_RESULT_LIMIT: usize = 20;
pub const MAX_RESULT_LIMIT: usize = 50;
pub const INVENTORY_MAX_RESULT_LIMIT: usize = 100;

// Badge texts
pub const BADGE_PUBLIC_EDIT: &str = "Anyone with link can edit";
pub const BADGE_PUBLIC_VIEW: &str = "Publicly shared";
pub const BADGE_SENSITIVE_NAME: &str = "May contain sensitive content";
pub const BADGE_SHARED_EXTERNALLY: &str = "Shared externally";
