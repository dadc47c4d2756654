//! Command layer - the entry points the CLI (or any other front end) calls.
//!
//! Every command times its execution and logs the outcome through
//! [`crate::utils::logging::log_command_execution`].

pub mod files;
pub mod insights;
pub mod quota;

pub use files::{list_files, recent_across};
pub use insights::{duplicates, summary};
pub use quota::{quota_summary, refresh_quotas, QuotaRefreshReport};
