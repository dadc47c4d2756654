//! # DocPulse Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the provider, credential store,
//!   ignore-pattern source and quota store
//! - The reconciliation pipeline: token lifecycle, ignore-set resolution,
//!   multi-source fetch, event merge, badge classification, ranking
//! - Quota aggregation and dashboard insights
//!
//! ## Architecture Principles
//! - Only depends on `docpulse-common` and `docpulse-domain`
//! - No HTTP or storage code
//! - All external dependencies via traits
//! - Time is read through an injected `Clock`

pub mod activity;
pub mod auth;
pub mod classify;
pub mod fetch;
pub mod ignore;
pub mod insights;
pub mod quota;
pub mod ranking;
pub mod reconcile;

// Re-export specific items to avoid ambiguity
pub use activity::{ActivityService, AggregatedFiles, ConnectionFailure};
pub use auth::ports::{CredentialStore, TokenRefresher};
pub use auth::TokenLifecycle;
pub use classify::{BadgeClassifier, ClassifyContext};
pub use fetch::ports::DriveSource;
pub use fetch::{FetchOutcome, FetchPlan, MultiSourceFetcher, SourceFailure, SourceKind};
pub use ignore::ports::IgnorePatternSource;
pub use ignore::IgnoreSetResolver;
pub use quota::ports::{QuotaSource, QuotaStore, QuotaUsage};
pub use quota::{QuotaSelection, QuotaService};
pub use reconcile::{Reconciled, Reconciler};
