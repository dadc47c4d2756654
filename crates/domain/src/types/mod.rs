//! Domain types and models

pub mod activity;
pub mod badge;
pub mod credential;
pub mod file;
pub mod ignore;
pub mod insight;
pub mod query;
pub mod quota;

pub use activity::{ActionKind, ActivityEvent, CanonicalActivity, EventSource};
pub use badge::{Badge, BadgeKind, RiskLevel};
pub use credential::{CredentialState, CredentialStatus, RefreshFailure, RefreshedToken};
pub use file::{FileKind, FileRecord, Owner, Permission, PrincipalType, Role};
pub use ignore::{parse_patterns, IgnoreSet};
pub use insight::{DuplicateGroup, SummaryMetrics};
pub use query::{
    ActivityQuery, FileQuery, FileTypeLabel, ListingOrder, ListingQuery, Page, ShareDirection,
    SizeRange, SortMode, TimeRange, View,
};
pub use quota::{AccountQuota, CategoryShare, QuotaSummary, StorageCategory};
