//! Storage quota snapshots and the aggregated breakdown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last known usage for one linked account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountQuota {
    pub account_id: String,
    pub label: String,
    pub used_bytes: u64,
    /// Zero when the provider reports unlimited storage.
    pub limit_bytes: u64,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageCategory {
    Videos,
    Images,
    Documents,
    Audio,
    Other,
    Free,
}

impl StorageCategory {
    /// Approximate share of used bytes attributed to each category.
    pub const TEMPLATE: [(StorageCategory, f64); 5] = [
        (StorageCategory::Videos, 0.45),
        (StorageCategory::Images, 0.25),
        (StorageCategory::Documents, 0.15),
        (StorageCategory::Audio, 0.10),
        (StorageCategory::Other, 0.05),
    ];

    pub fn label(self) -> &'static str {
        match self {
            StorageCategory::Videos => "Videos",
            StorageCategory::Images => "Images",
            StorageCategory::Documents => "Documents",
            StorageCategory::Audio => "Audio",
            StorageCategory::Other => "Other",
            StorageCategory::Free => "Free",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: StorageCategory,
    pub bytes: u64,
    /// Percentage of total capacity, 0..=100.
    pub percentage: f64,
}

/// Sum over the selected accounts with an estimated category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaSummary {
    pub selected_accounts: Vec<String>,
    pub used_bytes: u64,
    pub limit_bytes: u64,
    pub usage_percent: f64,
    pub categories: Vec<CategoryShare>,
}
