//! Aggregate insights computed over a sample of classified files.

use serde::{Deserialize, Serialize};

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub stale: usize,
    pub large: usize,
    pub sensitive: usize,
    pub risky: usize,
    pub total_sampled: usize,
}

/// Files sharing a case-folded name and exact size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub name: String,
    pub size_bytes: u64,
    pub file_ids: Vec<String>,
}

impl DuplicateGroup {
    /// Bytes that would be reclaimed by keeping a single copy.
    pub fn wasted_bytes(&self) -> u64 {
        self.size_bytes.saturating_mul(self.file_ids.len().saturating_sub(1) as u64)
    }
}
