//! Dashboard summary counters.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use docpulse_domain::{BadgeKind, FileRecord, SummaryMetrics};

use crate::classify::{BadgeClassifier, ClassifyContext};

/// Count stale, large, sensitive and risky files in a sample. Files are
/// deduplicated by ID, first occurrence kept.
pub fn summarize(
    classifier: &BadgeClassifier,
    files: &[FileRecord],
    as_of: DateTime<Utc>,
) -> SummaryMetrics {
    let ctx = ClassifyContext::activity(as_of);
    let mut seen = HashSet::new();
    let mut metrics = SummaryMetrics::default();

    for file in files.iter().filter(|file| seen.insert(file.id.as_str())) {
        metrics.total_sampled += 1;
        if classifier.is_stale(file, as_of) {
            metrics.stale += 1;
        }
        if classifier.is_large(file) {
            metrics.large += 1;
        }

        let badges = classifier.classify(file, &ctx);
        if badges.iter().any(|badge| badge.is_sensitive()) {
            metrics.sensitive += 1;
        }
        if badges.iter().any(|badge| badge.kind == BadgeKind::Risk) {
            metrics.risky += 1;
        }
    }

    metrics
}
