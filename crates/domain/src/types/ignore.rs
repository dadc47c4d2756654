//! Resolved ignore-set for one connection.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::file::FileRecord;

/// Folder IDs excluded from every listing, resolved from name patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreSet {
    pub patterns: Vec<String>,
    pub resolved_ids: BTreeSet<String>,
    pub resolved_at: DateTime<Utc>,
}

impl IgnoreSet {
    pub fn new(
        patterns: Vec<String>,
        resolved_ids: BTreeSet<String>,
        resolved_at: DateTime<Utc>,
    ) -> Self {
        Self { patterns, resolved_ids, resolved_at }
    }

    /// Empty set used when patterns are absent or resolution failed.
    pub fn empty(resolved_at: DateTime<Utc>) -> Self {
        Self { resolved_at, ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.resolved_ids.is_empty()
    }

    /// Whether the record is an ignored folder or sits directly inside one.
    pub fn excludes(&self, file: &FileRecord) -> bool {
        self.resolved_ids.contains(&file.id)
            || file.parent_ids.iter().any(|parent| self.resolved_ids.contains(parent))
    }
}

/// Parse newline-separated ignore patterns. Blank lines and `#` comments are
/// skipped, surrounding whitespace and trailing `/` are trimmed, duplicates
/// keep their first position.
pub fn parse_patterns(text: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.trim_end_matches('/').trim().to_string())
        .filter(|pattern| !pattern.is_empty() && seen.insert(pattern.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::types::file::FileKind;

    #[test]
    fn parses_patterns_skipping_comments_and_duplicates() {
        let text = "# personal\nArchive/\n\n  Photos  \nArchive\n#Old\n";
        assert_eq!(parse_patterns(text), vec!["Archive".to_string(), "Photos".to_string()]);
    }

    #[test]
    fn excludes_children_of_resolved_folders() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let set = IgnoreSet::new(
            vec!["Archive".into()],
            BTreeSet::from(["folder-1".to_string()]),
            now,
        );
        let child = FileRecord::new("f", "a.pdf", FileKind::File, "application/pdf", now)
            .with_parent("folder-1");
        let other = FileRecord::new("g", "b.pdf", FileKind::File, "application/pdf", now)
            .with_parent("folder-2");

        assert!(set.excludes(&child));
        assert!(!set.excludes(&other));
    }
}
