//! Filtering, ordering and first-N windowing.
//!
//! Every function takes the full candidate list and returns a new one, so a
//! filter change simply re-runs the chain from scratch.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use docpulse_domain::{CanonicalActivity, FileQuery, Page, ShareDirection, SortMode, View};

/// Type ∩ size ∩ time. An empty selection set does not filter.
pub fn apply_filters(
    items: Vec<CanonicalActivity>,
    query: &FileQuery,
    as_of: DateTime<Utc>,
) -> Vec<CanonicalActivity> {
    items
        .into_iter()
        .filter(|item| query.types.is_empty() || query.types.contains(&item.file.type_label()))
        .filter(|item| {
            query.size_ranges.is_empty()
                || item
                    .file
                    .size_bytes
                    .is_some_and(|bytes| query.size_ranges.iter().any(|range| range.contains(bytes)))
        })
        .filter(|item| query.time_range.contains(item.chosen_at, as_of))
        .collect()
}

/// Shared-view filters: risk level and sharing direction.
pub fn filter_shared(items: Vec<CanonicalActivity>, query: &FileQuery) -> Vec<CanonicalActivity> {
    items
        .into_iter()
        .filter(|item| item.file.shared)
        .filter(|item| query.risk_levels.is_empty() || query.risk_levels.contains(&item.risk_level()))
        .filter(|item| {
            query.directions.is_empty() || query.directions.contains(&direction_of(item))
        })
        .collect()
}

fn direction_of(item: &CanonicalActivity) -> ShareDirection {
    if item.file.owned_by_me {
        ShareDirection::ByMe
    } else {
        ShareDirection::WithMe
    }
}

/// Severity desc, then `chosen_at` desc.
pub fn rank_by_severity(items: &mut [CanonicalActivity]) {
    items.sort_by_key(|item| (Reverse(item.severity()), Reverse(item.chosen_at)));
}

/// Event count desc, then view time desc. Unviewed files sort last.
pub fn rank_by_activity(items: &mut [CanonicalActivity]) {
    items.sort_by_key(|item| (Reverse(item.activity_count), Reverse(item.file.viewed_at)));
}

/// Size desc, or last access asc.
pub fn rank_for_storage(items: &mut [CanonicalActivity], sort: SortMode) {
    match sort {
        SortMode::SizeDesc => {
            items.sort_by_key(|item| Reverse(item.file.size_bytes.unwrap_or(0)));
        }
        SortMode::OldestFirst => items.sort_by_key(|item| item.file.last_accessed_at()),
    }
}

/// Order for the given view.
pub fn order_for_view(items: &mut [CanonicalActivity], view: View, sort: SortMode) {
    match view {
        View::Recent | View::Shared => rank_by_severity(items),
        View::Trending => rank_by_activity(items),
        View::Storage => rank_for_storage(items, sort),
        View::Stale => rank_for_storage(items, SortMode::OldestFirst),
    }
}

/// First `limit` items of an already sorted and filtered list.
pub fn take_window<T>(mut items: Vec<T>, limit: usize) -> Page<T> {
    let total = items.len();
    items.truncate(limit);
    Page { has_more: total > items.len(), total, items }
}
