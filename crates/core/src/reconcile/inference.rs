//! Events derived from listing timestamps.

use chrono::Duration;
use docpulse_domain::constants::VIEW_AFTER_EDIT_WINDOW_MINUTES;
use docpulse_domain::{ActionKind, ActivityEvent, FileRecord};

/// Turn a listing record's timestamps into events.
///
/// The modification time is an edit. The caller's view time is a view,
/// unless it lies within five minutes of the modification, in which case the
/// view was almost certainly caused by the caller's own edit and counts as
/// one. A shared-with-me time becomes a share event.
pub fn listing_events(file: &FileRecord) -> Vec<ActivityEvent> {
    let mut events =
        vec![ActivityEvent::new(&file.id, ActionKind::Edited, file.modified_at).from_listing()];

    if let Some(viewed_at) = file.viewed_at {
        let gap = viewed_at.signed_duration_since(file.modified_at).abs();
        let action = if gap <= Duration::minutes(VIEW_AFTER_EDIT_WINDOW_MINUTES) {
            ActionKind::Edited
        } else {
            ActionKind::Viewed
        };
        events.push(ActivityEvent::new(&file.id, action, viewed_at).from_listing());
    }

    if let Some(shared_at) = file.shared_at {
        events.push(ActivityEvent::new(&file.id, ActionKind::Shared, shared_at).from_listing());
    }

    events
}
