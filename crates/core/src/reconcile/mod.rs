//! Event reconciliation
//!
//! Groups events by file, picks one canonical event per file with the
//! rank-and-buffer rule in [`merge`], and joins the choice with the file's
//! metadata. Files with no metadata after backfill are skipped.

pub mod inference;
pub mod merge;

use std::collections::HashMap;

use docpulse_domain::{ActivityEvent, CanonicalActivity, FileRecord};
use tracing::debug;

pub use inference::listing_events;
pub use merge::{choose, supersedes};

/// The chosen event for one file and how many events were folded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub event: ActivityEvent,
    pub activity_count: usize,
}

/// Accumulates events per file, preserving first-seen file order.
#[derive(Debug, Default)]
pub struct Reconciler {
    by_file: HashMap<String, Vec<ActivityEvent>>,
    order: Vec<String>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, event: ActivityEvent) {
        match self.by_file.get_mut(&event.file_id) {
            Some(events) => events.push(event),
            None => {
                self.order.push(event.file_id.clone());
                self.by_file.insert(event.file_id.clone(), vec![event]);
            }
        }
    }

    pub fn extend<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = ActivityEvent>,
    {
        for event in events {
            self.add(event);
        }
    }

    pub fn file_count(&self) -> usize {
        self.order.len()
    }

    /// One [`Reconciled`] per file, in first-seen order.
    pub fn finish(mut self) -> Vec<Reconciled> {
        self.order
            .iter()
            .filter_map(|file_id| {
                let events = self.by_file.remove(file_id)?;
                let event = choose(&events)?.clone();
                Some(Reconciled { event, activity_count: events.len() })
            })
            .collect()
    }
}

/// Join reconciled events with metadata. Returns the records (unbadged) and
/// the number of files skipped for lack of metadata.
pub fn assemble(
    reconciled: Vec<Reconciled>,
    files: &HashMap<String, FileRecord>,
) -> (Vec<CanonicalActivity>, usize) {
    let mut skipped = 0;
    let mut records = Vec::with_capacity(reconciled.len());

    for Reconciled { event, activity_count } in reconciled {
        let Some(file) = files.get(&event.file_id) else {
            debug!(file_id = %event.file_id, "no metadata for reconciled file; skipping");
            skipped += 1;
            continue;
        };
        records.push(CanonicalActivity {
            file_id: event.file_id,
            chosen_action: event.action,
            chosen_at: event.occurred_at,
            actor_id: event.actor_id,
            actor_name: None,
            activity_count,
            file: file.clone(),
            badges: Vec::new(),
            connection_id: None,
        });
    }

    (records, skipped)
}
