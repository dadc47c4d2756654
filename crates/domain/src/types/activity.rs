//! Activity events and the reconciled per-file record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::badge::{Badge, RiskLevel};
use super::file::FileRecord;
use crate::constants::{HIGH_RANK_BUFFER_HOURS, LOW_RANK_BUFFER_MINUTES};

/* -------------------------------------------------------------------------- */
/* ActionKind */
/* -------------------------------------------------------------------------- */

/// Normalized action tag shared by every event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Created,
    Renamed,
    Restored,
    Commented,
    Shared,
    Unshared,
    Edited,
    Viewed,
    Deleted,
    Moved,
}

impl ActionKind {
    pub const ALL: [ActionKind; 10] = [
        ActionKind::Created,
        ActionKind::Renamed,
        ActionKind::Restored,
        ActionKind::Commented,
        ActionKind::Shared,
        ActionKind::Unshared,
        ActionKind::Edited,
        ActionKind::Viewed,
        ActionKind::Deleted,
        ActionKind::Moved,
    ];

    /// Significance tier: 3 for structural and collaboration actions, 2 for
    /// edits, 1 for everything passive or unclassified.
    pub fn rank(self) -> u8 {
        match self {
            ActionKind::Created
            | ActionKind::Renamed
            | ActionKind::Restored
            | ActionKind::Commented
            | ActionKind::Shared
            | ActionKind::Unshared => 3,
            ActionKind::Edited => 2,
            ActionKind::Viewed | ActionKind::Deleted | ActionKind::Moved => 1,
        }
    }

    /// Tolerance within which an event of this kind may override a
    /// lower-ranked one.
    pub fn buffer(self) -> Duration {
        if self.rank() >= 3 {
            Duration::hours(HIGH_RANK_BUFFER_HOURS)
        } else {
            Duration::minutes(LOW_RANK_BUFFER_MINUTES)
        }
    }

    /// Fixed ordering among kinds of equal rank observed at the same instant.
    pub fn tiebreak(self) -> u8 {
        match self {
            ActionKind::Created => 9,
            ActionKind::Restored => 8,
            ActionKind::Renamed => 7,
            ActionKind::Shared => 6,
            ActionKind::Unshared => 5,
            ActionKind::Commented => 4,
            ActionKind::Edited => 3,
            ActionKind::Viewed => 2,
            ActionKind::Moved => 1,
            ActionKind::Deleted => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Created => "Created",
            ActionKind::Renamed => "Renamed",
            ActionKind::Restored => "Restored",
            ActionKind::Commented => "Commented",
            ActionKind::Shared => "Shared",
            ActionKind::Unshared => "Unshared",
            ActionKind::Edited => "Edited",
            ActionKind::Viewed => "Viewed",
            ActionKind::Deleted => "Deleted",
            ActionKind::Moved => "Moved",
        }
    }
}

/* -------------------------------------------------------------------------- */
/* ActivityEvent */
/* -------------------------------------------------------------------------- */

/// Where an event was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// The provider's activity log.
    EventLog,
    /// Derived from timestamps on a listing record.
    Listing,
}

/// One observed action on one file. Exists only within a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub file_id: String,
    pub action: ActionKind,
    pub occurred_at: DateTime<Utc>,
    pub actor_id: Option<String>,
    pub source: EventSource,
}

impl ActivityEvent {
    pub fn new(file_id: impl Into<String>, action: ActionKind, occurred_at: DateTime<Utc>) -> Self {
        Self {
            file_id: file_id.into(),
            action,
            occurred_at,
            actor_id: None,
            source: EventSource::EventLog,
        }
    }

    pub fn with_actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    pub fn from_listing(mut self) -> Self {
        self.source = EventSource::Listing;
        self
    }

    pub fn rank(&self) -> u8 {
        self.action.rank()
    }
}

/* -------------------------------------------------------------------------- */
/* CanonicalActivity */
/* -------------------------------------------------------------------------- */

/// The reconciled view of a file: what last meaningfully happened, when, and
/// how concerning its sharing posture is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalActivity {
    pub file_id: String,
    pub chosen_action: ActionKind,
    pub chosen_at: DateTime<Utc>,
    pub actor_id: Option<String>,
    pub actor_name: Option<String>,
    /// Number of events folded into this record.
    pub activity_count: usize,
    pub file: FileRecord,
    pub badges: Vec<Badge>,
    /// Set when results from several linked accounts are merged.
    pub connection_id: Option<String>,
}

impl CanonicalActivity {
    /// Highest badge severity, 0 when unbadged.
    pub fn severity(&self) -> u8 {
        self.badges.iter().map(|badge| badge.kind.severity()).max().unwrap_or(0)
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::of(&self.badges)
    }
}
