//! File and event fixtures anchored at a fixed instant.

use chrono::{DateTime, Duration, TimeZone, Utc};
use docpulse_domain::{ActionKind, ActivityEvent, CredentialState, FileKind, FileRecord};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 15, 0, 0).unwrap()
}

pub fn file(id: &str, name: &str, modified: DateTime<Utc>) -> FileRecord {
    FileRecord::new(id, name, FileKind::File, "application/pdf", modified)
}

pub fn folder(id: &str, name: &str) -> FileRecord {
    FileRecord::new(id, name, FileKind::Folder, "application/vnd.google-apps.folder", t0())
}

pub fn event(file_id: &str, action: ActionKind, at: DateTime<Utc>) -> ActivityEvent {
    ActivityEvent::new(file_id, action, at)
}

/// Credential valid for another hour at `t0`.
pub fn fresh_credential(connection_id: &str) -> CredentialState {
    CredentialState::active(
        connection_id,
        format!("access-{connection_id}"),
        Some(format!("refresh-{connection_id}")),
        t0() + Duration::hours(1),
    )
}

/// Credential that expired a minute before `t0`.
pub fn expired_credential(connection_id: &str) -> CredentialState {
    CredentialState::active(
        connection_id,
        format!("stale-{connection_id}"),
        Some(format!("refresh-{connection_id}")),
        t0() - Duration::minutes(1),
    )
}
