//! Provider payloads → domain records.
//!
//! Records missing the fields we cannot do without (a file ID, a
//! modification time, an activity timestamp) are dropped here so nothing
//! downstream sees a half-filled record.

use chrono::{DateTime, Utc};
use docpulse_core::QuotaUsage;
use docpulse_domain::{
    ActionKind, ActivityEvent, DocPulseError, FileKind, FileRecord, Owner, Permission,
    PrincipalType, Result, Role,
};
use tracing::debug;

use super::query::FOLDER_MIME;
use super::types::{About, ActionDetail, DriveActivity, DriveFile, DrivePermission};

const ITEM_PREFIX: &str = "items/";

pub fn file_record(file: DriveFile) -> Option<FileRecord> {
    if file.id.is_empty() {
        debug!("listing entry without an id; skipping");
        return None;
    }
    let Some(modified_at) = file.modified_time else {
        debug!(file_id = %file.id, "listing entry without modifiedTime; skipping");
        return None;
    };

    let kind = if file.mime_type == FOLDER_MIME { FileKind::Folder } else { FileKind::File };
    let size_bytes = match kind {
        FileKind::Folder => None,
        FileKind::File => file.size.as_deref().and_then(|raw| raw.parse::<u64>().ok()),
    };

    Some(FileRecord {
        id: file.id,
        name: file.name,
        kind,
        mime_type: file.mime_type,
        size_bytes,
        modified_at,
        viewed_at: file.viewed_by_me_time,
        shared_at: file.shared_with_me_time,
        parent_ids: file.parents,
        owners: file
            .owners
            .into_iter()
            .map(|owner| Owner {
                display_name: owner
                    .display_name
                    .or_else(|| owner.email_address.clone())
                    .unwrap_or_default(),
                email: owner.email_address,
            })
            .collect(),
        permissions: file.permissions.iter().filter_map(permission).collect(),
        shared: file.shared,
        owned_by_me: file.owned_by_me,
        web_view_link: file.web_view_link,
    })
}

fn permission(raw: &DrivePermission) -> Option<Permission> {
    let principal_type = match raw.principal_type.as_str() {
        "anyone" => PrincipalType::Anyone,
        "user" | "group" => PrincipalType::User,
        "domain" => PrincipalType::Domain,
        _ => return None,
    };
    let role = match raw.role.as_str() {
        "owner" => Role::Owner,
        "writer" | "organizer" | "fileOrganizer" => Role::Writer,
        "reader" | "commenter" => Role::Reader,
        _ => return None,
    };
    Some(Permission::new(principal_type, role))
}

/// One event per drive-item target. Unknown action kinds yield nothing.
pub fn activity_events(activity: DriveActivity) -> Vec<ActivityEvent> {
    let Some(action) = activity.primary_action_detail.as_ref().and_then(action_kind) else {
        return Vec::new();
    };
    let Some(occurred_at) = occurred_at(&activity) else {
        debug!("activity without a timestamp; skipping");
        return Vec::new();
    };
    let actor = activity
        .actors
        .iter()
        .find_map(|actor| actor.user.as_ref()?.known_user.as_ref()?.person_name.clone());

    activity
        .targets
        .iter()
        .filter_map(|target| target.drive_item.as_ref())
        .filter_map(|item| item.name.strip_prefix(ITEM_PREFIX))
        .filter(|id| !id.is_empty())
        .map(|id| {
            let event = ActivityEvent::new(id, action, occurred_at);
            match &actor {
                Some(actor) => event.with_actor(actor.clone()),
                None => event,
            }
        })
        .collect()
}

fn occurred_at(activity: &DriveActivity) -> Option<DateTime<Utc>> {
    activity.timestamp.or_else(|| activity.time_range.as_ref()?.end_time)
}

fn action_kind(detail: &ActionDetail) -> Option<ActionKind> {
    if detail.create.is_some() {
        Some(ActionKind::Created)
    } else if detail.edit.is_some() {
        Some(ActionKind::Edited)
    } else if detail.move_.is_some() {
        Some(ActionKind::Moved)
    } else if detail.rename.is_some() {
        Some(ActionKind::Renamed)
    } else if detail.delete.is_some() {
        Some(ActionKind::Deleted)
    } else if detail.restore.is_some() {
        Some(ActionKind::Restored)
    } else if detail.comment.is_some() {
        Some(ActionKind::Commented)
    } else if let Some(change) = &detail.permission_change {
        if change.added_permissions.is_empty() {
            Some(ActionKind::Unshared)
        } else {
            Some(ActionKind::Shared)
        }
    } else {
        None
    }
}

/// # Errors
/// Returns `DocPulseError::Provider` when the response has no usage figure.
pub fn quota_usage(about: About) -> Result<QuotaUsage> {
    let quota = about
        .storage_quota
        .ok_or_else(|| DocPulseError::Provider("about response has no storageQuota".into()))?;
    let used_bytes = parse_bytes(quota.usage.as_deref(), "usage")?
        .ok_or_else(|| DocPulseError::Provider("storageQuota has no usage".into()))?;
    let limit_bytes = parse_bytes(quota.limit.as_deref(), "limit")?.unwrap_or(0);

    let account_label = about
        .user
        .and_then(|user| user.email_address.or(user.display_name))
        .unwrap_or_else(|| "Google Drive".to_string());

    Ok(QuotaUsage { used_bytes, limit_bytes, account_label })
}

fn parse_bytes(raw: Option<&str>, field: &str) -> Result<Option<u64>> {
    raw.map(|value| {
        value
            .parse::<u64>()
            .map_err(|e| DocPulseError::Provider(format!("storageQuota.{field} is not a byte count: {e}")))
    })
    .transpose()
}
