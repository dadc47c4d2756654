//! Wire shapes for the Google Drive, Drive Activity, People and OAuth APIs.
//!
//! Only the fields we read are declared; everything is optional or defaulted
//! so partial responses deserialize and get filtered during normalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/* -------------------------------------------------------------------------- */
/* Drive v3 */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    /// Decimal string; absent for folders and native documents.
    pub size: Option<String>,
    pub modified_time: Option<DateTime<Utc>>,
    pub viewed_by_me_time: Option<DateTime<Utc>>,
    pub shared_with_me_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub owners: Vec<DriveUser>,
    #[serde(default)]
    pub permissions: Vec<DrivePermission>,
    #[serde(default)]
    pub shared: bool,
    #[serde(default)]
    pub owned_by_me: bool,
    pub web_view_link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveUser {
    pub display_name: Option<String>,
    pub email_address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DrivePermission {
    #[serde(rename = "type")]
    pub principal_type: String,
    pub role: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub user: Option<DriveUser>,
    pub storage_quota: Option<StorageQuota>,
}

/// Byte counts arrive as decimal strings. `limit` is absent for unlimited
/// accounts.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageQuota {
    pub limit: Option<String>,
    pub usage: Option<String>,
}

/* -------------------------------------------------------------------------- */
/* Drive Activity v2 */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQueryRequest {
    pub page_size: u32,
    pub filter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQueryResponse {
    #[serde(default)]
    pub activities: Vec<DriveActivity>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveActivity {
    pub primary_action_detail: Option<ActionDetail>,
    #[serde(default)]
    pub actors: Vec<Actor>,
    #[serde(default)]
    pub targets: Vec<Target>,
    pub timestamp: Option<DateTime<Utc>>,
    pub time_range: Option<ActivityTimeRange>,
}

/// One-of union in the API; exactly one member is set.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDetail {
    pub create: Option<serde_json::Value>,
    pub edit: Option<serde_json::Value>,
    #[serde(rename = "move")]
    pub move_: Option<serde_json::Value>,
    pub rename: Option<serde_json::Value>,
    pub delete: Option<serde_json::Value>,
    pub restore: Option<serde_json::Value>,
    pub comment: Option<serde_json::Value>,
    pub permission_change: Option<PermissionChange>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionChange {
    #[serde(default)]
    pub added_permissions: Vec<serde_json::Value>,
    #[serde(default)]
    pub removed_permissions: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTimeRange {
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Actor {
    pub user: Option<ActorUser>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorUser {
    pub known_user: Option<KnownUser>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownUser {
    /// `people/<id>`
    pub person_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub drive_item: Option<DriveItem>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DriveItem {
    /// `items/<file id>`
    #[serde(default)]
    pub name: String,
}

/* -------------------------------------------------------------------------- */
/* People v1 */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Default, Deserialize)]
pub struct PeopleBatchResponse {
    #[serde(default)]
    pub responses: Vec<PersonResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    pub requested_resource_name: Option<String>,
    pub person: Option<Person>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub names: Vec<PersonName>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    pub display_name: Option<String>,
}

/* -------------------------------------------------------------------------- */
/* OAuth token endpoint */
/* -------------------------------------------------------------------------- */

#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TokenErrorResponse {
    #[serde(default)]
    pub error: String,
    pub error_description: Option<String>,
}
