//! Provider file metadata, normalized once at the fetch boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::query::FileTypeLabel;

/* -------------------------------------------------------------------------- */
/* Permissions */
/* -------------------------------------------------------------------------- */

/// Who a permission is granted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalType {
    /// Anyone holding the link.
    Anyone,
    /// A named user or group.
    User,
    /// Everyone in a domain.
    Domain,
}

/// Access level carried by a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Reader,
    Writer,
    Owner,
}

impl Role {
    /// Whether the role allows modifying content.
    pub fn can_edit(self) -> bool {
        matches!(self, Role::Writer | Role::Owner)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub principal_type: PrincipalType,
    pub role: Role,
}

impl Permission {
    pub fn new(principal_type: PrincipalType, role: Role) -> Self {
        Self { principal_type, role }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub display_name: String,
    pub email: Option<String>,
}

/* -------------------------------------------------------------------------- */
/* FileRecord */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    File,
    Folder,
}

/// A provider document or folder as seen in one fetch cycle.
///
/// Records are rebuilt from provider responses on every fetch and never
/// mutated afterwards; `id` is the only identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub kind: FileKind,
    pub mime_type: String,
    /// Folders and provider-native documents have no size.
    pub size_bytes: Option<u64>,
    pub modified_at: DateTime<Utc>,
    pub viewed_at: Option<DateTime<Utc>>,
    /// When the file was shared with the caller, for files they do not own.
    pub shared_at: Option<DateTime<Utc>>,
    /// First entry is the primary parent.
    pub parent_ids: Vec<String>,
    pub owners: Vec<Owner>,
    pub permissions: Vec<Permission>,
    pub shared: bool,
    /// Whether the connected account is among the owners.
    pub owned_by_me: bool,
    pub web_view_link: Option<String>,
}

impl FileRecord {
    /// Minimal record; the `with_*` builders fill in the rest.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: FileKind,
        mime_type: impl Into<String>,
        modified_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            mime_type: mime_type.into(),
            size_bytes: None,
            modified_at,
            viewed_at: None,
            shared_at: None,
            parent_ids: Vec::new(),
            owners: Vec::new(),
            permissions: Vec::new(),
            shared: false,
            owned_by_me: false,
            web_view_link: None,
        }
    }

    pub fn with_size(mut self, bytes: u64) -> Self {
        self.size_bytes = Some(bytes);
        self
    }

    pub fn with_viewed_at(mut self, at: DateTime<Utc>) -> Self {
        self.viewed_at = Some(at);
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_ids.push(parent_id.into());
        self
    }

    pub fn with_permission(mut self, principal_type: PrincipalType, role: Role) -> Self {
        self.permissions.push(Permission::new(principal_type, role));
        self
    }

    /// Mark the record as owned by the caller and shared with others.
    pub fn owned_and_shared(mut self) -> Self {
        self.owned_by_me = true;
        self.shared = true;
        self
    }

    pub fn is_folder(&self) -> bool {
        self.kind == FileKind::Folder
    }

    pub fn primary_parent(&self) -> Option<&str> {
        self.parent_ids.first().map(String::as_str)
    }

    /// Most recent access we know about: the caller's view time, falling back
    /// to the modification time.
    pub fn last_accessed_at(&self) -> DateTime<Utc> {
        self.viewed_at.unwrap_or(self.modified_at)
    }

    pub fn type_label(&self) -> FileTypeLabel {
        FileTypeLabel::classify(self.kind, &self.mime_type)
    }

    pub fn has_public_permission(&self) -> bool {
        self.permissions.iter().any(|p| p.principal_type == PrincipalType::Anyone)
    }
}
