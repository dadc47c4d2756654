//! Port interface for the cloud-drive provider
//!
//! Implementations normalize every provider payload into [`FileRecord`] and
//! [`ActivityEvent`] before returning; nothing downstream inspects raw
//! provider shapes.

use std::collections::HashMap;

use async_trait::async_trait;
use docpulse_domain::{ActivityEvent, ActivityQuery, FileRecord, ListingQuery, Result};

/// Read access to one provider account, authorized by an access token.
#[async_trait]
pub trait DriveSource: Send + Sync {
    /// Query the activity log for events newer than `query.since`.
    async fn query_activity(
        &self,
        access_token: &str,
        query: &ActivityQuery,
    ) -> Result<Vec<ActivityEvent>>;

    /// List file metadata matching the query, following pagination up to
    /// `query.max_results`.
    async fn list_files(&self, access_token: &str, query: &ListingQuery) -> Result<Vec<FileRecord>>;

    /// Point lookup of one file. `Ok(None)` when the file no longer exists.
    async fn get_file(&self, access_token: &str, file_id: &str) -> Result<Option<FileRecord>>;

    /// Folders whose name exactly matches one of `names`.
    async fn find_folders_by_name(
        &self,
        access_token: &str,
        names: &[String],
    ) -> Result<Vec<FileRecord>>;

    /// Display names for principal IDs. Callers pass at most
    /// [`docpulse_domain::constants::PRINCIPAL_BATCH_SIZE`] IDs per call;
    /// unknown IDs are simply absent from the map.
    async fn resolve_principals(
        &self,
        access_token: &str,
        principal_ids: &[String],
    ) -> Result<HashMap<String, String>>;
}
