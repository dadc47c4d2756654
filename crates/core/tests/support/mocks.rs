//! In-memory port implementations.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use docpulse_core::{
    CredentialStore, DriveSource, IgnorePatternSource, QuotaSource, QuotaStore, QuotaUsage,
    TokenRefresher,
};
use docpulse_domain::{
    AccountQuota, ActivityEvent, ActivityQuery, CredentialState, DocPulseError, FileRecord,
    ListingQuery, RefreshFailure, RefreshedToken, Result,
};

/* -------------------------------------------------------------------------- */
/* Credentials */
/* -------------------------------------------------------------------------- */

#[derive(Default)]
pub struct InMemoryCredentialStore {
    states: Mutex<HashMap<String, CredentialState>>,
    saves: AtomicUsize,
    failing_saves: AtomicUsize,
}

impl InMemoryCredentialStore {
    pub fn with(states: impl IntoIterator<Item = CredentialState>) -> Self {
        let store = Self::default();
        {
            let mut map = store.states.lock().unwrap();
            for state in states {
                map.insert(state.connection_id.clone(), state);
            }
        }
        store
    }

    /// Reject the next `count` saves with a storage error.
    pub fn failing_saves(self, count: usize) -> Self {
        self.failing_saves.store(count, Ordering::SeqCst);
        self
    }

    pub fn get(&self, connection_id: &str) -> Option<CredentialState> {
        self.states.lock().unwrap().get(connection_id).cloned()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self, connection_id: &str) -> Result<Option<CredentialState>> {
        Ok(self.get(connection_id))
    }

    async fn save(&self, state: &CredentialState) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let rejected =
            self.failing_saves.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if rejected.is_ok() {
            return Err(DocPulseError::Storage("credential store unavailable".into()));
        }
        self.states.lock().unwrap().insert(state.connection_id.clone(), state.clone());
        Ok(())
    }
}

/// Replays queued refresh outcomes; an empty queue succeeds with a
/// numbered token.
#[derive(Default)]
pub struct ScriptedRefresher {
    script: Mutex<VecDeque<std::result::Result<RefreshedToken, RefreshFailure>>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedRefresher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, outcome: std::result::Result<RefreshedToken, RefreshFailure>) -> Self {
        self.script.lock().unwrap().push_back(outcome);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenRefresher for ScriptedRefresher {
    async fn refresh(
        &self,
        _refresh_token: &str,
    ) -> std::result::Result<RefreshedToken, RefreshFailure> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(RefreshedToken {
                access_token: format!("refreshed-{call}"),
                expires_in_secs: 3600,
                refresh_token: None,
            })
        })
    }
}

/* -------------------------------------------------------------------------- */
/* Drive */
/* -------------------------------------------------------------------------- */

/// Canned provider responses. Each source can be switched to fail.
#[derive(Default)]
pub struct MockDriveSource {
    pub events: Vec<ActivityEvent>,
    pub listing: Vec<FileRecord>,
    /// Point-lookup table for backfill.
    pub files: HashMap<String, FileRecord>,
    pub folders: Vec<FileRecord>,
    pub principals: HashMap<String, String>,
    pub fail_activity: bool,
    pub fail_listing: bool,
    pub fail_folders: bool,
    pub fail_principals: bool,
    pub listing_delay: Option<Duration>,
    pub lookups: AtomicUsize,
    pub folder_lookups: AtomicUsize,
    pub listing_queries: Mutex<Vec<ListingQuery>>,
}

impl MockDriveSource {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn folder_lookups(&self) -> usize {
        self.folder_lookups.load(Ordering::SeqCst)
    }
}

fn unavailable(source: &str) -> DocPulseError {
    DocPulseError::Network(format!("{source} unavailable"))
}

#[async_trait]
impl DriveSource for MockDriveSource {
    async fn query_activity(
        &self,
        _access_token: &str,
        query: &ActivityQuery,
    ) -> Result<Vec<ActivityEvent>> {
        if self.fail_activity {
            return Err(unavailable("activity"));
        }
        Ok(self.events.iter().filter(|event| event.occurred_at >= query.since).cloned().collect())
    }

    async fn list_files(&self, _access_token: &str, query: &ListingQuery) -> Result<Vec<FileRecord>> {
        self.listing_queries.lock().unwrap().push(query.clone());
        if let Some(delay) = self.listing_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_listing {
            return Err(unavailable("listing"));
        }
        Ok(self
            .listing
            .iter()
            .filter(|file| query.owned_by_me.map_or(true, |owned| file.owned_by_me == owned))
            .filter(|file| query.include_folders || !file.is_folder())
            .cloned()
            .collect())
    }

    async fn get_file(&self, _access_token: &str, file_id: &str) -> Result<Option<FileRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.files.get(file_id).cloned())
    }

    async fn find_folders_by_name(
        &self,
        _access_token: &str,
        names: &[String],
    ) -> Result<Vec<FileRecord>> {
        self.folder_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_folders {
            return Err(unavailable("folder search"));
        }
        Ok(self.folders.iter().filter(|folder| names.contains(&folder.name)).cloned().collect())
    }

    async fn resolve_principals(
        &self,
        _access_token: &str,
        principal_ids: &[String],
    ) -> Result<HashMap<String, String>> {
        if self.fail_principals {
            return Err(unavailable("people"));
        }
        Ok(principal_ids
            .iter()
            .filter_map(|id| self.principals.get(id).map(|name| (id.clone(), name.clone())))
            .collect())
    }
}

/* -------------------------------------------------------------------------- */
/* Ignore patterns and quota */
/* -------------------------------------------------------------------------- */

pub struct StaticPatterns(pub Vec<String>);

#[async_trait]
impl IgnorePatternSource for StaticPatterns {
    async fn patterns(&self, _connection_id: &str) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

#[derive(Default)]
pub struct MemoryQuotaStore {
    quotas: Mutex<Vec<AccountQuota>>,
}

#[async_trait]
impl QuotaStore for MemoryQuotaStore {
    async fn load_all(&self) -> Result<Vec<AccountQuota>> {
        Ok(self.quotas.lock().unwrap().clone())
    }

    async fn save(&self, quota: &AccountQuota) -> Result<()> {
        let mut quotas = self.quotas.lock().unwrap();
        quotas.retain(|existing| existing.account_id != quota.account_id);
        quotas.push(quota.clone());
        Ok(())
    }
}

pub struct FixedQuota(pub QuotaUsage);

#[async_trait]
impl QuotaSource for FixedQuota {
    async fn fetch_usage(&self, _access_token: &str) -> Result<QuotaUsage> {
        Ok(self.0.clone())
    }
}
