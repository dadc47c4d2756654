//! Actor display names for chosen events.

use std::collections::{BTreeSet, HashMap};

use docpulse_domain::constants::PRINCIPAL_BATCH_SIZE;
use docpulse_domain::CanonicalActivity;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::fetch::ports::DriveSource;

/// Fill `actor_name` from the principal endpoint in batches. A failed batch
/// leaves its names empty.
pub async fn hydrate_actors(
    drive: &dyn DriveSource,
    access_token: &str,
    records: &mut [CanonicalActivity],
) {
    let ids: Vec<String> = records
        .iter()
        .filter_map(|record| record.actor_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if ids.is_empty() {
        return;
    }

    let batches = join_all(
        ids.chunks(PRINCIPAL_BATCH_SIZE)
            .map(|batch| drive.resolve_principals(access_token, batch)),
    )
    .await;

    let mut names = HashMap::new();
    for result in batches {
        match result {
            Ok(resolved) => names.extend(resolved),
            Err(err) => warn!(error = %err, "principal lookup failed; leaving names empty"),
        }
    }
    debug!(requested = ids.len(), resolved = names.len(), "actors hydrated");

    for record in records.iter_mut() {
        if let Some(actor_id) = &record.actor_id {
            record.actor_name = names.get(actor_id).cloned();
        }
    }
}
