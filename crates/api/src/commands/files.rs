//! File listing commands

use std::time::Instant;

use docpulse_core::AggregatedFiles;
use docpulse_domain::{CanonicalActivity, FileQuery, Page, Result};
use tracing::info;

use crate::utils::logging::log_result;
use crate::AppContext;

/// One connection's files for the requested view.
pub async fn list_files(
    ctx: &AppContext,
    connection_id: &str,
    query: &FileQuery,
) -> Result<Page<CanonicalActivity>> {
    let command_name = "files::list_files";
    let start = Instant::now();

    let result = ctx.activity.files(connection_id, query).await;

    log_result(command_name, start.elapsed(), result)
}

/// Files across every linked connection, deduplicated by file id.
pub async fn recent_across(ctx: &AppContext, query: &FileQuery) -> Result<AggregatedFiles> {
    let command_name = "files::recent_across";
    let start = Instant::now();
    let connection_ids = ctx.connection_ids();

    info!(command = command_name, connections = connection_ids.len(), view = ?query.view, "aggregating files");

    let result = ctx.activity.recent_across(&connection_ids, query).await;

    log_result(command_name, start.elapsed(), result)
}
