//! Dashboard commands

use std::time::Instant;

use docpulse_domain::{DuplicateGroup, Result, SummaryMetrics};

use crate::utils::logging::log_result;
use crate::AppContext;

pub async fn summary(ctx: &AppContext, connection_id: &str) -> Result<SummaryMetrics> {
    let start = Instant::now();
    let result = ctx.activity.summary(connection_id).await;
    log_result("insights::summary", start.elapsed(), result)
}

pub async fn duplicates(ctx: &AppContext, connection_id: &str) -> Result<Vec<DuplicateGroup>> {
    let start = Instant::now();
    let result = ctx.activity.duplicates(connection_id).await;
    log_result("insights::duplicates", start.elapsed(), result)
}
