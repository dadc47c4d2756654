//! Storage quota commands

use std::time::Instant;

use docpulse_core::{ConnectionFailure, QuotaSelection};
use docpulse_domain::{AccountQuota, QuotaSummary, Result};
use serde::Serialize;
use tracing::warn;

use crate::utils::logging::{log_command_execution, log_result};
use crate::AppContext;

/// Outcome of refreshing every linked account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotaRefreshReport {
    pub refreshed: Vec<AccountQuota>,
    pub failed: Vec<ConnectionFailure>,
}

/// Refresh usage for every linked connection.
///
/// Failures are collected per connection; a single account never blocks the
/// others.
pub async fn refresh_quotas(ctx: &AppContext) -> QuotaRefreshReport {
    let command_name = "quota::refresh_quotas";
    let start = Instant::now();

    let mut report = QuotaRefreshReport { refreshed: Vec::new(), failed: Vec::new() };
    for connection_id in ctx.connection_ids() {
        match ctx.quota.refresh(&connection_id).await {
            Ok(quota) => report.refreshed.push(quota),
            Err(error) => {
                warn!(connection_id = %connection_id, error = %error, "quota refresh failed");
                report.failed.push(ConnectionFailure { connection_id, error });
            }
        }
    }

    log_command_execution(command_name, start.elapsed(), report.failed.first().map(|f| &f.error));
    report
}

/// Aggregate stored usage over `accounts`, or over every known account when
/// none are named.
pub async fn quota_summary(ctx: &AppContext, accounts: &[String]) -> Result<QuotaSummary> {
    let start = Instant::now();

    let result = async {
        let selection = if accounts.is_empty() {
            ctx.quota.default_selection().await?
        } else {
            QuotaSelection::new(accounts.iter().cloned())
        };
        ctx.quota.summary(&selection).await
    }
    .await;

    log_result("quota::quota_summary", start.elapsed(), result)
}
