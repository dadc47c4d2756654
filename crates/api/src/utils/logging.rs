use std::time::Duration;

use docpulse_domain::DocPulseError;
use tracing::{info, warn};

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"files::list_files"`).
/// * `elapsed` - Duration the command execution took.
/// * `error` - The failure, if the command did not complete.
///
/// Callers must avoid forwarding tokens or file names in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&DocPulseError>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(error) => warn!(
            command,
            duration_ms,
            error_type = error.label(),
            error = %error,
            "command_execution_failure"
        ),
    }
}

/// Log and pass through a command result.
#[inline]
pub fn log_result<T>(
    command: &str,
    elapsed: Duration,
    result: docpulse_domain::Result<T>,
) -> docpulse_domain::Result<T> {
    log_command_execution(command, elapsed, result.as_ref().err());
    result
}
