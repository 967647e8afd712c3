use std::time::Duration;

use tracing::{info, warn};
use vsme_domain::VsmeError;

/// Log the outcome of a command execution with structured fields.
///
/// `command` is a stable identifier such as `"modules::save_module_data"`.
/// Callers must not put report contents or tokens into it.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Stable label for an error kind, suitable for log fields
#[inline]
pub fn error_label(error: &VsmeError) -> &'static str {
    match error {
        VsmeError::NotFound(_) => "not_found",
        VsmeError::Validation(_) => "validation",
        VsmeError::Calculation(_) => "calculation",
        VsmeError::SaveFailure(_) => "save_failure",
        VsmeError::Storage(_) => "storage",
        VsmeError::Network(_) => "network",
        VsmeError::Config(_) => "config",
        VsmeError::InvalidInput(_) => "invalid_input",
        VsmeError::Internal(_) => "internal",
    }
}
