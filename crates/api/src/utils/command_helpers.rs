//! Command execution helpers
//!
//! Every command is timed and logged the same way; these wrappers keep the
//! command bodies down to their actual logic.

use std::future::Future;
use std::time::Instant;

use tracing::debug;
use vsme_domain::Result as DomainResult;

use crate::utils::logging::{error_label, log_command_execution};

/// Execute a command with timing and structured logging
///
/// # Example
///
/// ```rust,ignore
/// pub async fn load_module_data(ctx: &AppContext, module_id: &str, report_id: &str)
///     -> Result<Value, String>
/// {
///     execute_command("modules::load_module_data", || async {
///         ctx.modules.load_module_data(module_id, report_id).await
///     })
///     .await
/// }
/// ```
pub async fn execute_command<F, Fut, T>(command_name: &str, command_fn: F) -> Result<T, String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();
    let result = command_fn().await;

    log_command_execution(command_name, start.elapsed(), result.is_ok());
    if let Err(err) = &result {
        debug!(command = command_name, error_type = error_label(err), "command error");
    }

    result.map_err(|e| e.to_string())
}

/// Like [`execute_command`] for operations that cannot fail
pub async fn execute_infallible<F, Fut, T>(command_name: &str, command_fn: F) -> T
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    let start = Instant::now();
    let value = command_fn().await;
    log_command_execution(command_name, start.elapsed(), true);
    value
}

#[cfg(test)]
mod tests {
    use vsme_domain::VsmeError;

    use super::*;

    #[tokio::test]
    async fn errors_are_rendered_to_strings() {
        let result: Result<(), String> = execute_command("test::fails", || async {
            Err(VsmeError::NotFound("factor".into()))
        })
        .await;
        assert_eq!(result.unwrap_err(), "Not found: factor");
    }

    #[tokio::test]
    async fn values_pass_through() {
        let value = execute_command("test::ok", || async { Ok(42) }).await;
        assert_eq!(value, Ok(42));
        assert_eq!(execute_infallible("test::infallible", || async { "done" }).await, "done");
    }
}
