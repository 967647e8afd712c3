//! Module data commands: save, load, validate and completion

use serde_json::Value;
use tracing::info;
use vsme_domain::{CompletionStatus, ModuleData, PendingSave, SaveResult, ValidationResult};

use crate::context::AppContext;
use crate::utils::command_helpers::{execute_command, execute_infallible};

/// Save a module's form data. Never blocks on retries; the returned status
/// says whether the data landed, is waiting for a retry or was kept locally.
pub async fn save_module_data(
    ctx: &AppContext,
    module_id: &str,
    report_id: &str,
    data: Value,
) -> Result<SaveResult, String> {
    let result = execute_infallible("modules::save_module_data", || {
        ctx.modules.save_module_data(module_id, report_id, data)
    })
    .await;
    info!(module_id, report_id, status = ?result.status, "module save handled");
    Ok(result)
}

/// Remote copy, or the newest local copy when the store is unreachable
pub async fn load_module_data(
    ctx: &AppContext,
    module_id: &str,
    report_id: &str,
) -> Result<Value, String> {
    execute_command("modules::load_module_data", || {
        ctx.modules.load_module_data(module_id, report_id)
    })
    .await
}

/// Loaded data together with its completion and validation state
pub async fn load_module(
    ctx: &AppContext,
    module_id: &str,
    report_id: &str,
) -> Result<ModuleData, String> {
    execute_command("modules::load_module", || ctx.modules.load_module(module_id, report_id)).await
}

/// Run the module's validation rules without saving
pub async fn validate_module_data(
    ctx: &AppContext,
    module_id: &str,
    data: Value,
) -> Result<ValidationResult, String> {
    Ok(execute_infallible("modules::validate_module_data", || async {
        ctx.modules.validate_module_data(module_id, &data)
    })
    .await)
}

/// Completion as reported by the store, computed locally as a fallback
pub async fn get_module_completion_status(
    ctx: &AppContext,
    module_id: &str,
    report_id: &str,
) -> Result<CompletionStatus, String> {
    Ok(execute_infallible("modules::get_module_completion_status", || {
        ctx.modules.get_module_completion_status(module_id, report_id)
    })
    .await)
}

pub async fn get_pending_saves(ctx: &AppContext) -> Result<Vec<PendingSave>, String> {
    Ok(ctx.modules.get_pending_saves())
}

/// Resolve every queued save before shutdown
pub async fn flush_pending_saves(ctx: &AppContext) -> Result<Vec<SaveResult>, String> {
    Ok(execute_infallible("modules::flush_pending_saves", || ctx.modules.flush_pending_saves())
        .await)
}

/// Replay saves that were kept locally after exhausting their retries
pub async fn recover_failed_saves(ctx: &AppContext) -> Result<Vec<SaveResult>, String> {
    execute_command("modules::recover_failed_saves", || ctx.modules.recover_failed_saves()).await
}
