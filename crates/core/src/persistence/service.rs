//! UI-facing module data operations

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{instrument, warn};
use vsme_domain::{
    CompletionStatus, ModuleData, PendingSave, Result, SaveResult, ValidationResult, VsmeError,
};

use super::fallback::LocalFallbackStore;
use super::orchestrator::SaveOrchestrator;
use super::ports::ReportDataStore;
use crate::completion::completion_status;
use crate::validation::validate_module;

/// Module data service - save, load, validate and track completion
#[derive(Clone)]
pub struct ModuleDataService {
    store: Arc<dyn ReportDataStore>,
    fallback: LocalFallbackStore,
    orchestrator: SaveOrchestrator,
}

impl ModuleDataService {
    /// Facade over the store, the local fallback and the save queue
    pub fn new(
        store: Arc<dyn ReportDataStore>,
        fallback: LocalFallbackStore,
        orchestrator: SaveOrchestrator,
    ) -> Self {
        Self { store, fallback, orchestrator }
    }

    /// Local storage shared with the orchestrator
    pub fn fallback(&self) -> &LocalFallbackStore {
        &self.fallback
    }

    /// Save with retry; never blocks on retries
    pub async fn save_module_data(&self, module_id: &str, report_id: &str, data: Value) -> SaveResult {
        self.orchestrator.save_module_data(module_id, report_id, data).await
    }

    /// Remote data first, the newest local copy second, else the remote error
    #[instrument(skip(self))]
    pub async fn load_module_data(&self, module_id: &str, report_id: &str) -> Result<Value> {
        let remote_err = match self.store.get_module_data(report_id, module_id).await {
            Ok(response) if response.is_success() => return Ok(response.data),
            Ok(response) => VsmeError::Network(format!(
                "Report data store answered with status '{}'",
                response.status
            )),
            Err(err) => err,
        };

        warn!(error = %remote_err, "remote load failed, trying local copy");
        match self.fallback.local_copy(module_id, report_id).await {
            Ok(Some(data)) => Ok(data),
            Ok(None) => Err(remote_err),
            Err(local_err) => {
                warn!(error = %local_err, "local copy unreadable");
                Err(remote_err)
            }
        }
    }

    /// Pure per-module validation
    pub fn validate_module_data(&self, module_id: &str, data: &Value) -> ValidationResult {
        validate_module(module_id, data)
    }

    /// Backend status when reachable, otherwise a local approximation
    #[instrument(skip(self))]
    pub async fn get_module_completion_status(
        &self,
        module_id: &str,
        report_id: &str,
    ) -> CompletionStatus {
        match self.store.get_module_status(report_id, module_id).await {
            Ok(response) if response.is_success() => return response.data,
            Ok(response) => warn!(status = %response.status, "status request rejected"),
            Err(err) => warn!(error = %err, "status request failed, computing locally"),
        }

        let data = self.load_module_data(module_id, report_id).await.unwrap_or_else(|_| json!({}));
        completion_status(module_id, &data)
    }

    /// Loaded data together with local completion and validation state
    pub async fn load_module(&self, module_id: &str, report_id: &str) -> Result<ModuleData> {
        let data = self.load_module_data(module_id, report_id).await?;
        let completion = completion_status(module_id, &data);
        let validation = validate_module(module_id, &data);
        Ok(ModuleData {
            report_id: report_id.to_string(),
            module_id: module_id.to_string(),
            data,
            completion_percentage: completion.completion_percentage,
            validation_status: validation.status(),
            last_updated: Utc::now(),
        })
    }

    pub fn get_pending_saves(&self) -> Vec<PendingSave> {
        self.orchestrator.get_pending_saves()
    }

    pub async fn flush_pending_saves(&self) -> Vec<SaveResult> {
        self.orchestrator.flush_pending_saves().await
    }

    /// See [`SaveOrchestrator::recover_failed_saves`]
    pub async fn recover_failed_saves(&self) -> Result<Vec<SaveResult>> {
        self.orchestrator.recover_failed_saves().await
    }
}
