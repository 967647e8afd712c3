//! Port interfaces for module persistence
//!
//! These traits define the boundaries between the save orchestration logic
//! and the remote Report Data Store or local durable storage.

use async_trait::async_trait;
use serde_json::Value;
use vsme_domain::{CompletionStatus, Result, StoreResponse};

/// Remote document store that owns report and module data
#[async_trait]
pub trait ReportDataStore: Send + Sync {
    /// Persist a module's data. The response data may carry an `auditId`.
    async fn update_module_data(
        &self,
        report_id: &str,
        module_id: &str,
        data: &Value,
    ) -> Result<StoreResponse<Value>>;

    /// Fetch a module's current data
    async fn get_module_data(&self, report_id: &str, module_id: &str)
        -> Result<StoreResponse<Value>>;

    /// Fetch the authoritative completion status of a module
    async fn get_module_status(
        &self,
        report_id: &str,
        module_id: &str,
    ) -> Result<StoreResponse<CompletionStatus>>;
}

/// Durable string key-value storage on the local device
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Stored value, or `None` when the key is absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete; absent keys are not an error
    async fn remove(&self, key: &str) -> Result<()>;

    /// All keys starting with `prefix`, sorted
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}
