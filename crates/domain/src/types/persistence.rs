//! Save/retry bookkeeping shared between the orchestrator, the Report Data
//! Store adapter and local fallback storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::impl_domain_status_conversions;

/// Composite key identifying a module of a report: `<moduleId>-<reportId>`
pub fn queue_key(module_id: &str, report_id: &str) -> String {
    format!("{module_id}-{report_id}")
}

/// A module payload waiting to be persisted remotely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAttempt {
    pub module_id: String,
    pub report_id: String,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
    pub retry_count: u32,
    /// Monotonic per-key stamp; bumped by every new save for the key
    pub generation: u64,
}

impl SaveAttempt {
    /// Queue key of this attempt
    pub fn key(&self) -> String {
        queue_key(&self.module_id, &self.report_id)
    }
}

/// A save that exhausted its retries, kept locally for later recovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct FailedSave {
    pub key: String,
    pub module_id: String,
    pub report_id: String,
    pub data: Value,
    pub failed_at: DateTime<Utc>,
}

/// Locally cached copy of a module's data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CachedModule {
    pub data: Value,
    pub saved_at: DateTime<Utc>,
}

/// Where a save ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    /// Persisted by the Report Data Store
    Saved,
    /// Remote save failed; a retry runs in the background
    RetryScheduled,
    /// Retries exhausted; payload kept in local fallback storage
    StoredLocally,
    /// A newer save for the same module replaced this one
    Superseded,
    /// Neither the remote store nor local storage accepted the payload
    Failed,
}

impl_domain_status_conversions!(SaveStatus {
    Saved => "saved",
    RetryScheduled => "retry_scheduled",
    StoredLocally => "stored_locally",
    Superseded => "superseded",
    Failed => "failed",
});

/// Result handed back to the UI for every save call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SaveResult {
    pub success: bool,
    pub status: SaveStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_id: Option<String>,
}

impl SaveResult {
    /// Successful remote save
    pub fn saved(data: Value, audit_id: Option<String>) -> Self {
        Self {
            success: true,
            status: SaveStatus::Saved,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
            audit_id,
        }
    }

    /// Failed attempt with a retry pending
    pub fn retrying(message: impl Into<String>) -> Self {
        Self::unsuccessful(SaveStatus::RetryScheduled, message.into())
    }

    /// Terminal failure; the payload is durably queued locally
    pub fn stored_locally(message: impl Into<String>) -> Self {
        Self::unsuccessful(SaveStatus::StoredLocally, message.into())
    }

    fn unsuccessful(status: SaveStatus, message: String) -> Self {
        Self {
            success: false,
            status,
            data: None,
            error: Some(message),
            timestamp: Utc::now(),
            audit_id: None,
        }
    }

    /// The attempt was replaced by a newer save for the same key
    pub fn superseded() -> Self {
        Self::unsuccessful(SaveStatus::Superseded, "Superseded by a newer save".to_string())
    }

    /// The payload could not be stored anywhere
    pub fn failed(message: impl Into<String>) -> Self {
        Self::unsuccessful(SaveStatus::Failed, message.into())
    }
}

/// Diagnostic view of a queued save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct PendingSave {
    pub key: String,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
}

/// Envelope returned by the Report Data Store: `{ status, data }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreResponse<T> {
    pub status: String,
    pub data: T,
}

impl<T> StoreResponse<T> {
    /// Whether the store reported success
    pub fn is_success(&self) -> bool {
        matches!(self.status.to_ascii_lowercase().as_str(), "success" | "ok")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn queue_key_is_module_then_report() {
        assert_eq!(queue_key("b3", "r-42"), "b3-r-42");
    }

    #[test]
    fn save_result_serializes_for_ui() {
        let result = SaveResult::saved(json!({ "a": 1 }), Some("audit-1".into()));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["status"], "saved");
        assert_eq!(json["auditId"], "audit-1");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn store_response_status_check() {
        let ok: StoreResponse<Value> =
            serde_json::from_value(json!({ "status": "success", "data": {} })).unwrap();
        assert!(ok.is_success());
        let failed: StoreResponse<Value> =
            serde_json::from_value(json!({ "status": "error", "data": null })).unwrap();
        assert!(!failed.is_success());
    }
}
