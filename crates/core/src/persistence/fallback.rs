//! Local durable fallback layout on top of a [`KeyValueStore`]
//!
//! Two kinds of entries live under the configured namespace:
//! - `<ns>-failed-saves`: append-only JSON list of [`FailedSave`] records
//!   waiting for recovery
//! - `<ns>-module-<moduleId>-<reportId>`: last successfully saved copy of a
//!   module as [`CachedModule`]

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use vsme_domain::constants::{FAILED_SAVES_SUFFIX, MODULE_CACHE_SEGMENT};
use vsme_domain::{queue_key, CachedModule, FailedSave, Result, VsmeError};

use super::ports::KeyValueStore;

/// Failed-save list and module cache kept on this device
#[derive(Clone)]
pub struct LocalFallbackStore {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
}

impl LocalFallbackStore {
    /// Keep entries in `store` under keys prefixed with `namespace`
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self { store, namespace: namespace.into() }
    }

    /// Key of the failed-save list
    pub fn failed_saves_key(&self) -> String {
        format!("{}-{FAILED_SAVES_SUFFIX}", self.namespace)
    }

    /// Key of a module's cached copy
    pub fn module_key(&self, module_id: &str, report_id: &str) -> String {
        format!("{}-{MODULE_CACHE_SEGMENT}-{module_id}-{report_id}", self.namespace)
    }

    /// Append a save that exhausted its retries
    pub async fn append_failed_save(&self, failed: FailedSave) -> Result<()> {
        let mut entries = self.failed_saves().await?;
        debug!(key = %failed.key, queued = entries.len() + 1, "appending failed save");
        entries.push(failed);
        self.write_json(&self.failed_saves_key(), &entries).await
    }

    /// Every failed save, oldest first
    pub async fn failed_saves(&self) -> Result<Vec<FailedSave>> {
        Ok(self.read_json(&self.failed_saves_key()).await?.unwrap_or_default())
    }

    /// Newest failed save for a module of a report
    pub async fn latest_failed_save(
        &self,
        module_id: &str,
        report_id: &str,
    ) -> Result<Option<FailedSave>> {
        let key = queue_key(module_id, report_id);
        Ok(self
            .failed_saves()
            .await?
            .into_iter()
            .filter(|entry| entry.key == key)
            .max_by_key(|entry| entry.failed_at))
    }

    /// Drop the given entries from the failed-save list, leaving anything
    /// appended in the meantime untouched
    pub async fn remove_failed_saves(&self, recovered: &[FailedSave]) -> Result<()> {
        if recovered.is_empty() {
            return Ok(());
        }
        let remaining: Vec<FailedSave> = self
            .failed_saves()
            .await?
            .into_iter()
            .filter(|entry| !recovered.contains(entry))
            .collect();
        if remaining.is_empty() {
            self.store.remove(&self.failed_saves_key()).await
        } else {
            self.write_json(&self.failed_saves_key(), &remaining).await
        }
    }

    /// Refresh a module's cached copy
    pub async fn cache_module(&self, module_id: &str, report_id: &str, data: &Value) -> Result<()> {
        let cached = CachedModule { data: data.clone(), saved_at: Utc::now() };
        self.write_json(&self.module_key(module_id, report_id), &cached).await
    }

    /// Last successfully saved copy of a module, if any
    pub async fn cached_module(&self, module_id: &str, report_id: &str) -> Result<Option<CachedModule>> {
        self.read_json(&self.module_key(module_id, report_id)).await
    }

    /// Keys of every cached module copy, sorted
    pub async fn cached_module_keys(&self) -> Result<Vec<String>> {
        let prefix = format!("{}-{MODULE_CACHE_SEGMENT}-", self.namespace);
        let mut keys = self.store.keys_with_prefix(&prefix).await?;
        keys.sort();
        Ok(keys)
    }

    /// Newest local copy of a module: the cached copy or the latest failed
    /// save, whichever was written last
    pub async fn local_copy(&self, module_id: &str, report_id: &str) -> Result<Option<Value>> {
        let cached = self.cached_module(module_id, report_id).await?;
        let failed = self.latest_failed_save(module_id, report_id).await?;

        Ok(match (cached, failed) {
            (Some(cached), Some(failed)) if failed.failed_at > cached.saved_at => Some(failed.data),
            (Some(cached), _) => Some(cached.data),
            (None, Some(failed)) => Some(failed.data),
            (None, None) => None,
        })
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key).await? {
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
                VsmeError::Storage(format!("Corrupt local entry {key}: {e}"))
            }),
            None => Ok(None),
        }
    }

    async fn write_json<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)
            .map_err(|e| VsmeError::Internal(format!("Failed to encode {key}: {e}")))?;
        self.store.set(key, &raw).await
    }
}
