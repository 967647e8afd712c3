//! Save orchestration with retry and local fallback
//!
//! Every `(moduleId, reportId)` key has at most one queued [`SaveAttempt`].
//! A save is tried immediately; on a retryable failure the next attempt is
//! handed to a [`TaskScheduler`] with exponential backoff and the caller gets
//! a "retrying" result right away. When the policy runs out of retries the
//! payload is appended to the local fallback list and the queue entry is
//! cleared.
//!
//! A newer save for a key bumps the key's generation and cancels the
//! previous chain's scheduled retry. A retry that fires anyway compares
//! generations and does nothing when it is stale, so older data can never
//! overwrite newer data.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use vsme_common::{RetryPolicy, ScheduledTask, TaskScheduler};
use vsme_domain::{
    queue_key, FailedSave, PendingSave, Result, SaveAttempt, SaveResult, VsmeError,
};

use super::fallback::LocalFallbackStore;
use super::ports::ReportDataStore;

struct QueueEntry {
    attempt: SaveAttempt,
    retry: Option<ScheduledTask>,
}

struct Inner {
    store: Arc<dyn ReportDataStore>,
    fallback: LocalFallbackStore,
    scheduler: Arc<dyn TaskScheduler>,
    policy: RetryPolicy,
    queue: Mutex<HashMap<String, QueueEntry>>,
    generation: AtomicU64,
}

/// Owns the in-memory save queue. Cheap to clone; clones share the queue.
#[derive(Clone)]
pub struct SaveOrchestrator {
    inner: Arc<Inner>,
}

impl SaveOrchestrator {
    /// Empty queue over the given store, fallback and scheduler
    pub fn new(
        store: Arc<dyn ReportDataStore>,
        fallback: LocalFallbackStore,
        scheduler: Arc<dyn TaskScheduler>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                fallback,
                scheduler,
                policy,
                queue: Mutex::new(HashMap::new()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Queue `data` and try to persist it right away.
    ///
    /// Any entry already queued for the key is replaced and its pending retry
    /// cancelled; the retry counter starts again from zero.
    #[instrument(skip(self, data))]
    pub async fn save_module_data(
        &self,
        module_id: &str,
        report_id: &str,
        data: Value,
    ) -> SaveResult {
        let attempt = SaveAttempt {
            module_id: module_id.to_string(),
            report_id: report_id.to_string(),
            data,
            timestamp: Utc::now(),
            retry_count: 0,
            generation: self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1,
        };

        let previous = self
            .inner
            .queue
            .lock()
            .insert(attempt.key(), QueueEntry { attempt: attempt.clone(), retry: None });
        if let Some(QueueEntry { retry: Some(task), .. }) = previous {
            debug!(key = %attempt.key(), "cancelling retry of superseded save");
            task.cancel();
        }

        self.inner.attempt(attempt).await
    }

    /// Snapshot of queued saves, sorted by key
    pub fn get_pending_saves(&self) -> Vec<PendingSave> {
        let mut pending: Vec<PendingSave> = self
            .inner
            .queue
            .lock()
            .iter()
            .map(|(key, entry)| PendingSave {
                key: key.clone(),
                data: entry.attempt.data.clone(),
                timestamp: entry.attempt.timestamp,
            })
            .collect();
        pending.sort_by(|a, b| a.key.cmp(&b.key));
        pending
    }

    /// Resolve every queued save now: one immediate attempt each, straight to
    /// the fallback list on failure. Scheduled retries are cancelled.
    #[instrument(skip(self))]
    pub async fn flush_pending_saves(&self) -> Vec<SaveResult> {
        let drained: Vec<QueueEntry> = {
            let mut queue = self.inner.queue.lock();
            let mut entries: Vec<QueueEntry> = queue.drain().map(|(_, entry)| entry).collect();
            entries.sort_by(|a, b| a.attempt.key().cmp(&b.attempt.key()));
            entries
        };
        info!(count = drained.len(), "flushing pending saves");

        let mut results = Vec::with_capacity(drained.len());
        for entry in drained {
            if let Some(task) = &entry.retry {
                task.cancel();
            }
            let attempt = entry.attempt;
            let result = match self.inner.push(&attempt).await {
                Ok(result) => result,
                Err(err) => self.inner.store_locally(&attempt, &err).await,
            };
            results.push(result);
        }
        results
    }

    /// Replay the local fallback list against the remote store.
    ///
    /// Only the newest failed save per key is sent; older ones for the same
    /// key are dropped once it lands. Keys with a save currently queued are
    /// left alone because the queued data is newer.
    #[instrument(skip(self))]
    pub async fn recover_failed_saves(&self) -> Result<Vec<SaveResult>> {
        let failed = self.inner.fallback.failed_saves().await?;
        if failed.is_empty() {
            return Ok(Vec::new());
        }

        let mut latest: HashMap<&str, &FailedSave> = HashMap::new();
        for entry in &failed {
            let newer = latest
                .get(entry.key.as_str())
                .map_or(true, |seen| entry.failed_at >= seen.failed_at);
            if newer {
                latest.insert(entry.key.as_str(), entry);
            }
        }
        let mut to_replay: Vec<&FailedSave> = latest.into_values().collect();
        to_replay.sort_by(|a, b| a.key.cmp(&b.key));

        let mut recovered: Vec<FailedSave> = Vec::new();
        let mut results = Vec::with_capacity(to_replay.len());
        for entry in to_replay {
            if self.inner.queue.lock().contains_key(&entry.key) {
                debug!(key = %entry.key, "skipping recovery, newer save queued");
                continue;
            }
            let attempt = SaveAttempt {
                module_id: entry.module_id.clone(),
                report_id: entry.report_id.clone(),
                data: entry.data.clone(),
                timestamp: entry.failed_at,
                retry_count: 0,
                generation: 0,
            };
            match self.inner.push(&attempt).await {
                Ok(result) => {
                    recovered.extend(failed.iter().filter(|f| f.key == entry.key).cloned());
                    results.push(result);
                }
                Err(err) => {
                    warn!(key = %entry.key, error = %err, "recovery attempt failed");
                    results.push(SaveResult::stored_locally(err.message()));
                }
            }
        }

        self.inner.fallback.remove_failed_saves(&recovered).await?;
        info!(
            recovered = recovered.len(),
            remaining = failed.len() - recovered.len(),
            "failed save recovery finished"
        );
        Ok(results)
    }
}

impl Inner {
    async fn attempt(self: &Arc<Self>, attempt: SaveAttempt) -> SaveResult {
        match self.push(&attempt).await {
            Ok(result) => {
                self.finish(&attempt);
                result
            }
            Err(err) if !self.is_current(&attempt) => {
                debug!(key = %attempt.key(), error = %err, "failure of superseded save ignored");
                SaveResult::superseded()
            }
            Err(err) if err.is_retryable() && self.policy.should_retry(attempt.retry_count) => {
                self.schedule_retry(attempt, &err)
            }
            Err(err) => {
                let result = self.store_locally(&attempt, &err).await;
                self.finish(&attempt);
                result
            }
        }
    }

    /// Send one attempt to the remote store and refresh the local copy
    async fn push(&self, attempt: &SaveAttempt) -> Result<SaveResult> {
        let response = self
            .store
            .update_module_data(&attempt.report_id, &attempt.module_id, &attempt.data)
            .await?;
        if !response.is_success() {
            return Err(VsmeError::SaveFailure(format!(
                "Report data store answered with status '{}'",
                response.status
            )));
        }

        if let Err(err) =
            self.fallback.cache_module(&attempt.module_id, &attempt.report_id, &attempt.data).await
        {
            warn!(key = %attempt.key(), error = %err, "failed to refresh local module copy");
        }

        let audit_id = response.data.get("auditId").and_then(Value::as_str).map(str::to_string);
        info!(
            module_id = %attempt.module_id,
            report_id = %attempt.report_id,
            retries = attempt.retry_count,
            "module data saved"
        );
        Ok(SaveResult::saved(response.data, audit_id))
    }

    fn schedule_retry(self: &Arc<Self>, attempt: SaveAttempt, err: &VsmeError) -> SaveResult {
        let delay = self.policy.backoff(attempt.retry_count);
        let next = SaveAttempt { retry_count: attempt.retry_count + 1, ..attempt };
        let key = next.key();
        let mut queue = self.queue.lock();
        let Some(entry) =
            queue.get_mut(&key).filter(|entry| entry.attempt.generation == next.generation)
        else {
            debug!(key = %key, "retry of superseded save not scheduled");
            return SaveResult::superseded();
        };

        // The retry checks the queue before anything else, so it waits for
        // this lock and always finds its own handle stored.
        let weak: Weak<Self> = Arc::downgrade(self);
        let queued = next.clone();
        let task = self.scheduler.schedule(
            delay,
            Box::pin(async move {
                if let Some(inner) = weak.upgrade() {
                    inner.run_retry(queued).await;
                }
            }),
        );
        warn!(
            module_id = %next.module_id,
            report_id = %next.report_id,
            attempt = next.retry_count,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "save failed, retry scheduled"
        );
        entry.attempt = next;
        entry.retry = Some(task);
        drop(queue);

        SaveResult::retrying(format!(
            "Save failed, retrying in {}s: {}",
            delay.as_secs_f64(),
            err.message()
        ))
    }

    async fn run_retry(self: Arc<Self>, attempt: SaveAttempt) {
        if !self.is_current(&attempt) {
            debug!(key = %attempt.key(), generation = attempt.generation, "stale retry skipped");
            return;
        }
        let result = self.attempt(attempt).await;
        debug!(status = %result.status, "retry finished");
    }

    /// Append the payload to the fallback list
    async fn store_locally(&self, attempt: &SaveAttempt, err: &VsmeError) -> SaveResult {
        let failed = FailedSave {
            key: attempt.key(),
            module_id: attempt.module_id.clone(),
            report_id: attempt.report_id.clone(),
            data: attempt.data.clone(),
            failed_at: Utc::now(),
        };
        match self.fallback.append_failed_save(failed).await {
            Ok(()) => {
                error!(
                    module_id = %attempt.module_id,
                    report_id = %attempt.report_id,
                    retries = attempt.retry_count,
                    error = %err,
                    "save stored in local fallback"
                );
                SaveResult::stored_locally(format!(
                    "Saved locally, sync pending: {}",
                    err.message()
                ))
            }
            Err(local_err) => {
                error!(
                    key = %attempt.key(),
                    error = %err,
                    local_error = %local_err,
                    "save failed and local fallback write failed"
                );
                SaveResult::failed(format!(
                    "{}; local fallback failed: {}",
                    err.message(),
                    local_err.message()
                ))
            }
        }
    }

    fn is_current(&self, attempt: &SaveAttempt) -> bool {
        self.queue
            .lock()
            .get(&attempt.key())
            .is_some_and(|entry| entry.attempt.generation == attempt.generation)
    }

    /// Clear the queue entry if it still belongs to this attempt's chain
    fn finish(&self, attempt: &SaveAttempt) {
        let key = queue_key(&attempt.module_id, &attempt.report_id);
        let mut queue = self.queue.lock();
        if queue.get(&key).is_some_and(|entry| entry.attempt.generation == attempt.generation) {
            queue.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;
    use vsme_common::testing::ManualScheduler;
    use vsme_domain::{CompletionStatus, SaveStatus, StoreResponse};

    use super::*;
    use crate::persistence::MemoryKeyValueStore;

    /// Store whose update outcomes are scripted; falls back to success
    #[derive(Default)]
    struct ScriptedStore {
        outcomes: Mutex<VecDeque<Result<()>>>,
        saved: Mutex<Vec<Value>>,
    }

    impl ScriptedStore {
        fn failing(times: usize) -> Self {
            let store = Self::default();
            for _ in 0..times {
                let err = VsmeError::Network("connection refused".into());
                store.outcomes.lock().push_back(Err(err));
            }
            store
        }
    }

    #[async_trait]
    impl ReportDataStore for ScriptedStore {
        async fn update_module_data(
            &self,
            _report_id: &str,
            _module_id: &str,
            data: &Value,
        ) -> Result<StoreResponse<Value>> {
            let outcome = self.outcomes.lock().pop_front().unwrap_or(Ok(()));
            outcome?;
            self.saved.lock().push(data.clone());
            Ok(StoreResponse {
                status: "success".into(),
                data: json!({ "auditId": "audit-1", "data": data }),
            })
        }

        async fn get_module_data(
            &self,
            _report_id: &str,
            _module_id: &str,
        ) -> Result<StoreResponse<Value>> {
            Err(VsmeError::Network("offline".into()))
        }

        async fn get_module_status(
            &self,
            _report_id: &str,
            _module_id: &str,
        ) -> Result<StoreResponse<CompletionStatus>> {
            Err(VsmeError::Network("offline".into()))
        }
    }

    struct Harness {
        orchestrator: SaveOrchestrator,
        store: Arc<ScriptedStore>,
        scheduler: ManualScheduler,
        fallback: LocalFallbackStore,
    }

    fn harness(store: ScriptedStore) -> Harness {
        let store = Arc::new(store);
        let scheduler = ManualScheduler::new();
        let fallback = LocalFallbackStore::new(Arc::new(MemoryKeyValueStore::new()), "vsme");
        let orchestrator = SaveOrchestrator::new(
            store.clone(),
            fallback.clone(),
            Arc::new(scheduler.clone()),
            RetryPolicy::default(),
        );
        Harness { orchestrator, store, scheduler, fallback }
    }

    #[tokio::test]
    async fn successful_save_clears_queue_and_caches() {
        let h = harness(ScriptedStore::default());
        let data = json!({ "companyName": "Acme" });
        let result = h.orchestrator.save_module_data("b0", "r1", data).await;

        assert!(result.success);
        assert_eq!(result.status, SaveStatus::Saved);
        assert_eq!(result.audit_id.as_deref(), Some("audit-1"));
        assert!(h.orchestrator.get_pending_saves().is_empty());
        assert!(h.fallback.cached_module("b0", "r1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn exhausted_retries_follow_backoff_then_store_locally() {
        let h = harness(ScriptedStore::failing(16));
        let first = h.orchestrator.save_module_data("b3", "r1", json!({ "scope1Total": 1 })).await;
        assert!(!first.success);
        assert_eq!(first.status, SaveStatus::RetryScheduled);
        assert_eq!(h.orchestrator.get_pending_saves().len(), 1);

        assert_eq!(h.scheduler.run_until_idle().await, 3);

        let expected: Vec<Duration> = [1000, 2000, 4000].map(Duration::from_millis).to_vec();
        assert_eq!(h.scheduler.scheduled_delays(), expected);
        let failed = h.fallback.failed_saves().await.unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].key, "b3-r1");
        assert!(h.orchestrator.get_pending_saves().is_empty());
    }

    #[tokio::test]
    async fn retry_succeeds_before_exhaustion() {
        let h = harness(ScriptedStore::failing(2));
        h.orchestrator.save_module_data("b8", "r1", json!({ "totalEmployees": 4 })).await;
        h.scheduler.run_until_idle().await;

        assert_eq!(h.scheduler.scheduled_delays().len(), 2);
        assert!(h.fallback.failed_saves().await.unwrap().is_empty());
        assert_eq!(h.store.saved.lock().len(), 1);
        assert!(h.orchestrator.get_pending_saves().is_empty());
    }

    #[tokio::test]
    async fn newer_save_supersedes_pending_retry() {
        let h = harness(ScriptedStore::failing(1));
        h.orchestrator.save_module_data("b0", "r1", json!({ "v": "old" })).await;
        assert_eq!(h.scheduler.pending_count(), 1);

        let result = h.orchestrator.save_module_data("b0", "r1", json!({ "v": "new" })).await;
        assert!(result.success);
        assert_eq!(h.scheduler.pending_count(), 0);

        // Nothing left to run: the stale retry was cancelled
        assert_eq!(h.scheduler.run_until_idle().await, 0);
        assert_eq!(h.store.saved.lock().as_slice(), &[json!({ "v": "new" })]);
    }

    #[tokio::test]
    async fn new_cycle_resets_retry_counter() {
        let h = harness(ScriptedStore::failing(16));
        h.orchestrator.save_module_data("b0", "r1", json!({ "v": 1 })).await;
        h.scheduler.run_next().await;
        h.orchestrator.save_module_data("b0", "r1", json!({ "v": 2 })).await;

        let delays = h.scheduler.scheduled_delays();
        let expected: Vec<Duration> = [1000, 2000, 1000].map(Duration::from_millis).to_vec();
        assert_eq!(delays, expected);
        assert_eq!(h.orchestrator.get_pending_saves()[0].data, json!({ "v": 2 }));
    }

    #[tokio::test]
    async fn flush_cancels_retries_and_resolves_everything() {
        let h = harness(ScriptedStore::failing(3));
        h.orchestrator.save_module_data("b0", "r1", json!({ "v": 1 })).await;
        h.orchestrator.save_module_data("b3", "r1", json!({ "v": 2 })).await;
        assert_eq!(h.orchestrator.get_pending_saves().len(), 2);

        // Third scripted failure hits the first flushed entry, then success
        let results = h.orchestrator.flush_pending_saves().await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, SaveStatus::StoredLocally);
        assert_eq!(results[1].status, SaveStatus::Saved);
        assert!(h.orchestrator.get_pending_saves().is_empty());
        assert_eq!(h.scheduler.pending_count(), 0);
        assert_eq!(h.fallback.failed_saves().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn recovery_replays_latest_failed_save_per_key() {
        let h = harness(ScriptedStore::default());
        for (value, minutes) in [(1, 10), (2, 5)] {
            h.fallback
                .append_failed_save(FailedSave {
                    key: "b0-r1".into(),
                    module_id: "b0".into(),
                    report_id: "r1".into(),
                    data: json!({ "v": value }),
                    failed_at: Utc::now() - chrono::Duration::minutes(minutes),
                })
                .await
                .unwrap();
        }

        let results = h.orchestrator.recover_failed_saves().await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].success);
        assert_eq!(h.store.saved.lock().as_slice(), &[json!({ "v": 2 })]);
        assert!(h.fallback.failed_saves().await.unwrap().is_empty());
    }

    /// Spawns tasks onto a separate runtime with no delay and blocks the
    /// caller until the task has looked at the queue (or 200ms pass)
    struct HeadStartScheduler {
        runtime: tokio::runtime::Handle,
        inner: Mutex<Weak<Inner>>,
        handle_stored: Arc<Mutex<Vec<bool>>>,
    }

    impl TaskScheduler for HeadStartScheduler {
        fn schedule(&self, delay: Duration, task: vsme_common::TaskFuture) -> ScheduledTask {
            let scheduled = ScheduledTask::new(delay);
            let inner = self.inner.lock().clone();
            let seen = Arc::clone(&self.handle_stored);
            let (checked_tx, checked_rx) = std::sync::mpsc::channel();
            self.runtime.spawn(async move {
                if let Some(inner) = inner.upgrade() {
                    let stored = inner.queue.lock().values().any(|entry| entry.retry.is_some());
                    seen.lock().push(stored);
                }
                let _ = checked_tx.send(());
                task.await;
            });
            let _ = checked_rx.recv_timeout(Duration::from_millis(200));
            scheduled
        }
    }

    #[test]
    fn retry_handle_is_queued_before_the_retry_runs() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        let scheduler = Arc::new(HeadStartScheduler {
            runtime: runtime.handle().clone(),
            inner: Mutex::new(Weak::new()),
            handle_stored: Arc::new(Mutex::new(Vec::new())),
        });
        let store = Arc::new(ScriptedStore::failing(1));
        let fallback = LocalFallbackStore::new(Arc::new(MemoryKeyValueStore::new()), "vsme");
        let orchestrator = SaveOrchestrator::new(
            store.clone(),
            fallback,
            scheduler.clone(),
            RetryPolicy::new(3, Duration::from_millis(1)).unwrap(),
        );
        *scheduler.inner.lock() = Arc::downgrade(&orchestrator.inner);

        runtime.block_on(async {
            let first = orchestrator.save_module_data("b0", "r1", json!({ "v": 1 })).await;
            assert_eq!(first.status, SaveStatus::RetryScheduled);

            for _ in 0..200 {
                if orchestrator.get_pending_saves().is_empty() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        });

        assert_eq!(store.saved.lock().as_slice(), &[json!({ "v": 1 })]);
        assert_eq!(scheduler.handle_stored.lock().as_slice(), &[true]);
        assert!(orchestrator.get_pending_saves().is_empty());
    }

    #[tokio::test]
    async fn non_retryable_error_goes_straight_to_fallback() {
        let store = ScriptedStore::default();
        store.outcomes.lock().push_back(Err(VsmeError::Validation("rejected".into())));
        let h = harness(store);

        let result = h.orchestrator.save_module_data("b1", "r1", json!({ "x": 1 })).await;
        assert_eq!(result.status, SaveStatus::StoredLocally);
        assert!(h.scheduler.scheduled_delays().is_empty());
        assert!(h.orchestrator.get_pending_saves().is_empty());
    }
}
