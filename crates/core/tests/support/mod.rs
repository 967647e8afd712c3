//! Shared test helpers for `vsme-core` integration tests.
//!
//! Provides an in-memory Report Data Store whose availability can be toggled
//! so tests can drive save, retry and fallback paths deterministically.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use vsme_common::testing::ManualScheduler;
use vsme_common::RetryPolicy;
use vsme_core::{
    LocalFallbackStore, MemoryKeyValueStore, ModuleDataService, ReportDataStore, SaveOrchestrator,
};
use vsme_domain::{CompletionStatus, Result as DomainResult, StoreResponse, VsmeError};

/// In-memory mock for `ReportDataStore`.
///
/// Holds module documents keyed by `(reportId, moduleId)`. While offline every
/// call fails with a retryable network error. Individual update outcomes can
/// be scripted ahead of time.
#[derive(Default, Clone)]
pub struct MockReportDataStore {
    documents: Arc<Mutex<HashMap<(String, String), Value>>>,
    statuses: Arc<Mutex<HashMap<(String, String), CompletionStatus>>>,
    scripted: Arc<Mutex<VecDeque<VsmeError>>>,
    offline: Arc<Mutex<bool>>,
    updates: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockReportDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock() = offline;
    }

    /// Fail the next `update_module_data` call with `err`
    pub fn fail_next_update(&self, err: VsmeError) {
        self.scripted.lock().push_back(err);
    }

    pub fn with_document(self, report_id: &str, module_id: &str, data: Value) -> Self {
        self.documents.lock().insert((report_id.into(), module_id.into()), data);
        self
    }

    pub fn with_status(self, report_id: &str, status: CompletionStatus) -> Self {
        self.statuses.lock().insert((report_id.into(), status.module_id.clone()), status);
        self
    }

    pub fn document(&self, report_id: &str, module_id: &str) -> Option<Value> {
        self.documents.lock().get(&(report_id.to_string(), module_id.to_string())).cloned()
    }

    /// Successful updates in arrival order as `(moduleId, data)`
    pub fn updates(&self) -> Vec<(String, Value)> {
        self.updates.lock().clone()
    }

    fn check_online(&self) -> DomainResult<()> {
        if *self.offline.lock() {
            Err(VsmeError::Network("report data store unreachable".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ReportDataStore for MockReportDataStore {
    async fn update_module_data(
        &self,
        report_id: &str,
        module_id: &str,
        data: &Value,
    ) -> DomainResult<StoreResponse<Value>> {
        self.check_online()?;
        if let Some(err) = self.scripted.lock().pop_front() {
            return Err(err);
        }
        self.documents.lock().insert((report_id.into(), module_id.into()), data.clone());
        let mut updates = self.updates.lock();
        updates.push((module_id.to_string(), data.clone()));
        Ok(StoreResponse {
            status: "success".into(),
            data: json!({ "auditId": format!("audit-{}", updates.len()) }),
        })
    }

    async fn get_module_data(
        &self,
        report_id: &str,
        module_id: &str,
    ) -> DomainResult<StoreResponse<Value>> {
        self.check_online()?;
        self.document(report_id, module_id)
            .map(|data| StoreResponse { status: "success".into(), data })
            .ok_or_else(|| VsmeError::NotFound(format!("Module {module_id} of report {report_id}")))
    }

    async fn get_module_status(
        &self,
        report_id: &str,
        module_id: &str,
    ) -> DomainResult<StoreResponse<CompletionStatus>> {
        self.check_online()?;
        self.statuses
            .lock()
            .get(&(report_id.to_string(), module_id.to_string()))
            .cloned()
            .map(|data| StoreResponse { status: "success".into(), data })
            .ok_or_else(|| VsmeError::NotFound(format!("Status of module {module_id}")))
    }
}

/// Fully wired service over in-memory adapters and a manual scheduler
pub struct TestContext {
    pub service: ModuleDataService,
    pub remote: MockReportDataStore,
    pub scheduler: ManualScheduler,
    pub fallback: LocalFallbackStore,
    pub local: MemoryKeyValueStore,
}

impl TestContext {
    pub fn new(remote: MockReportDataStore) -> Self {
        let local = MemoryKeyValueStore::new();
        let fallback = LocalFallbackStore::new(Arc::new(local.clone()), "vsme");
        let scheduler = ManualScheduler::new();
        let store: Arc<dyn ReportDataStore> = Arc::new(remote.clone());
        let orchestrator = SaveOrchestrator::new(
            store.clone(),
            fallback.clone(),
            Arc::new(scheduler.clone()),
            RetryPolicy::default(),
        );
        let service = ModuleDataService::new(store, fallback.clone(), orchestrator);
        Self { service, remote, scheduler, fallback, local }
    }
}
