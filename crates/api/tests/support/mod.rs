//! Shared helpers for `vsme-api` integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use vsme_api::AppContext;
use vsme_common::testing::ManualScheduler;
use vsme_core::{MemoryKeyValueStore, ReportDataStore};
use vsme_domain::{CompletionStatus, Config, Result as DomainResult, StoreResponse, VsmeError};

/// Report Data Store held in memory; every call fails while offline
#[derive(Default, Clone)]
pub struct InMemoryReportStore {
    documents: Arc<Mutex<HashMap<(String, String), Value>>>,
    offline: Arc<Mutex<bool>>,
}

impl InMemoryReportStore {
    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock() = offline;
    }

    pub fn document(&self, report_id: &str, module_id: &str) -> Option<Value> {
        self.documents.lock().get(&(report_id.to_string(), module_id.to_string())).cloned()
    }

    fn check_online(&self) -> DomainResult<()> {
        if *self.offline.lock() {
            Err(VsmeError::Network("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ReportDataStore for InMemoryReportStore {
    async fn update_module_data(
        &self,
        report_id: &str,
        module_id: &str,
        data: &Value,
    ) -> DomainResult<StoreResponse<Value>> {
        self.check_online()?;
        self.documents.lock().insert((report_id.into(), module_id.into()), data.clone());
        Ok(StoreResponse { status: "success".into(), data: json!({ "auditId": "audit-1" }) })
    }

    async fn get_module_data(
        &self,
        report_id: &str,
        module_id: &str,
    ) -> DomainResult<StoreResponse<Value>> {
        self.check_online()?;
        self.document(report_id, module_id)
            .map(|data| StoreResponse { status: "success".into(), data })
            .ok_or_else(|| VsmeError::NotFound(format!("Module {module_id}")))
    }

    async fn get_module_status(
        &self,
        _report_id: &str,
        module_id: &str,
    ) -> DomainResult<StoreResponse<CompletionStatus>> {
        self.check_online()?;
        Err(VsmeError::NotFound(format!("Status of module {module_id}")))
    }
}

pub struct TestApp {
    pub ctx: AppContext,
    pub remote: InMemoryReportStore,
    pub scheduler: ManualScheduler,
    pub local: MemoryKeyValueStore,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let remote = InMemoryReportStore::default();
        let scheduler = ManualScheduler::new();
        let local = MemoryKeyValueStore::new();
        let ctx = AppContext::from_parts(
            config,
            Arc::new(remote.clone()),
            Arc::new(local.clone()),
            Arc::new(scheduler.clone()),
        )
        .expect("context");
        Self { ctx, remote, scheduler, local }
    }
}
