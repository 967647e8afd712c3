//! REST client for the Report Data Store.
//!
//! Routes, relative to the configured base URL:
//! - `GET  reports/{reportId}/modules/{moduleId}` returns the module data
//! - `PUT  reports/{reportId}/modules/{moduleId}` with `{ "data": ... }`
//! - `GET  reports/{reportId}/modules/{moduleId}/status`
//!
//! Every answer is a `{ "status": ..., "data": ... }` envelope.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, instrument};
use vsme_core::ReportDataStore;
use vsme_domain::{CompletionStatus, ReportStoreConfig, Result, StoreResponse, VsmeError};

use crate::errors::conversions::status_error;
use crate::http::HttpClient;

/// [`ReportDataStore`] speaking JSON over HTTP to the remote report service
pub struct HttpReportDataStore {
    http: HttpClient,
    base_url: String,
}

impl HttpReportDataStore {
    /// Build the client; an empty base URL is a config error
    pub fn new(config: &ReportStoreConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(VsmeError::Config("report store base URL is empty".into()));
        }
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .bearer_token(config.api_token.clone())
            .build()?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    fn module_url(&self, report_id: &str, module_id: &str) -> String {
        format!("{}/reports/{report_id}/modules/{module_id}", self.base_url)
    }

    async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<StoreResponse<T>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(%status, body = %body, "report data store rejected request");
            return Err(status_error(status));
        }
        response.json::<StoreResponse<T>>().await.map_err(|err| {
            VsmeError::Network(format!("unexpected report data store response: {err}"))
        })
    }
}

#[async_trait]
impl ReportDataStore for HttpReportDataStore {
    #[instrument(skip(self, data))]
    async fn update_module_data(
        &self,
        report_id: &str,
        module_id: &str,
        data: &Value,
    ) -> Result<StoreResponse<Value>> {
        let request = self
            .http
            .request(Method::PUT, self.module_url(report_id, module_id))
            .json(&json!({ "data": data }));
        let response = self.http.send_once(request).await?;
        Self::read_envelope(response).await
    }

    #[instrument(skip(self))]
    async fn get_module_data(
        &self,
        report_id: &str,
        module_id: &str,
    ) -> Result<StoreResponse<Value>> {
        let request = self.http.request(Method::GET, self.module_url(report_id, module_id));
        let response = self.http.send(request).await?;
        Self::read_envelope(response).await
    }

    #[instrument(skip(self))]
    async fn get_module_status(
        &self,
        report_id: &str,
        module_id: &str,
    ) -> Result<StoreResponse<CompletionStatus>> {
        let url = format!("{}/status", self.module_url(report_id, module_id));
        let response = self.http.send(self.http.request(Method::GET, url)).await?;
        Self::read_envelope(response).await
    }
}
