use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;
use vsme_domain::VsmeError;

use crate::errors::InfraError;

/// HTTP client with timeout, optional bearer auth and bounded retries.
///
/// [`HttpClient::send`] retries transport failures and 5xx answers with a
/// doubling delay. Writes whose retries are owned by the save orchestrator go
/// through [`HttpClient::send_once`] so attempts are never multiplied.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the request, retrying transient failures.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, VsmeError> {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let cloned = builder.try_clone().ok_or_else(|| {
                VsmeError::Internal("streaming request bodies cannot be retried".into())
            })?;
            let last = attempt >= attempts;

            match self.send_once(cloned).await {
                Ok(response) if response.status().is_server_error() && !last => {
                    debug!(attempt, status = %response.status(), "server error, retrying");
                }
                Err(err) if err.is_retryable() && !last => {
                    debug!(attempt, error = %err, "transport failure, retrying");
                }
                outcome => return outcome,
            }

            let delay = self.backoff_delay(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Execute the request exactly once.
    pub async fn send_once(&self, builder: RequestBuilder) -> Result<Response, VsmeError> {
        let request = builder.build().map_err(|err| VsmeError::from(InfraError::from(err)))?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|err| VsmeError::from(InfraError::from(err)))?;
        debug!(%method, %url, status = %response.status(), "received HTTP response");
        Ok(response)
    }

    fn backoff_delay(&self, attempt: usize) -> Duration {
        let shift = attempt.saturating_sub(1).min(8) as u32;
        self.base_backoff.saturating_mul(1u32 << shift)
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    bearer_token: Option<String>,
    user_agent: String,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 2,
            base_backoff: Duration::from_millis(200),
            bearer_token: None,
            user_agent: concat!("vsme-infra/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total number of attempts made by [`HttpClient::send`].
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token;
        self
    }

    pub fn build(self) -> Result<HttpClient, VsmeError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = self.bearer_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| VsmeError::Config("API token contains invalid characters".into()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .default_headers(headers)
            .no_proxy()
            .build()
            .map_err(|err| VsmeError::from(InfraError::from(err)))?;

        Ok(HttpClient {
            client,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}
