//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_STORAGE_NAMESPACE,
};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub report_store: ReportStoreConfig,
    pub storage: StorageConfig,
    pub retry: RetryConfig,
    pub logging: LoggingConfig,
    pub emissions: EmissionsConfig,
}

/// Remote Report Data Store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportStoreConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
}

/// Local durable fallback storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
    pub pool_size: u32,
    /// Prefix of every key written to local storage
    pub namespace: String,
}

/// Save retry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `vsme_core=debug`
    pub level: String,
    pub json: bool,
}

/// Emission calculation defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionsConfig {
    /// TOML or JSON file with extra emission factors merged over the
    /// built-in catalogue
    pub factor_file: Option<String>,
    /// Country used for grid electricity when an entry names none
    pub default_country: Option<String>,
    /// Use IPCC AR6 instead of AR5 global warming potentials
    pub use_ar6: bool,
}

impl Default for ReportStoreConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:5000/api".to_string(), timeout_secs: 30, api_token: None }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "vsme-local.db".to_string(),
            pool_size: 4,
            namespace: DEFAULT_STORAGE_NAMESPACE.to_string(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_retries: DEFAULT_MAX_RETRIES, base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "retry": { "max_retries": 5 } }"#).unwrap();
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.base_delay_ms, DEFAULT_RETRY_BASE_DELAY_MS);
        assert_eq!(config.storage.namespace, "vsme");
    }

    #[test]
    fn api_token_is_never_serialized() {
        let mut config = Config::default();
        config.report_store.api_token = Some("secret".into());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
