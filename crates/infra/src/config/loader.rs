//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the process environment when one exists
//! 2. Attempts to load from environment variables
//! 3. If incomplete, falls back to loading from file
//! 4. Probes multiple paths for config files
//! 5. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `VSME_REPORT_STORE_URL`: Report Data Store base URL (required)
//! - `VSME_REPORT_STORE_TIMEOUT`: Request timeout in seconds
//! - `VSME_REPORT_STORE_TOKEN`: Bearer token for the Report Data Store
//! - `VSME_STORAGE_PATH`: Local fallback database file path
//! - `VSME_STORAGE_POOL_SIZE`: Connection pool size
//! - `VSME_STORAGE_NAMESPACE`: Prefix of every local storage key
//! - `VSME_RETRY_MAX`: Retries after the first failed save
//! - `VSME_RETRY_BASE_DELAY_MS`: Delay before the first retry
//! - `VSME_LOG_LEVEL`: `EnvFilter` directive
//! - `VSME_LOG_JSON`: Emit JSON log lines (true/false)
//! - `VSME_FACTOR_FILE`: Extra emission factors (TOML or JSON)
//! - `VSME_DEFAULT_COUNTRY`: Country for grid electricity factors
//! - `VSME_GWP_AR6`: Use AR6 global warming potentials (true/false)
//!
//! Everything except the URL falls back to [`Config::default`].
//!
//! ## File Locations
//! The loader searches `config.{json,toml}` and `vsme.{json,toml}` in the
//! current directory, its two parents, and next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use vsme_domain::{
    Config, EmissionsConfig, LoggingConfig, ReportStoreConfig, Result, RetryConfig, StorageConfig,
    VsmeError,
};

const CONFIG_FILE_NAMES: [&str; 4] = ["config.json", "config.toml", "vsme.json", "vsme.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variable is missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `VsmeError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "could not read .env file"),
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `VsmeError::Config` if `VSME_REPORT_STORE_URL` is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let defaults = Config::default();

    let report_store = ReportStoreConfig {
        base_url: env_var("VSME_REPORT_STORE_URL")?,
        timeout_secs: env_parse("VSME_REPORT_STORE_TIMEOUT", defaults.report_store.timeout_secs)?,
        api_token: env_opt("VSME_REPORT_STORE_TOKEN"),
    };

    let storage = StorageConfig {
        path: std::env::var("VSME_STORAGE_PATH").unwrap_or(defaults.storage.path),
        pool_size: env_parse("VSME_STORAGE_POOL_SIZE", defaults.storage.pool_size)?,
        namespace: std::env::var("VSME_STORAGE_NAMESPACE").unwrap_or(defaults.storage.namespace),
    };

    let retry = RetryConfig {
        max_retries: env_parse("VSME_RETRY_MAX", defaults.retry.max_retries)?,
        base_delay_ms: env_parse("VSME_RETRY_BASE_DELAY_MS", defaults.retry.base_delay_ms)?,
    };

    let logging = LoggingConfig {
        level: std::env::var("VSME_LOG_LEVEL").unwrap_or(defaults.logging.level),
        json: env_bool("VSME_LOG_JSON", defaults.logging.json),
    };

    let emissions = EmissionsConfig {
        factor_file: env_opt("VSME_FACTOR_FILE"),
        default_country: env_opt("VSME_DEFAULT_COUNTRY"),
        use_ar6: env_bool("VSME_GWP_AR6", defaults.emissions.use_ar6),
    };

    Ok(Config { report_store, storage, retry, logging, emissions })
}

/// Load configuration from a file
///
/// If `path` is `None`, searches multiple locations for config files.
/// Format is picked from the file extension.
///
/// # Errors
/// Returns `VsmeError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(VsmeError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => find_config_file().ok_or_else(|| {
            VsmeError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| VsmeError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, format chosen by extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| VsmeError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| VsmeError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(VsmeError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard locations for a configuration file.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn find_config_file() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.extend([exe_dir.to_path_buf(), exe_dir.join("..")]);
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| VsmeError::Config(format!("Missing required environment variable: {}", key)))
}

/// Optional environment variable; empty counts as unset
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an optional numeric environment variable
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| VsmeError::Config(format!("Invalid value for {}: {}", key, e))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const VARS: [&str; 13] = [
        "VSME_REPORT_STORE_URL",
        "VSME_REPORT_STORE_TIMEOUT",
        "VSME_REPORT_STORE_TOKEN",
        "VSME_STORAGE_PATH",
        "VSME_STORAGE_POOL_SIZE",
        "VSME_STORAGE_NAMESPACE",
        "VSME_RETRY_MAX",
        "VSME_RETRY_BASE_DELAY_MS",
        "VSME_LOG_LEVEL",
        "VSME_LOG_JSON",
        "VSME_FACTOR_FILE",
        "VSME_DEFAULT_COUNTRY",
        "VSME_GWP_AR6",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("VSME_TEST_BOOL_ON", "ON");
        std::env::set_var("VSME_TEST_BOOL_OFF", "off");

        assert!(env_bool("VSME_TEST_BOOL_ON", false));
        assert!(!env_bool("VSME_TEST_BOOL_OFF", true));
        assert!(env_bool("VSME_TEST_BOOL_MISSING", true));

        std::env::remove_var("VSME_TEST_BOOL_ON");
        std::env::remove_var("VSME_TEST_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("VSME_REPORT_STORE_URL", "https://reports.example.test/api");
        std::env::set_var("VSME_REPORT_STORE_TIMEOUT", "12");
        std::env::set_var("VSME_REPORT_STORE_TOKEN", "token-123");
        std::env::set_var("VSME_STORAGE_PATH", "/tmp/vsme.db");
        std::env::set_var("VSME_STORAGE_POOL_SIZE", "2");
        std::env::set_var("VSME_STORAGE_NAMESPACE", "farm");
        std::env::set_var("VSME_RETRY_MAX", "5");
        std::env::set_var("VSME_RETRY_BASE_DELAY_MS", "250");
        std::env::set_var("VSME_LOG_LEVEL", "vsme_core=debug");
        std::env::set_var("VSME_LOG_JSON", "true");
        std::env::set_var("VSME_DEFAULT_COUNTRY", "IE");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.report_store.base_url, "https://reports.example.test/api");
        assert_eq!(config.report_store.timeout_secs, 12);
        assert_eq!(config.report_store.api_token.as_deref(), Some("token-123"));
        assert_eq!(config.storage.path, "/tmp/vsme.db");
        assert_eq!(config.storage.pool_size, 2);
        assert_eq!(config.storage.namespace, "farm");
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.base_delay_ms, 250);
        assert_eq!(config.logging.level, "vsme_core=debug");
        assert!(config.logging.json);
        assert_eq!(config.emissions.default_country.as_deref(), Some("IE"));
        assert!(config.emissions.factor_file.is_none());

        clear_env();
    }

    #[test]
    fn test_load_from_env_defaults_optional_vars() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("VSME_REPORT_STORE_URL", "http://localhost:5000/api");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.retry, RetryConfig::default());
        assert_eq!(config.storage, StorageConfig::default());
        assert!(config.report_store.api_token.is_none());

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, VsmeError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("VSME_REPORT_STORE_URL", "http://localhost:5000/api");
        std::env::set_var("VSME_RETRY_MAX", "three");

        let err = load_from_env().unwrap_err();
        assert!(err.to_string().contains("VSME_RETRY_MAX"));

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let json_content = r#"{
            "report_store": { "base_url": "https://reports.example.test", "timeout_secs": 5 },
            "retry": { "max_retries": 4 }
        }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let config = load_from_file(Some(path.clone())).expect("config from JSON");
        assert_eq!(config.report_store.base_url, "https://reports.example.test");
        assert_eq!(config.report_store.timeout_secs, 5);
        assert_eq!(config.retry.max_retries, 4);
        assert_eq!(config.retry.base_delay_ms, 1000);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_missing() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/vsme.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_extension() {
        let err = parse_config("", Path::new("vsme.yaml")).unwrap_err();
        assert!(matches!(err, VsmeError::Config(_)));
    }
}
