//! Application context - dependency injection container

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use vsme_common::{RetryPolicy, TaskScheduler, TokioScheduler};
use vsme_core::{
    EmissionsCalculator, GwpSet, KeyValueStore, LocalFallbackStore, ModuleDataService,
    ReportDataStore, SaveOrchestrator,
};
use vsme_domain::{Config, Result, VsmeError};
use vsme_infra::{load_catalog, DbManager, HttpReportDataStore, SqliteKeyValueStore};

use crate::utils::health::{ComponentHealth, HealthStatus};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub modules: ModuleDataService,
    pub calculator: EmissionsCalculator,
    /// Present when local storage is the SQLite store
    pub db: Option<Arc<DbManager>>,
}

impl AppContext {
    /// Load configuration from the environment or a config file and wire
    /// the production adapters
    pub async fn new() -> Result<Self> {
        let config = vsme_infra::config::load()?;
        Self::new_with_config(config).await
    }

    /// Wire the SQLite local store and the HTTP Report Data Store.
    ///
    /// Must be called inside a tokio runtime; retries are scheduled on it.
    pub async fn new_with_config(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.storage.path, config.storage.pool_size)?);
        let migrations = Arc::clone(&db);
        tokio::task::spawn_blocking(move || migrations.run_migrations())
            .await
            .map_err(|e| VsmeError::Internal(format!("migration task failed: {e}")))??;

        let store: Arc<dyn ReportDataStore> = Arc::new(HttpReportDataStore::new(&config.report_store)?);
        let kv: Arc<dyn KeyValueStore> = Arc::new(SqliteKeyValueStore::new(Arc::clone(&db)));
        let scheduler: Arc<dyn TaskScheduler> = Arc::new(
            TokioScheduler::current()
                .map_err(|e| VsmeError::Internal(format!("no tokio runtime available: {e}")))?,
        );

        let mut ctx = Self::from_parts(config, store, kv, scheduler)?;
        ctx.db = Some(db);

        info!(
            storage = %ctx.config.storage.path,
            report_store = %ctx.config.report_store.base_url,
            "application context initialized"
        );
        Ok(ctx)
    }

    /// Build the services over caller-supplied ports
    pub fn from_parts(
        config: Config,
        store: Arc<dyn ReportDataStore>,
        kv: Arc<dyn KeyValueStore>,
        scheduler: Arc<dyn TaskScheduler>,
    ) -> Result<Self> {
        let policy = RetryPolicy::new(
            config.retry.max_retries,
            Duration::from_millis(config.retry.base_delay_ms),
        )
        .map_err(|e| VsmeError::Config(e.to_string()))?;

        let catalog = load_catalog(config.emissions.factor_file.as_deref().map(Path::new))?;
        let gwp = if config.emissions.use_ar6 { GwpSet::AR6 } else { GwpSet::AR5 };
        let mut calculator = EmissionsCalculator::new(Arc::new(catalog)).with_gwp(gwp);
        if let Some(country) = &config.emissions.default_country {
            calculator = calculator.with_country(country.clone());
        }

        let fallback = LocalFallbackStore::new(kv, config.storage.namespace.clone());
        let orchestrator =
            SaveOrchestrator::new(Arc::clone(&store), fallback.clone(), scheduler, policy);
        let modules = ModuleDataService::new(store, fallback, orchestrator);

        Ok(Self { config, modules, calculator, db: None })
    }

    /// Check health of all application components.
    ///
    /// The application is healthy when at least 80% of components are.
    pub async fn health_check(&self) -> HealthStatus {
        let mut status = HealthStatus::new()
            .add_component(self.check_database_health().await)
            .add_component(self.check_failed_saves().await)
            .add_component(self.check_cached_modules().await)
            .add_component(self.check_pending_saves());

        status = status.add_component(if self.calculator.catalog().is_empty() {
            ComponentHealth::unhealthy("emission_factors", "catalogue is empty")
        } else {
            ComponentHealth::healthy_with(
                "emission_factors",
                format!("{} factors loaded", self.calculator.catalog().len()),
            )
        });

        status.calculate_score();
        status
    }

    async fn check_database_health(&self) -> ComponentHealth {
        let Some(db) = self.db.clone() else {
            return ComponentHealth::healthy_with("local_storage", "in-process store");
        };

        match tokio::task::spawn_blocking(move || db.health_check()).await {
            Ok(Ok(())) => ComponentHealth::healthy("local_storage"),
            Ok(Err(err)) => ComponentHealth::unhealthy("local_storage", err.to_string()),
            Err(err) => ComponentHealth::unhealthy("local_storage", format!("health task failed: {err}")),
        }
    }

    async fn check_failed_saves(&self) -> ComponentHealth {
        match self.modules.fallback().failed_saves().await {
            Ok(entries) if entries.is_empty() => ComponentHealth::healthy("failed_saves"),
            Ok(entries) => ComponentHealth::healthy_with(
                "failed_saves",
                format!("{} saves waiting for recovery", entries.len()),
            ),
            Err(err) => ComponentHealth::unhealthy("failed_saves", err.to_string()),
        }
    }

    async fn check_cached_modules(&self) -> ComponentHealth {
        match self.modules.fallback().cached_module_keys().await {
            Ok(keys) => ComponentHealth::healthy_with(
                "module_cache",
                format!("{} module copies cached", keys.len()),
            ),
            Err(err) => ComponentHealth::unhealthy("module_cache", err.to_string()),
        }
    }

    fn check_pending_saves(&self) -> ComponentHealth {
        let pending = self.modules.get_pending_saves().len();
        if pending == 0 {
            ComponentHealth::healthy("save_queue")
        } else {
            ComponentHealth::healthy_with("save_queue", format!("{pending} saves in flight"))
        }
    }

    /// Flush queued saves before the process exits
    pub async fn shutdown(&self) {
        let results = self.modules.flush_pending_saves().await;
        let failed = results.iter().filter(|r| !r.success).count();
        if failed > 0 {
            warn!(failed, total = results.len(), "some saves could not be flushed on shutdown");
        } else {
            info!(flushed = results.len(), "save queue flushed");
        }
    }
}
