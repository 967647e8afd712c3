use std::sync::Arc;

use tempfile::TempDir;
use vsme_infra::database::{DbManager, SqliteKeyValueStore};

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let manager = DbManager::new(temp_dir.path().join("local.db"), 2)
            .expect("db manager should be created");
        manager.run_migrations().expect("migrations should run");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    pub fn kv_store(&self) -> SqliteKeyValueStore {
        SqliteKeyValueStore::new(Arc::clone(&self.manager))
    }
}
