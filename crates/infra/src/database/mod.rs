//! SQLite persistence for the local fallback store

pub mod kv_store;
pub mod manager;

pub use kv_store::SqliteKeyValueStore;
pub use manager::{DbManager, SqliteConnection};
