//! # VSME Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP Report Data Store client (reqwest)
//! - SQLite-backed local key-value store (rusqlite + r2d2)
//! - Configuration loading from environment, TOML or JSON
//! - Emission factor file loading
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `vsme-core`
//! - Contains all "impure" code (I/O, network, filesystem)

pub mod catalog;
pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod observability;
pub mod report_store;

// Re-export commonly used items
pub use catalog::load_catalog;
pub use database::{DbManager, SqliteKeyValueStore};
pub use errors::InfraError;
pub use http::HttpClient;
pub use observability::init_tracing;
pub use report_store::HttpReportDataStore;
