//! Remote Report Data Store adapters

pub mod http_store;

pub use http_store::HttpReportDataStore;
