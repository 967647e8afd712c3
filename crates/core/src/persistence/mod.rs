//! Module persistence: remote saves with retry, local fallback and recovery

pub mod fallback;
pub mod memory;
pub mod orchestrator;
pub mod ports;
pub mod service;

pub use fallback::LocalFallbackStore;
pub use memory::MemoryKeyValueStore;
pub use orchestrator::SaveOrchestrator;
pub use ports::{KeyValueStore, ReportDataStore};
pub use service::ModuleDataService;
