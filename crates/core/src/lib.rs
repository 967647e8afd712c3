//! # VSME Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Emission factor lookup, unit conversion and emission formulas
//! - Per-module validators and the completion tracker
//! - Save orchestration with retry and local fallback
//! - Port interfaces (traits) for the Report Data Store and local storage
//!
//! ## Architecture Principles
//! - Only depends on `vsme-common` and `vsme-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod completion;
pub mod emissions;
pub mod persistence;
pub mod validation;

pub use completion::{completion_for_fields, completion_status, required_fields};
pub use emissions::{
    ActivityEntry, EmissionFactorCatalog, EmissionsCalculator, EmissionsSummary, FactorQuery,
    GwpSet,
};
pub use persistence::{
    KeyValueStore, LocalFallbackStore, MemoryKeyValueStore, ModuleDataService, ReportDataStore,
    SaveOrchestrator,
};
pub use validation::{validate_module, ModuleKind};
