//! Domain types and models

pub mod emissions;
pub mod module;
pub mod persistence;
pub mod units;

pub use emissions::{
    ActivityData, ActivityRecord, CalculationMethod, CalculationResults, DataQuality,
    ElectricityEmissions, EmissionFactor, FactorCategory, FactorSource, MarketBasis, Scope,
    SourceCategory,
};
pub use module::{CompletionStatus, ModuleData, ValidationResult, ValidationStatus};
pub use persistence::{
    queue_key, CachedModule, FailedSave, PendingSave, SaveAttempt, SaveResult, SaveStatus,
    StoreResponse,
};
pub use units::{Dimension, Unit};
