//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Global warming potentials (100-year horizon)
pub const GWP_CH4_AR5: f64 = 28.0;
pub const GWP_N2O_AR5: f64 = 265.0;
pub const GWP_CH4_AR6: f64 = 27.9;
pub const GWP_N2O_AR6: f64 = 273.0;

// Save orchestration
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1000;

// Local fallback storage layout
pub const DEFAULT_STORAGE_NAMESPACE: &str = "vsme";
pub const FAILED_SAVES_SUFFIX: &str = "failed-saves";
pub const MODULE_CACHE_SEGMENT: &str = "module";

// Validation scores
pub const SCORE_MAX: u8 = 100;
pub const GENERIC_PRESENT_SCORE: u8 = 50;
pub const B3_VALID_SCORE: u8 = 75;
pub const B8_WARNING_SCORE: u8 = 80;

// Uncertainty by data quality (percent)
pub const UNCERTAINTY_MEASURED_PCT: f64 = 5.0;
pub const UNCERTAINTY_CALCULATED_PCT: f64 = 10.0;
pub const UNCERTAINTY_ESTIMATED_PCT: f64 = 30.0;
