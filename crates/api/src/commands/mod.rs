//! Commands exposed to the reporting UI
//!
//! Each command is a plain async function over [`AppContext`](crate::AppContext)
//! returning `Result<T, String>`, so any front-end bridge can forward it as-is.

pub mod emissions;
pub mod health;
pub mod modules;

pub use emissions::{
    calculate_emissions, lookup_emission_factor, summarize_emissions, EmissionsReport,
    FactorLookupRequest,
};
pub use health::get_app_health;
pub use modules::{
    flush_pending_saves, get_module_completion_status, get_pending_saves, load_module,
    load_module_data, recover_failed_saves, save_module_data, validate_module_data,
};
