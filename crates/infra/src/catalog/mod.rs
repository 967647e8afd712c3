//! Emission factor catalogue files

pub mod loader;

pub use loader::{load_catalog, load_factor_file, parse_factors};
