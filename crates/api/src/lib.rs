//! # VSME API
//!
//! Application layer - commands and the `vsme-sync` entry point.
//!
//! This crate contains:
//! - Commands (front end → core services bridge)
//! - Application context (dependency injection)
//! - Health reporting
//!
//! ## Architecture
//! - Depends on `vsme-common`, `vsme-core`, `vsme-domain` and `vsme-infra`
//! - Wires the core services to the SQLite and HTTP adapters

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
