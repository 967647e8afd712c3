//! # VSME Domain
//!
//! Business domain types and models for VSME sustainability reporting.
//!
//! This crate contains:
//! - Emission factor, activity and calculation result types
//! - Module data, validation and completion types
//! - Save/retry bookkeeping types shared with the persistence layer
//! - Domain error types and Result definitions
//! - Configuration structures and domain constants
//!
//! ## Architecture
//! - No dependencies on other VSME crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
