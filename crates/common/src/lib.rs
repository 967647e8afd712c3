//! Modular common utilities shared across VSME crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: retry policies, JSON field-path helpers
//! - `runtime`: cancellable scheduled tasks on top of tokio
//! - `test-utils`: deterministic schedulers and assertions for tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod resilience;
#[cfg(feature = "foundation")]
pub mod utils;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "runtime", feature = "test-utils"))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use resilience::{RetryError, RetryPolicy};
#[cfg(feature = "runtime")]
pub use time::{ScheduledTask, TaskFuture, TaskScheduler, TokioScheduler};
#[cfg(feature = "foundation")]
pub use utils::json::{has_content, is_filled, number_at, resolve_path};
