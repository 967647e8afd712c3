//! Resilience patterns for transient failures.
//!
//! The retry policy holds no executor: callers ask it for the delay of a
//! given attempt and whether another retry is allowed, then schedule the
//! attempt themselves (see [`crate::time::TaskScheduler`]).

pub mod retry;

pub use retry::{RetryError, RetryPolicy};
