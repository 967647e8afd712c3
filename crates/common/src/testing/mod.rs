//! Testing utilities and helpers
//!
//! - **[`assertions`]**: approximate float comparisons for emission figures
//! - **[`scheduler`]**: a [`TaskScheduler`](crate::time::TaskScheduler) that
//!   records requested delays and only fires tasks when told to

pub mod assertions;
pub mod scheduler;

pub use assertions::{assert_approx_eq, assert_relative_eq};
pub use scheduler::ManualScheduler;
