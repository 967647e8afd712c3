//! Time utilities: one-shot scheduled tasks with cancellation support.

pub mod scheduler;

pub use scheduler::{ScheduledTask, TaskFuture, TaskScheduler, TokioScheduler};
