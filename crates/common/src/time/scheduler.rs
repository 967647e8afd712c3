//! One-shot delayed tasks with cancellation support
//!
//! [`TaskScheduler`] is the seam between code that needs "run this later"
//! and the runtime that actually waits. Production code uses
//! [`TokioScheduler`]; tests use
//! [`ManualScheduler`](crate::testing::ManualScheduler) to fire tasks on
//! demand without sleeping.

use std::time::Duration;

use futures::future::BoxFuture;
use tokio::runtime::{Handle, TryCurrentError};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Boxed future driven by a scheduler
pub type TaskFuture = BoxFuture<'static, ()>;

/// Handle to a scheduled task that can be used to cancel it
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    token: CancellationToken,
    delay: Duration,
}

impl ScheduledTask {
    /// Create a handle for a task that fires after `delay`
    pub fn new(delay: Duration) -> Self {
        Self { token: CancellationToken::new(), delay }
    }

    /// Cancel the task. Has no effect once the task started running.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check if the task has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Delay the task was scheduled with
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Token observed by the scheduler implementation
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

/// Runs futures after a delay without blocking the caller
pub trait TaskScheduler: Send + Sync {
    /// Schedule `task` to run once after `delay`.
    ///
    /// Implementations must not poll `task` before returning.
    fn schedule(&self, delay: Duration, task: TaskFuture) -> ScheduledTask;
}

/// Scheduler backed by a tokio runtime
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Create a scheduler spawning onto the given runtime
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Create a scheduler bound to the runtime of the calling context
    pub fn current() -> Result<Self, TryCurrentError> {
        Handle::try_current().map(Self::new)
    }
}

impl TaskScheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: TaskFuture) -> ScheduledTask {
        let scheduled = ScheduledTask::new(delay);
        let token = scheduled.token();

        self.handle.spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    trace!(delay_ms = delay.as_millis() as u64, "scheduled task cancelled");
                }
                () = tokio::time::sleep(delay) => task.await,
            }
        });

        scheduled
    }
}
