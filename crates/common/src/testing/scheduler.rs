//! Deterministic scheduler for tests
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use vsme_common::testing::ManualScheduler;
//! use vsme_common::time::TaskScheduler;
//!
//! # tokio_test::block_on(async {
//! let scheduler = ManualScheduler::new();
//! scheduler.schedule(Duration::from_secs(1), Box::pin(async {}));
//! assert_eq!(scheduler.pending_count(), 1);
//!
//! assert!(scheduler.run_next().await);
//! assert_eq!(scheduler.scheduled_delays(), vec![Duration::from_secs(1)]);
//! # });
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::time::{ScheduledTask, TaskFuture, TaskScheduler};

struct PendingTask {
    handle: ScheduledTask,
    task: TaskFuture,
}

#[derive(Default)]
struct ManualState {
    pending: VecDeque<PendingTask>,
    history: Vec<Duration>,
}

/// Scheduler that never sleeps: tasks queue up in FIFO order and run only
/// when the test calls [`ManualScheduler::run_next`].
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Every delay ever requested, in scheduling order
    pub fn scheduled_delays(&self) -> Vec<Duration> {
        self.state.lock().history.clone()
    }

    /// Number of queued tasks that have not been cancelled
    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.iter().filter(|p| !p.handle.is_cancelled()).count()
    }

    /// Run the oldest non-cancelled task to completion.
    ///
    /// Returns `false` when nothing was left to run.
    pub async fn run_next(&self) -> bool {
        loop {
            let next = self.state.lock().pending.pop_front();
            match next {
                Some(pending) if pending.handle.is_cancelled() => continue,
                Some(pending) => {
                    pending.task.await;
                    return true;
                }
                None => return false,
            }
        }
    }

    /// Run tasks (including ones scheduled while running) until none remain.
    ///
    /// Returns the number of tasks that ran.
    pub async fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.run_next().await {
            ran += 1;
        }
        ran
    }
}

impl TaskScheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: TaskFuture) -> ScheduledTask {
        let handle = ScheduledTask::new(delay);
        let mut state = self.state.lock();
        state.history.push(delay);
        state.pending.push_back(PendingTask { handle: handle.clone(), task });
        handle
    }
}
