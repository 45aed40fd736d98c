//! Cancellable scheduled work.
//!
//! A `ScheduledTask` is the explicit handle for something that will happen
//! later (the next poll, the end of an animation). Cancelling it is the only
//! way to invalidate the pending work; the task itself checks the handle at
//! its suspension points.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct ScheduledTask {
    token: CancellationToken,
}

impl ScheduledTask {
    pub fn new() -> Self { Self::default() }

    /// Runs `work` after `delay` on the current tokio runtime unless the
    /// returned handle is cancelled first.
    pub fn after<F>(delay: Duration, work: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let task = Self::new();
        let handle = task.clone();
        tokio::spawn(async move {
            if handle.sleep(delay).await { work.await; }
        });
        task
    }

    pub fn cancel(&self) { self.token.cancel(); }

    pub fn is_cancelled(&self) -> bool { self.token.is_cancelled() }

    /// Sleeps for `delay`. Returns `false` if the handle was cancelled before
    /// (or while) waiting.
    pub async fn sleep(&self, delay: Duration) -> bool {
        tokio::select! {
            _ = self.token.cancelled() => false,
            _ = tokio::time::sleep(delay) => !self.token.is_cancelled(),
        }
    }
}
