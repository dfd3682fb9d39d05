// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Background task handle with cooperative, cancel-on-drop semantics.

use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Handle to a spawned background task.
///
/// The spawned future receives a [`CancellationToken`] and is expected to
/// observe it at its suspension points; dropping the handle (or calling
/// [`cancel`](BackgroundTask::cancel)) signals the token. Cancellation is
/// cooperative: the task is never aborted mid-poll, it exits at its next
/// checkpoint.
///
/// # Example
///
/// ```
/// use streamcast_core::BackgroundTask;
///
/// # #[tokio::main]
/// # async fn main() {
/// let task = BackgroundTask::spawn(|cancel| async move {
///     cancel.cancelled().await;
/// });
/// task.cancel();
/// # }
/// ```
#[derive(Debug)]
pub struct BackgroundTask {
    cancel: CancellationToken,
}

impl BackgroundTask {
    /// Spawn `f` on the current tokio runtime, handing it a fresh token.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        tokio::spawn(f(cancel.clone()));
        Self { cancel }
    }

    /// Signal cancellation without waiting for the task to exit.
    ///
    /// Idempotent; the task stops at its next cancellation checkpoint.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for BackgroundTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
