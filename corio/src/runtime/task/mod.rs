//! Tasks: single-assignment results produced by suspendable frames.
//!
//! This module defines:
//! - [`Task`], the owning handle of a computation and its result,
//! - [`Promise`], the producer side of a task completed by hand,
//! - [`TaskAwaiter`], the future through which one frame awaits a task,
//! - [`spawn`] and [`try_spawn`], which turn a future into a task.
//!
//! Frames start eagerly: spawning hands the first poll to the executor
//! right away. Tasks spawned from inside a frame use that frame's executor;
//! elsewhere they run inline on the calling thread. Use
//! [`Runtime`](crate::Runtime) to pick the executor explicitly.

pub(crate) mod awaiter;
pub(crate) mod completion;
pub(crate) mod core;
pub(crate) mod handle;
pub(crate) mod promise;
pub(crate) mod state;

pub use awaiter::TaskAwaiter;
pub use handle::Task;
pub use promise::Promise;

use crate::error::Failure;
use crate::outcome::Outcome;
use crate::runtime::context::current_executor;
use crate::runtime::executor::Executor;

use futures::FutureExt;

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Spawns `future` as a task on the current executor.
///
/// A panic inside the frame is captured as the task's [`Failure`].
///
/// # Examples
///
/// ```rust,ignore
/// let task = corio::spawn(async { 40 + 2 });
/// assert_eq!(task.get_result().unwrap(), 42);
/// ```
pub fn spawn<F, T>(future: F) -> Task<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + Sync + 'static,
{
    spawn_on(current_executor(), future)
}

/// Spawns a fallible `future` as a task on the current executor.
///
/// An `Err` returned by the frame becomes the task's [`Failure`], as does a
/// panic.
pub fn try_spawn<F, T, E>(future: F) -> Task<T>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + Sync + 'static,
    E: Into<anyhow::Error> + 'static,
{
    try_spawn_on(current_executor(), future)
}

pub(crate) fn spawn_on<F, T>(executor: Arc<dyn Executor>, future: F) -> Task<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + Sync + 'static,
{
    let frame = AssertUnwindSafe(future)
        .catch_unwind()
        .map(|result| match result {
            Ok(value) => Outcome::Value(value),
            Err(payload) => Outcome::Failure(Failure::from_panic(payload)),
        });

    Task::from_frame(Box::pin(frame), executor)
}

pub(crate) fn try_spawn_on<F, T, E>(executor: Arc<dyn Executor>, future: F) -> Task<T>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + Sync + 'static,
    E: Into<anyhow::Error> + 'static,
{
    let frame = AssertUnwindSafe(future)
        .catch_unwind()
        .map(|result| match result {
            Ok(Ok(value)) => Outcome::Value(value),
            Ok(Err(error)) => Outcome::Failure(Failure::new(error)),
            Err(payload) => Outcome::Failure(Failure::from_panic(payload)),
        });

    Task::from_frame(Box::pin(frame), executor)
}
