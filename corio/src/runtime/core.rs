use super::executor::Executor;
use super::task::{self, Task};
use crate::error::Failure;

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// The runtime handle.
///
/// A `Runtime` is nothing more than a dispatch policy: it owns the
/// [`Executor`] its tasks are resumed on. It does not own threads or queues
/// of its own, and dropping it leaves running tasks alone.
///
/// Build one with [`RuntimeBuilder`](crate::RuntimeBuilder).
#[derive(Clone)]
pub struct Runtime {
    /// Executor handed to every task spawned through this runtime.
    executor: Arc<dyn Executor>,
}

impl Runtime {
    /// Creates a runtime dispatching on `executor`.
    pub(crate) fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }

    /// Returns the executor tasks of this runtime are resumed on.
    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.executor
    }

    /// Spawns a future as a task of this runtime.
    ///
    /// Tasks spawned from inside the frame inherit the runtime's executor.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let task = runtime.spawn(async { 1 + 1 });
    /// assert_eq!(task.get_result().unwrap(), 2);
    /// ```
    pub fn spawn<F, T>(&self, future: F) -> Task<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + Sync + 'static,
    {
        task::spawn_on(self.executor.clone(), future)
    }

    /// Spawns a fallible future as a task of this runtime.
    pub fn try_spawn<F, T, E>(&self, future: F) -> Task<T>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + Sync + 'static,
        E: Into<anyhow::Error> + 'static,
    {
        task::try_spawn_on(self.executor.clone(), future)
    }

    /// Runs a future to completion, blocking the current thread.
    ///
    /// This is the synchronous entry point of the runtime, used by
    /// `#[corio::main]` and `#[corio::test]`. A panic or failure of the
    /// frame is returned as `Err`. Unlike [`Task::get_result`], the value is
    /// moved out, so `T` need not be `Clone`.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let result = runtime.block_on(async {
    ///     42
    /// });
    /// assert_eq!(result.unwrap(), 42);
    /// ```
    pub fn block_on<F, T>(&self, future: F) -> Result<T, Failure>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let slot = Arc::new(Mutex::new(None));
        let output = slot.clone();

        let task = self.spawn(async move {
            let value = future.await;
            *output.lock().unwrap() = Some(value);
        });

        task.get_result()?;

        let value = slot.lock().unwrap().take();
        value.ok_or_else(|| Failure::msg("block_on frame returned without a value"))
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime").finish_non_exhaustive()
    }
}
