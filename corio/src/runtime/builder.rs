use super::Runtime;
use super::executor::{Executor, InlineExecutor, ThreadExecutor};

use std::sync::Arc;

/// Builder for configuring and creating a runtime.
///
/// `RuntimeBuilder` chooses how suspended frames are resumed: inline on the
/// thread that released them (the default), on a fresh thread per
/// resumption, or through any user-provided [`Executor`].
///
/// # Examples
///
/// ```rust,ignore
/// let runtime = RuntimeBuilder::new()
///     .thread_per_task()
///     .thread_name("corio-worker")
///     .build();
/// ```
pub struct RuntimeBuilder {
    /// Selected dispatch.
    dispatch: Dispatch,

    /// Name of threads spawned by the thread-per-task dispatch.
    thread_name: Option<String>,

    /// Stack size of threads spawned by the thread-per-task dispatch.
    thread_stack_size: Option<usize>,
}

enum Dispatch {
    Inline,
    ThreadPerTask,
    Custom(Arc<dyn Executor>),
}

impl RuntimeBuilder {
    /// Creates a new `RuntimeBuilder` with inline dispatch.
    pub fn new() -> Self {
        Self {
            dispatch: Dispatch::Inline,
            thread_name: None,
            thread_stack_size: None,
        }
    }

    /// Resumes frames on the thread that releases them.
    pub fn inline(mut self) -> Self {
        self.dispatch = Dispatch::Inline;
        self
    }

    /// Resumes every frame on a newly spawned thread.
    pub fn thread_per_task(mut self) -> Self {
        self.dispatch = Dispatch::ThreadPerTask;
        self
    }

    /// Names the threads spawned by [`thread_per_task`](Self::thread_per_task).
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = Some(name.into());
        self
    }

    /// Sets the stack size of the threads spawned by
    /// [`thread_per_task`](Self::thread_per_task).
    ///
    /// # Panics
    ///
    /// Panics if `bytes == 0`.
    pub fn thread_stack_size(mut self, bytes: usize) -> Self {
        assert!(bytes > 0, "thread_stack_size must be > 0");

        self.thread_stack_size = Some(bytes);
        self
    }

    /// Resumes frames through `executor`.
    pub fn executor(mut self, executor: impl Executor) -> Self {
        self.dispatch = Dispatch::Custom(Arc::new(executor));
        self
    }

    /// Builds the runtime with the configured options.
    pub fn build(self) -> Runtime {
        let executor: Arc<dyn Executor> = match self.dispatch {
            Dispatch::Inline => Arc::new(InlineExecutor),
            Dispatch::ThreadPerTask => {
                let mut executor = ThreadExecutor::new();

                if let Some(name) = self.thread_name {
                    executor = executor.name(name);
                }
                if let Some(bytes) = self.thread_stack_size {
                    executor = executor.stack_size(bytes);
                }

                Arc::new(executor)
            }
            Dispatch::Custom(executor) => executor,
        };

        Runtime::new(executor)
    }
}

impl Default for RuntimeBuilder {
    /// Creates a default `RuntimeBuilder`.
    fn default() -> Self {
        Self::new()
    }
}
