use super::{Executor, Job};

use std::sync::{Arc, Mutex};
use std::thread;

/// Runs every job on a newly spawned OS thread.
///
/// Each resumption of a frame gets its own short-lived thread. This is not a
/// pool: it exists for frames that must not run on the thread that released
/// them.
#[derive(Debug, Clone, Default)]
pub struct ThreadExecutor {
    /// Name given to spawned threads.
    name: Option<String>,

    /// Stack size of spawned threads, in bytes.
    stack_size: Option<usize>,
}

impl ThreadExecutor {
    /// Creates an executor spawning unnamed threads with the default stack
    /// size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the spawned threads.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the stack size of the spawned threads.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

impl Executor for ThreadExecutor {
    /// Spawns a thread for `job`.
    ///
    /// If the OS refuses to create the thread, the job runs inline so that
    /// the frame is not lost.
    fn execute(&self, job: Job) {
        let mut builder = thread::Builder::new();

        if let Some(name) = &self.name {
            builder = builder.name(name.clone());
        }
        if let Some(bytes) = self.stack_size {
            builder = builder.stack_size(bytes);
        }

        // `spawn` consumes the closure even on failure, so the job is parked
        // in a slot we can take back.
        let slot = Arc::new(Mutex::new(Some(job)));
        let theirs = slot.clone();

        let spawned = builder.spawn(move || {
            let job = theirs.lock().unwrap().take();

            if let Some(job) = job {
                job();
            }
        });

        if let Err(err) = spawned {
            tracing::error!(error = %err, "failed to spawn executor thread, running job inline");

            let job = slot.lock().unwrap().take();

            if let Some(job) = job {
                job();
            }
        }
    }
}
