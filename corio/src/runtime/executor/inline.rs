use super::{Executor, Job};

/// Runs every job immediately on the calling thread.
///
/// With this executor a frame resumes on whichever thread released it: the
/// thread that completed the awaited task, or the one that set the event.
/// This is the default dispatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn execute(&self, job: Job) {
        job();
    }
}
