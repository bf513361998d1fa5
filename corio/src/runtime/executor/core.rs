/// A unit of work handed to an [`Executor`]: one resumption of a frame.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Decides on which thread a frame is resumed.
///
/// Implementations must run every job they receive exactly once. They may
/// run it before `execute` returns.
///
/// Any `Fn(Job)` closure is an executor:
///
/// ```rust,ignore
/// let runtime = RuntimeBuilder::new()
///     .executor(|job: Job| {
///         std::thread::spawn(job);
///     })
///     .build();
/// ```
pub trait Executor: Send + Sync + 'static {
    /// Runs `job`, now or later, on a thread of the executor's choosing.
    fn execute(&self, job: Job);
}

impl<F> Executor for F
where
    F: Fn(Job) + Send + Sync + 'static,
{
    fn execute(&self, job: Job) {
        self(job)
    }
}
