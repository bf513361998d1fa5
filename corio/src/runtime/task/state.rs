//! Scheduling states of a task frame.
//!
//! These only track who may poll the frame. Whether the task has a result is
//! answered by its [`Completion`](super::completion::Completion).

/// Frame is suspended and nobody has asked to resume it.
pub(crate) const IDLE: usize = 0;

/// A job resuming the frame has been handed to the executor.
pub(crate) const SCHEDULED: usize = 1;

/// The frame is being polled.
///
/// At most one thread observes this state at a time.
pub(crate) const RUNNING: usize = 2;

/// The frame was woken while being polled.
///
/// The poller polls it again before going back to `IDLE`.
pub(crate) const NOTIFIED: usize = 3;

/// The frame returned; it has been dropped and the task completed.
pub(crate) const COMPLETED: usize = 4;

/// The owning [`Task`](super::Task) was dropped before the frame returned.
///
/// The frame has been, or is about to be, dropped without completing.
pub(crate) const DESTROYED: usize = 5;
