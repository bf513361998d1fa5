use super::completion::Completion;
use super::core::{BoxFrame, Frame};
use super::promise::Promise;
use crate::error::Failure;
use crate::outcome::Outcome;
use crate::runtime::executor::Executor;

use std::fmt;
use std::sync::Arc;

/// A single-assignment asynchronous result.
///
/// A `Task` is the owning handle of a computation: either a frame spawned
/// with [`spawn`](super::spawn) and friends, or a [`Promise`] held by some
/// producer. The result can be read by blocking
/// ([`get_result`](Self::get_result)), through callbacks
/// ([`on_completed`](Self::on_completed), [`then`](Self::then), ...), or by
/// awaiting the task from another frame.
///
/// A task is moved, never copied. Dropping it drops its frame, even if the
/// frame never ran to completion. Callbacks that were already registered
/// still fire if the outcome arrives.
pub struct Task<T> {
    /// Result slot, shared with the frame or the promise.
    completion: Arc<Completion<T>>,

    /// The frame this task owns, if it was spawned.
    frame: Option<Arc<Frame<T>>>,
}

impl<T: Send + Sync + 'static> Task<T> {
    /// Wraps `frame` into a task and schedules its first poll on `executor`.
    ///
    /// With an inline executor the frame runs up to its first suspension
    /// before this returns.
    pub(crate) fn from_frame(frame: BoxFrame<T>, executor: Arc<dyn Executor>) -> Self {
        let completion = Arc::new(Completion::new());
        let frame = Arc::new(Frame::new(frame, executor, completion.clone()));

        frame.clone().schedule();

        Self {
            completion,
            frame: Some(frame),
        }
    }

    /// Creates a task completed by hand through the returned [`Promise`].
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let (promise, task) = Task::pending();
    ///
    /// std::thread::spawn(move || promise.set_value(7));
    ///
    /// assert_eq!(task.get_result().unwrap(), 7);
    /// ```
    pub fn pending() -> (Promise<T>, Task<T>) {
        let completion = Arc::new(Completion::new());
        let promise = Promise::new(completion.clone());

        (
            promise,
            Self {
                completion,
                frame: None,
            },
        )
    }

    /// Creates a task that already holds `value`.
    pub fn ready(value: T) -> Self {
        let (promise, task) = Self::pending();
        promise.set_value(value);
        task
    }

    /// Creates a task that already holds `failure`.
    pub fn failed(failure: Failure) -> Self {
        let (promise, task) = Self::pending();
        promise.set_failure(failure);
        task
    }

    /// Returns `true` once the task holds a value or a failure.
    pub fn is_completed(&self) -> bool {
        self.completion.is_completed()
    }

    /// Blocks the calling thread until the task completes, then returns the
    /// value or re-raises the captured failure.
    ///
    /// Every call returns the same outcome. Calling this from inside a frame
    /// blocks the thread that polls it; await the task instead.
    pub fn get_result(&self) -> Result<T, Failure>
    where
        T: Clone,
    {
        self.completion.wait()
    }

    /// Returns the outcome if the task has completed, without blocking.
    pub fn try_result(&self) -> Option<Result<T, Failure>>
    where
        T: Clone,
    {
        self.completion.try_get()
    }

    /// Registers a callback receiving the task's [`Outcome`].
    ///
    /// If the task has already completed, `callback` runs on the calling
    /// thread before this returns. Otherwise it runs once, on the thread
    /// that completes the task.
    ///
    /// # Panics
    ///
    /// A panic in `callback` does not stop the other callbacks; the first one
    /// is re-raised on the completing thread once they have all run. When
    /// the task is completed by a [`Promise`] dropped during unwinding, the
    /// panic is logged and swallowed instead.
    pub fn on_completed<F>(&self, callback: F)
    where
        T: Clone,
        F: FnOnce(Outcome<T>) + Send + 'static,
    {
        self.completion
            .subscribe(Box::new(move |outcome: &Outcome<T>| callback(outcome.clone())));
    }

    /// Registers a callback receiving the value, if the task succeeds.
    pub fn then<F>(&self, callback: F)
    where
        T: Clone,
        F: FnOnce(T) + Send + 'static,
    {
        self.completion.subscribe(Box::new(move |outcome: &Outcome<T>| {
            if let Outcome::Value(value) = outcome {
                callback(value.clone());
            }
        }));
    }

    /// Registers a callback receiving the failure, if the task fails.
    pub fn catching<F>(&self, callback: F)
    where
        F: FnOnce(Failure) + Send + 'static,
    {
        self.completion.subscribe(Box::new(move |outcome: &Outcome<T>| {
            if let Outcome::Failure(failure) = outcome {
                callback(failure.clone());
            }
        }));
    }

    /// Registers a callback run on completion, whatever the outcome.
    pub fn finally<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.completion.subscribe(Box::new(move |_: &Outcome<T>| callback()));
    }
}

impl<T> Drop for Task<T> {
    /// Destroys the owned frame, if any.
    fn drop(&mut self) {
        if let Some(frame) = self.frame.take() {
            frame.destroy();
        }
    }
}

impl<T> fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("completed", &self.completion.is_completed())
            .field("spawned", &self.frame.is_some())
            .finish()
    }
}
