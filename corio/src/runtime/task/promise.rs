use super::completion::Completion;
use crate::error::{Abandoned, Failure};
use crate::outcome::Outcome;

use std::fmt;
use std::sync::Arc;

/// The producer side of a [`Task`](super::Task) created with
/// [`Task::pending`](super::Task::pending).
///
/// A promise completes its task exactly once: both completion methods
/// consume it. Dropping a promise without completing it fails the task with
/// [`Abandoned`], so readers are never left blocked forever.
pub struct Promise<T> {
    /// `None` once the promise has been fulfilled.
    completion: Option<Arc<Completion<T>>>,
}

impl<T> Promise<T> {
    pub(crate) fn new(completion: Arc<Completion<T>>) -> Self {
        Self {
            completion: Some(completion),
        }
    }

    /// Completes the task with `value`.
    pub fn set_value(self, value: T) {
        self.complete(Outcome::Value(value));
    }

    /// Completes the task with `failure`.
    pub fn set_failure(self, failure: Failure) {
        self.complete(Outcome::Failure(failure));
    }

    /// Completes the task from a `Result`.
    pub fn set_result<E>(self, result: Result<T, E>)
    where
        E: Into<anyhow::Error>,
    {
        match result {
            Ok(value) => self.set_value(value),
            Err(error) => self.set_failure(Failure::new(error)),
        }
    }

    fn complete(mut self, outcome: Outcome<T>) {
        if let Some(completion) = self.completion.take() {
            completion.complete(outcome);
        }
    }
}

impl<T> Drop for Promise<T> {
    fn drop(&mut self) {
        if let Some(completion) = self.completion.take() {
            tracing::debug!("promise dropped without a value, failing its task");
            completion.complete(Outcome::Failure(Failure::new(Abandoned)));
        }
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("fulfilled", &self.completion.is_none())
            .finish()
    }
}
