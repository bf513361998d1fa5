use crate::error::Failure;
use crate::outcome::Outcome;

use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

/// A callback waiting for a task's outcome.
pub(crate) type Callback<T> = Box<dyn FnOnce(&Outcome<T>) + Send + 'static>;

/// The single-assignment result slot shared by a task, its frame and its
/// promise.
///
/// Both the outcome and the callback queue live under one mutex: whoever
/// takes the lock sees either "unset, here are the pending callbacks" or
/// "set, the queue is empty", never a mix.
pub(crate) struct Completion<T> {
    /// Outcome and pending callbacks.
    inner: Mutex<Inner<T>>,

    /// Signalled once when the outcome is stored.
    completed: Condvar,
}

struct Inner<T> {
    /// Stays `Unset` until completion. Shared so callbacks can read it after
    /// the lock is released.
    outcome: Arc<Outcome<T>>,

    /// Callbacks registered before completion.
    callbacks: Vec<Callback<T>>,
}

impl<T> Completion<T> {
    /// Creates an empty slot.
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                outcome: Arc::new(Outcome::Unset),
                callbacks: Vec::new(),
            }),
            completed: Condvar::new(),
        }
    }

    /// Returns `true` once an outcome is stored.
    pub(crate) fn is_completed(&self) -> bool {
        !self.inner.lock().unwrap().outcome.is_unset()
    }

    /// Stores the outcome, wakes blocked readers and runs every queued
    /// callback once.
    ///
    /// The queue is drained under the lock; the callbacks themselves run
    /// after it is released so they may read the task again.
    ///
    /// # Panics
    ///
    /// Panics if the slot was already completed, or if `outcome` is unset.
    pub(crate) fn complete(&self, outcome: Outcome<T>) {
        assert!(!outcome.is_unset(), "completed a task with an unset outcome");

        let (callbacks, outcome) = {
            let mut inner = self.inner.lock().unwrap();

            if !inner.outcome.is_unset() {
                drop(inner);
                panic!("task completed twice");
            }

            inner.outcome = Arc::new(outcome);
            self.completed.notify_all();

            (mem::take(&mut inner.callbacks), inner.outcome.clone())
        };

        tracing::trace!(
            failed = outcome.is_failure(),
            callbacks = callbacks.len(),
            "task completed"
        );

        // A panicking callback must not rob the others of their call.
        let mut first_panic = None;

        for callback in callbacks {
            let result = panic::catch_unwind(AssertUnwindSafe(|| callback(&outcome)));

            if let Err(payload) = result {
                tracing::error!("task completion callback panicked");
                first_panic.get_or_insert(payload);
            }
        }

        // Completing from a destructor during unwinding (a dropped promise)
        // must not start a second panic, which would abort.
        if let Some(payload) = first_panic {
            if thread::panicking() {
                tracing::error!("callback panic swallowed, thread is already unwinding");
                return;
            }

            panic::resume_unwind(payload);
        }
    }

    /// Runs `callback` with the outcome: now if the slot is completed,
    /// otherwise when it completes.
    pub(crate) fn subscribe(&self, callback: Callback<T>) {
        let outcome = {
            let mut inner = self.inner.lock().unwrap();

            if inner.outcome.is_unset() {
                inner.callbacks.push(callback);
                return;
            }

            inner.outcome.clone()
        };

        callback(&outcome);
    }

    /// Blocks the calling thread until the slot is completed.
    pub(crate) fn wait(&self) -> Result<T, Failure>
    where
        T: Clone,
    {
        let mut inner = self.inner.lock().unwrap();

        while inner.outcome.is_unset() {
            inner = self.completed.wait(inner).unwrap();
        }

        inner.outcome.get_or_raise()
    }

    /// Returns the outcome if the slot is completed, without blocking.
    pub(crate) fn try_get(&self) -> Option<Result<T, Failure>>
    where
        T: Clone,
    {
        let inner = self.inner.lock().unwrap();

        if inner.outcome.is_unset() {
            return None;
        }

        Some(inner.outcome.get_or_raise())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    #[should_panic(expected = "task completed twice")]
    fn completing_twice_panics() {
        let completion = Completion::new();

        completion.complete(Outcome::Value(1));
        completion.complete(Outcome::Value(2));
    }

    #[test]
    fn panicking_callback_does_not_starve_the_others() {
        let completion = Completion::new();
        let calls = Arc::new(AtomicUsize::new(0));

        completion.subscribe(Box::new(|_: &Outcome<i32>| panic!("first callback")));

        let counter = calls.clone();
        completion.subscribe(Box::new(move |_: &Outcome<i32>| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            completion.complete(Outcome::Value(3));
        }));

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(completion.try_get().unwrap().unwrap(), 3);
    }

    #[test]
    fn late_subscriber_runs_immediately() {
        let completion = Completion::new();
        completion.complete(Outcome::Value("done"));

        let seen = Arc::new(Mutex::new(None));
        let slot = seen.clone();

        completion.subscribe(Box::new(move |outcome: &Outcome<&'static str>| {
            *slot.lock().unwrap() = outcome.value().copied();
        }));

        assert_eq!(*seen.lock().unwrap(), Some("done"));
    }
}
