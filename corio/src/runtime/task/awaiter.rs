use super::Task;
use crate::error::Failure;

use futures::task::AtomicWaker;

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Future returned by awaiting a [`Task`].
///
/// The awaiter takes ownership of the task. On its first pending poll it
/// registers itself as a continuation of the task; once the task completes,
/// the awaiting frame is woken on the completing thread and reads the
/// outcome, which is then available without blocking.
///
/// Dropping the awaiter drops the task, and with it the task's frame.
pub struct TaskAwaiter<T> {
    /// The task being awaited.
    task: Task<T>,

    /// Waker of the awaiting frame, refreshed on every poll.
    waker: Arc<AtomicWaker>,

    /// Whether the continuation has been registered with the task.
    registered: bool,
}

impl<T: Clone + Send + Sync + 'static> Future for TaskAwaiter<T> {
    type Output = Result<T, Failure>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.task.is_completed() {
            return Poll::Ready(self.task.get_result());
        }

        self.waker.register(cx.waker());

        if !self.registered {
            self.registered = true;

            let waker = self.waker.clone();
            self.task.finally(move || waker.wake());
        }

        // The task may have completed between the first check and the
        // registration.
        if self.task.is_completed() {
            return Poll::Ready(self.task.get_result());
        }

        Poll::Pending
    }
}

impl<T: Clone + Send + Sync + 'static> IntoFuture for Task<T> {
    type Output = Result<T, Failure>;
    type IntoFuture = TaskAwaiter<T>;

    /// Suspends the awaiting frame until this task completes.
    fn into_future(self) -> Self::IntoFuture {
        TaskAwaiter {
            task: self,
            waker: Arc::new(AtomicWaker::new()),
            registered: false,
        }
    }
}
