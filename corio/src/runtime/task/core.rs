use super::completion::Completion;
use super::state::{COMPLETED, DESTROYED, IDLE, NOTIFIED, RUNNING, SCHEDULED};
use crate::outcome::Outcome;
use crate::runtime::context::enter_context;
use crate::runtime::executor::Executor;

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Wake, Waker};

/// A suspended computation producing an [`Outcome`].
///
/// Panics are already turned into failures by the time a future becomes a
/// frame, so polling one never unwinds.
pub(crate) type BoxFrame<T> = Pin<Box<dyn Future<Output = Outcome<T>> + Send + 'static>>;

/// The driving half of a task: the frame plus its scheduling state.
///
/// A `Frame` is reachable from two places: the owning
/// [`Task`](super::Task), and every [`Waker`] handed out while polling. Only
/// the task may destroy the frame; wakers can only ask for it to be resumed.
pub(crate) struct Frame<T> {
    /// The frame itself. `None` once it returned or was destroyed.
    future: Mutex<Option<BoxFrame<T>>>,

    /// Scheduling state (IDLE, SCHEDULED, ...).
    state: AtomicUsize,

    /// Decides where each resumption runs.
    executor: Arc<dyn Executor>,

    /// Where the frame's outcome goes.
    completion: Arc<Completion<T>>,
}

impl<T> Frame<T> {
    /// Drops the frame on behalf of the owning task.
    ///
    /// If the frame is being polled right now, the poller drops it as soon
    /// as the poll returns; otherwise it is dropped here.
    pub(crate) fn destroy(&self) {
        match self.state.swap(DESTROYED, Ordering::AcqRel) {
            RUNNING | NOTIFIED => {}
            _ => self.release(),
        }
    }

    /// Drops the frame if it is still there.
    fn release(&self) {
        let frame = self.future.lock().unwrap().take();

        if frame.is_some() {
            tracing::trace!("task frame destroyed before completion");
        }
    }
}

impl<T: Send + Sync + 'static> Frame<T> {
    /// Creates a frame that is already scheduled for its first poll.
    ///
    /// The caller must hand it to [`schedule`](Self::schedule).
    pub(crate) fn new(
        future: BoxFrame<T>,
        executor: Arc<dyn Executor>,
        completion: Arc<Completion<T>>,
    ) -> Self {
        Self {
            future: Mutex::new(Some(future)),
            state: AtomicUsize::new(SCHEDULED),
            executor,
            completion,
        }
    }

    /// Hands one resumption of the frame to the executor.
    pub(crate) fn schedule(self: Arc<Self>) {
        let executor = self.executor.clone();
        executor.execute(Box::new(move || self.run()));
    }

    /// Resumes the frame until it suspends with nobody asking for more, or
    /// returns.
    ///
    /// - `Poll::Pending`: back to `IDLE`, unless a wake-up arrived during the
    ///   poll (`NOTIFIED`), in which case the frame is polled again right
    ///   away.
    /// - `Poll::Ready`: the outcome is stored and the task's callbacks run on
    ///   this thread.
    fn run(self: Arc<Self>) {
        // Also fails when the task was dropped while the job was queued.
        if self
            .state
            .compare_exchange(SCHEDULED, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let waker = Waker::from(self.clone());
        let mut cx = Context::from_waker(&waker);

        'poll: loop {
            let poll = enter_context(self.executor.clone(), || self.poll_frame(&mut cx));

            match poll {
                Poll::Ready(outcome) => {
                    self.state.store(COMPLETED, Ordering::Release);
                    self.completion.complete(outcome);
                    return;
                }
                Poll::Pending => loop {
                    match self.state.compare_exchange(
                        RUNNING,
                        IDLE,
                        Ordering::AcqRel,
                        Ordering::Acquire,
                    ) {
                        Ok(_) => return,
                        Err(NOTIFIED) => {
                            if self
                                .state
                                .compare_exchange(
                                    NOTIFIED,
                                    RUNNING,
                                    Ordering::AcqRel,
                                    Ordering::Acquire,
                                )
                                .is_ok()
                            {
                                continue 'poll;
                            }
                        }
                        Err(_) => {
                            // DESTROYED while we were polling.
                            self.release();
                            return;
                        }
                    }
                },
            }
        }
    }

    /// Polls the frame once. A frame that returns is dropped on the spot.
    fn poll_frame(&self, cx: &mut Context<'_>) -> Poll<Outcome<T>> {
        let mut slot = self.future.lock().unwrap();

        let Some(future) = slot.as_mut() else {
            return Poll::Pending;
        };

        match future.as_mut().poll(cx) {
            Poll::Ready(outcome) => {
                *slot = None;
                Poll::Ready(outcome)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T: Send + Sync + 'static> Wake for Frame<T> {
    /// Asks for the frame to be resumed.
    ///
    /// If the frame is `IDLE`, it moves to `SCHEDULED` and a job is handed to
    /// the executor. If it is `RUNNING`, it moves to `NOTIFIED` so the poller
    /// goes around once more. In every other state the wake-up is dropped.
    fn wake(self: Arc<Self>) {
        loop {
            match self.state.load(Ordering::Acquire) {
                IDLE => {
                    if self
                        .state
                        .compare_exchange(IDLE, SCHEDULED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        self.schedule();
                        return;
                    }
                }
                RUNNING => {
                    if self
                        .state
                        .compare_exchange(RUNNING, NOTIFIED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                // Already scheduled, already notified, finished or destroyed.
                _ => return,
            }
        }
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.clone().wake();
    }
}
