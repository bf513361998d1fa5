use futures::task::AtomicWaker;

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::ptr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};
use std::task::{Context, Poll};

/// State value meaning "set". Never dereferenced; no waiter node can live at
/// this address.
const SET: *mut Waiter = ptr::dangling_mut();

/// A broadcast event that any number of frames can wait on.
///
/// The event is either *set* or *not set*. While not set, waiting frames
/// suspend; [`set`](Self::set) releases all of them at once and every later
/// wait completes immediately until the event is [`reset`](Self::reset).
///
/// The whole state is one atomic pointer:
/// - null: not set, nobody waiting,
/// - the `SET` sentinel: set,
/// - anything else: not set, head of a stack of waiter nodes.
///
/// Waiting on an event that is already set neither allocates nor locks.
///
/// # Examples
///
/// ```rust,ignore
/// let event = Arc::new(BroadcastEvent::new(false));
///
/// let waiter = corio::spawn({
///     let event = event.clone();
///     async move {
///         event.wait().await;
///         "released"
///     }
/// });
///
/// event.set();
/// assert_eq!(waiter.get_result().unwrap(), "released");
/// ```
pub struct BroadcastEvent {
    state: AtomicPtr<Waiter>,
}

/// One suspended wait, linked into the event's waiter stack.
struct Waiter {
    /// Waker of the frame to resume.
    waker: AtomicWaker,

    /// Set once [`BroadcastEvent::set`] has dequeued this node.
    released: AtomicBool,

    /// Next node in the stack. Written before the node is published and
    /// read only by the thread that swapped the list out.
    next: AtomicPtr<Waiter>,
}

impl Waiter {
    fn release(&self) {
        self.released.store(true, Ordering::Release);
        self.waker.wake();
    }
}

impl BroadcastEvent {
    /// Creates an event, optionally already set.
    pub fn new(initially_set: bool) -> Self {
        let state = if initially_set { SET } else { ptr::null_mut() };

        Self {
            state: AtomicPtr::new(state),
        }
    }

    /// Returns `true` if the event is currently set.
    pub fn is_set(&self) -> bool {
        self.state.load(Ordering::Acquire) == SET
    }

    /// Sets the event and resumes every frame waiting on it.
    ///
    /// Waiters are released in no particular order, each exactly once, on
    /// the calling thread. Setting an event that is already set does nothing.
    pub fn set(&self) {
        let mut head = self.state.swap(SET, Ordering::AcqRel);

        if head == SET {
            return;
        }

        let mut released = 0usize;

        // The swap handed the whole list to this thread.
        while !head.is_null() {
            let node = unsafe { Arc::from_raw(head) };
            head = node.next.load(Ordering::Acquire);

            node.release();
            released += 1;
        }

        tracing::trace!(released, "broadcast event set");
    }

    /// Moves the event back to "not set".
    ///
    /// Does nothing if the event is not set.
    ///
    /// The caller must make sure no frame is registering a wait while the
    /// event is being reset: a registration that observed the old "set"
    /// state races with this call and its wake-up can be lost.
    pub fn reset(&self) {
        let _ = self.state.compare_exchange(
            SET,
            ptr::null_mut(),
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Returns a future that completes once the event is set.
    pub fn wait(&self) -> EventWait<'_> {
        EventWait {
            event: self,
            node: None,
        }
    }

    /// Pushes `node` onto the waiter stack.
    ///
    /// Returns `false` without queuing anything if the event is set.
    fn enqueue(&self, node: &Arc<Waiter>) -> bool {
        let raw = Arc::into_raw(node.clone()) as *mut Waiter;
        let mut current = self.state.load(Ordering::Acquire);

        loop {
            if current == SET {
                drop(unsafe { Arc::from_raw(raw) });
                return false;
            }

            node.next.store(current, Ordering::Relaxed);

            match self.state.compare_exchange_weak(
                current,
                raw,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for BroadcastEvent {
    /// Returns an event that is not set.
    fn default() -> Self {
        Self::new(false)
    }
}

impl Drop for BroadcastEvent {
    /// Frees the nodes of waits that never got released.
    fn drop(&mut self) {
        let mut head = *self.state.get_mut();

        if head == SET {
            return;
        }

        while !head.is_null() {
            let node = unsafe { Arc::from_raw(head) };
            head = node.next.load(Ordering::Acquire);
        }
    }
}

impl<'a> IntoFuture for &'a BroadcastEvent {
    type Output = ();
    type IntoFuture = EventWait<'a>;

    fn into_future(self) -> Self::IntoFuture {
        self.wait()
    }
}

/// Future returned by [`BroadcastEvent::wait`].
///
/// Dropping it while queued is allowed. The node stays linked until the next
/// `set` frees it, but its waker is dropped right away so the waiting frame
/// is not kept alive by an event that may never be set.
pub struct EventWait<'a> {
    event: &'a BroadcastEvent,
    node: Option<Arc<Waiter>>,
}

impl Drop for EventWait<'_> {
    fn drop(&mut self) {
        if let Some(node) = &self.node {
            // `set` may be waking it concurrently; either way nothing is lost.
            drop(node.waker.take());
        }
    }
}

impl Future for EventWait<'_> {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if let Some(node) = &self.node {
            if node.released.load(Ordering::Acquire) {
                return Poll::Ready(());
            }

            // Register before re-checking so a concurrent `set` is not missed.
            node.waker.register(cx.waker());

            if node.released.load(Ordering::Acquire) {
                return Poll::Ready(());
            }

            return Poll::Pending;
        }

        if self.event.is_set() {
            return Poll::Ready(());
        }

        let node = Arc::new(Waiter {
            waker: AtomicWaker::new(),
            released: AtomicBool::new(false),
            next: AtomicPtr::new(ptr::null_mut()),
        });
        node.waker.register(cx.waker());

        if !self.event.enqueue(&node) {
            return Poll::Ready(());
        }

        self.node = Some(node);
        Poll::Pending
    }
}
