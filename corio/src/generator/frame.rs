use super::Sequence;
use crate::error::{Error, Failure, Stalled};

use futures::FutureExt;
use futures::task::noop_waker_ref;

use std::cell::Cell;
use std::fmt;
use std::future::Future;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

/// Body of a generator, already mapped to a `Result`.
type GeneratorFrame = Pin<Box<dyn Future<Output = Result<(), Failure>> + 'static>>;

/// Slot a suspended body leaves its value in.
type YieldSlot<T> = Rc<Cell<Option<T>>>;

/// A lazy sequence produced by a suspendable body.
///
/// The body is an `async` block receiving a [`Co`] handle. Each
/// `co.yield_(value).await` hands one value out and suspends the body until
/// the consumer asks for the next one. Nothing runs until the first
/// [`has_next`](Sequence::has_next).
///
/// Generators are single-pass and single-threaded: once drained they stay
/// exhausted, and dropping one drops its body wherever it was suspended.
///
/// # Examples
///
/// ```rust,ignore
/// let fibonacci = Generator::new(|co| async move {
///     let (mut a, mut b) = (0u64, 1u64);
///     loop {
///         co.yield_(a).await;
///         (a, b) = (b, a + b);
///     }
/// });
///
/// let first: Vec<u64> = fibonacci.take(10).collect().unwrap();
/// assert_eq!(first, [0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);
/// ```
pub struct Generator<T> {
    /// The suspended body. `None` once it returned, failed or stalled.
    frame: Option<GeneratorFrame>,

    /// Written by [`Co::yield_`] while the body is being resumed.
    slot: YieldSlot<T>,

    /// Produced but not yet consumed.
    held: Held<T>,

    /// Whether the body has been resumed at least once.
    started: bool,
}

/// What a resumption left for the consumer.
enum Held<T> {
    Empty,
    Value(T),
    Failure(Failure),
}

/// Where a [`Generator`] stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    /// The body has not run yet.
    NotStarted,

    /// A value, or a failure, is waiting to be pulled.
    Ready,

    /// The body is suspended and must be resumed to produce the next value.
    Suspended,

    /// Nothing more will be produced.
    Exhausted,
}

impl<T: 'static> Generator<T> {
    /// Creates a generator from a body that yields through `co`.
    pub fn new<F, Fut>(body: F) -> Self
    where
        F: FnOnce(Co<T>) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        Self::with_frame(|co| body(co).map(Ok))
    }

    /// Creates a generator from a fallible body.
    ///
    /// An `Err` returned by the body is delivered by the next pull, after
    /// which the generator is exhausted.
    pub fn try_new<F, Fut, E>(body: F) -> Self
    where
        F: FnOnce(Co<T>) -> Fut,
        Fut: Future<Output = Result<(), E>> + 'static,
        E: Into<anyhow::Error> + 'static,
    {
        Self::with_frame(|co| body(co).map(|result| result.map_err(Failure::new)))
    }

    /// Creates a generator yielding the items of `iter`, one per pull.
    ///
    /// The iterator is advanced lazily, so infinite iterators are fine.
    #[allow(clippy::should_implement_trait)]
    pub fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        let iter = iter.into_iter();

        Self::new(move |co| async move {
            for value in iter {
                co.yield_(value).await;
            }
        })
    }

    fn with_frame<F, Fut>(body: F) -> Self
    where
        F: FnOnce(Co<T>) -> Fut,
        Fut: Future<Output = Result<(), Failure>> + 'static,
    {
        let slot: YieldSlot<T> = Rc::new(Cell::new(None));
        let frame = body(Co { slot: slot.clone() });

        Self {
            frame: Some(Box::pin(frame)),
            slot,
            held: Held::Empty,
            started: false,
        }
    }
}

impl<T> Generator<T> {
    /// Reports the current lifecycle state.
    pub fn state(&self) -> GeneratorState {
        match (&self.held, &self.frame) {
            (Held::Value(_) | Held::Failure(_), _) => GeneratorState::Ready,
            (Held::Empty, None) => GeneratorState::Exhausted,
            (Held::Empty, Some(_)) if !self.started => GeneratorState::NotStarted,
            (Held::Empty, Some(_)) => GeneratorState::Suspended,
        }
    }

    /// Resumes the body once and records what it left behind.
    fn resume(&mut self) {
        let Some(frame) = self.frame.as_mut() else {
            return;
        };

        self.started = true;

        let mut cx = Context::from_waker(noop_waker_ref());
        let poll = panic::catch_unwind(AssertUnwindSafe(|| frame.as_mut().poll(&mut cx)));

        match poll {
            Ok(Poll::Pending) => match self.slot.take() {
                Some(value) => self.held = Held::Value(value),
                None => {
                    tracing::debug!("generator body suspended without yielding");

                    self.frame = None;
                    self.held = Held::Failure(Failure::new(Stalled));
                }
            },
            Ok(Poll::Ready(Ok(()))) => {
                self.frame = None;
            }
            Ok(Poll::Ready(Err(failure))) => {
                self.frame = None;
                self.held = Held::Failure(failure);
            }
            Err(payload) => {
                self.frame = None;
                self.held = Held::Failure(Failure::from_panic(payload));
            }
        }
    }
}

impl<T> Sequence for Generator<T> {
    type Item = T;

    /// Returns `true` if a value (or a failure) can be pulled.
    ///
    /// Resumes the body only when nothing is held yet, so repeated calls
    /// without [`next`](Sequence::next) do not skip values.
    fn has_next(&mut self) -> bool {
        if matches!(self.held, Held::Empty) {
            self.resume();
        }

        !matches!(self.held, Held::Empty)
    }

    /// Pulls the next value.
    ///
    /// A failure of the body is returned once as [`Error::Failed`]; after
    /// that, and after the last value, every call returns
    /// [`Error::Exhausted`].
    fn next(&mut self) -> Result<T, Error> {
        if !self.has_next() {
            return Err(Error::Exhausted);
        }

        match mem::replace(&mut self.held, Held::Empty) {
            Held::Value(value) => Ok(value),
            Held::Failure(failure) => Err(Error::Failed(failure)),
            Held::Empty => Err(Error::Exhausted),
        }
    }
}

impl<T: 'static> From<Vec<T>> for Generator<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_iter(values)
    }
}

impl<T: 'static, const N: usize> From<[T; N]> for Generator<T> {
    fn from(values: [T; N]) -> Self {
        Self::from_iter(values)
    }
}

impl<T> fmt::Debug for Generator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("state", &self.state())
            .finish()
    }
}

/// Handle through which a generator body yields values.
pub struct Co<T> {
    slot: YieldSlot<T>,
}

impl<T> Co<T> {
    /// Hands `value` to the consumer and suspends the body until the next
    /// pull.
    pub fn yield_(&self, value: T) -> Yield<T> {
        Yield {
            slot: self.slot.clone(),
            value: Some(value),
        }
    }
}

/// Future returned by [`Co::yield_`].
///
/// The first poll stores the value and suspends; the next one completes.
pub struct Yield<T> {
    slot: YieldSlot<T>,
    value: Option<T>,
}

impl<T> Unpin for Yield<T> {}

impl<T> Future for Yield<T> {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        match self.value.take() {
            Some(value) => {
                self.slot.set(Some(value));
                Poll::Pending
            }
            None => Poll::Ready(()),
        }
    }
}
