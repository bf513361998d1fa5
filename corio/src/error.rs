//! Error types shared by tasks and generators.
//!
//! Two families of failure exist in Corio:
//!
//! - a [`Failure`] is produced by user code (a frame returning `Err`, a
//!   panicking frame, a promise that is never fulfilled) and is re-raised
//!   every time the result is read;
//! - [`Error::Exhausted`] is a usage error: a generator was pulled past its
//!   end. It never wraps a producer failure.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque capture of a producer failure.
///
/// A `Failure` is cheap to clone: every clone points to the same captured
/// error, so re-raising it from several readers hands out the identical
/// cause each time.
#[derive(Clone)]
pub struct Failure {
    inner: Arc<anyhow::Error>,
}

impl Failure {
    /// Captures an error.
    pub fn new<E>(error: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self {
            inner: Arc::new(error.into()),
        }
    }

    /// Captures a plain message as a failure.
    pub fn msg<M>(message: M) -> Self
    where
        M: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        Self::new(anyhow::Error::msg(message))
    }

    /// Builds a failure from a panic payload caught while polling a frame.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message: Arc<str> = if let Some(s) = payload.downcast_ref::<&'static str>() {
            Arc::from(*s)
        } else if let Some(s) = payload.downcast_ref::<String>() {
            Arc::from(s.as_str())
        } else {
            Arc::from("Box<dyn Any>")
        };

        Self::new(Panicked { message })
    }

    /// Returns `true` if this failure was produced by a panic.
    pub fn is_panic(&self) -> bool {
        self.inner.downcast_ref::<Panicked>().is_some()
    }

    /// Attempts to view the captured cause as a concrete error type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.inner.downcast_ref::<E>()
    }

    /// Returns `true` if both values are clones of the same capture.
    pub fn ptr_eq(&self, other: &Failure) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Failure").field(&*self.inner).finish()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner, f)
    }
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

/// Cause recorded when a frame panics.
#[derive(Debug, Clone, thiserror::Error)]
#[error("frame panicked: {message}")]
pub struct Panicked {
    message: Arc<str>,
}

impl Panicked {
    /// The panic message, or `Box<dyn Any>` if the payload was not a string.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Cause recorded when a [`Promise`](crate::task::Promise) is dropped
/// before being completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("promise dropped without a value")]
pub struct Abandoned;

/// Cause recorded when a generator frame suspends without yielding.
///
/// Generator frames may only suspend through
/// [`Co::yield_`](crate::generator::Co::yield_); awaiting anything else
/// leaves the consumer with nothing to pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("generator frame suspended without yielding a value")]
pub struct Stalled;

/// Errors returned when pulling from a [`Sequence`](crate::generator::Sequence).
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The sequence has no more values.
    #[error("generator exhausted")]
    Exhausted,

    /// The producer failed while computing the next value.
    #[error(transparent)]
    Failed(#[from] Failure),
}

impl Error {
    /// Returns `true` for [`Error::Exhausted`].
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Error::Exhausted)
    }

    /// Returns the producer failure, if any.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Error::Failed(failure) => Some(failure),
            Error::Exhausted => None,
        }
    }
}
