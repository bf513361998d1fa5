use crate::runtime::executor::{Executor, InlineExecutor};

use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    /// Executor of the frame currently being polled on this thread.
    ///
    /// Set for the duration of each poll so that tasks spawned from inside a
    /// frame inherit their parent's dispatch without passing it around.
    pub(crate) static CURRENT_EXECUTOR: RefCell<Option<Arc<dyn Executor>>> =
        const { RefCell::new(None) };
}

/// Runs `f` with `executor` installed as the current executor.
///
/// The previous value is restored afterwards, so nested polls (a frame
/// resuming another frame inline) unwind correctly.
pub(crate) fn enter_context<R>(executor: Arc<dyn Executor>, f: impl FnOnce() -> R) -> R {
    let prev = CURRENT_EXECUTOR.with(|cell| cell.replace(Some(executor)));

    let out = f();

    CURRENT_EXECUTOR.with(|cell| cell.replace(prev));

    out
}

/// Returns the executor of the frame being polled, or [`InlineExecutor`]
/// outside of any frame.
pub(crate) fn current_executor() -> Arc<dyn Executor> {
    CURRENT_EXECUTOR.with(|cell| {
        cell.borrow()
            .as_ref()
            .cloned()
            .unwrap_or_else(|| Arc::new(InlineExecutor))
    })
}
