use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Suspends once, asking to be resumed right away.
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    /// The first poll wakes its own waker and returns `Pending`; the task
    /// sees the wake-up arrive mid-poll and resumes the frame again.
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }

        self.yielded = true;
        cx.waker().wake_by_ref();

        Poll::Pending
    }
}

/// Suspends the current frame once.
///
/// The frame is resumed immediately by whoever is polling it. This is a
/// suspension point, not a fairness mechanism: with inline dispatch nothing
/// else runs in between.
///
/// # Examples
///
/// ```rust,ignore
/// let task = corio::spawn(async {
///     corio::yield_now().await;
///     7
/// });
/// assert_eq!(task.get_result().unwrap(), 7);
/// ```
pub async fn yield_now() {
    YieldNow { yielded: false }.await
}
