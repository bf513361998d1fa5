use corio::sync::BroadcastEvent;

use futures::FutureExt;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Wake, Waker};
use std::thread;
use std::time::Duration;

/// Waker that only counts its wake-ups.
struct CountingWaker(AtomicUsize);

impl Wake for CountingWaker {
    fn wake(self: Arc<Self>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_event_set_releases_every_waiter() {
    let event = Arc::new(BroadcastEvent::new(false));
    let released = Arc::new(AtomicUsize::new(0));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let event = event.clone();
            let released = released.clone();

            corio::spawn(async move {
                event.wait().await;
                released.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    assert_eq!(released.load(Ordering::SeqCst), 0);
    assert!(tasks.iter().all(|task| !task.is_completed()));

    event.set();

    assert_eq!(released.load(Ordering::SeqCst), 8);
    assert!(tasks.iter().all(|task| task.is_completed()));

    // A wait issued after `set` completes on its first poll.
    assert_eq!(event.wait().now_or_never(), Some(()));
}

#[test]
fn test_event_waiting_on_a_set_event_does_not_suspend() {
    let event = BroadcastEvent::new(true);

    assert!(event.is_set());
    assert_eq!(event.wait().now_or_never(), Some(()));
}

#[test]
fn test_event_set_is_idempotent() {
    let event = BroadcastEvent::default();

    event.set();
    event.set();

    assert!(event.is_set());
}

#[test]
fn test_event_reset_makes_waiters_suspend_again() {
    let event = BroadcastEvent::new(true);

    event.reset();

    assert!(!event.is_set());
    assert_eq!(event.wait().now_or_never(), None);

    event.set();
    assert_eq!(event.wait().now_or_never(), Some(()));
}

#[test]
fn test_event_reset_on_unset_event_does_nothing() {
    let event = BroadcastEvent::new(false);

    event.reset();

    assert!(!event.is_set());
}

#[test]
fn test_event_dropped_wait_does_not_break_set() {
    let event = BroadcastEvent::new(false);

    // Polls once, queues a node, then drops the future.
    assert_eq!(event.wait().now_or_never(), None);

    event.set();
    assert!(event.is_set());
}

#[test]
fn test_event_set_from_another_thread_resumes_waiters_there() {
    let event = Arc::new(BroadcastEvent::new(false));

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let event = event.clone();

            corio::spawn(async move {
                (&*event).await;
                thread::current().id()
            })
        })
        .collect();

    let setter = {
        let event = event.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            event.set();
            thread::current().id()
        })
    };

    let setter_id = setter.join().unwrap();

    for task in tasks {
        assert_eq!(task.get_result().unwrap(), setter_id);
    }
}

#[test]
fn test_event_dropped_waits_release_their_waker() {
    let event = BroadcastEvent::new(false);
    let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
    let waker = Waker::from(counter.clone());
    let mut cx = Context::from_waker(&waker);

    for _ in 0..1000 {
        let mut wait = event.wait();
        assert!(Pin::new(&mut wait).poll(&mut cx).is_pending());
    }

    // Only `counter` and `waker` remain.
    assert_eq!(Arc::strong_count(&counter), 2);

    event.set();

    assert_eq!(Arc::strong_count(&counter), 2);
    assert_eq!(counter.0.load(Ordering::SeqCst), 0);
}

#[test]
fn test_event_queued_wait_is_woken_by_set() {
    let event = BroadcastEvent::new(false);
    let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
    let waker = Waker::from(counter.clone());
    let mut cx = Context::from_waker(&waker);

    let mut wait = event.wait();
    assert!(Pin::new(&mut wait).poll(&mut cx).is_pending());

    event.set();

    assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    assert!(Pin::new(&mut wait).poll(&mut cx).is_ready());
}

#[test]
fn test_event_concurrent_waiters_and_setter() {
    let event = Arc::new(BroadcastEvent::new(false));

    let waiters: Vec<_> = (0..16)
        .map(|_| {
            let event = event.clone();
            thread::spawn(move || futures::executor::block_on(event.wait()))
        })
        .collect();

    event.set();

    for waiter in waiters {
        waiter.join().unwrap();
    }
}

#[corio::test]
async fn test_event_is_awaitable_by_reference() {
    let event = Arc::new(BroadcastEvent::new(false));

    let waiter = {
        let event = event.clone();
        corio::spawn(async move {
            (&*event).await;
            "released"
        })
    };

    event.set();

    assert_eq!(waiter.await.unwrap(), "released");
}
