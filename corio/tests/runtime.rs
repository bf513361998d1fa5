use corio::executor::{Executor, InlineExecutor, ThreadExecutor};
use corio::{Failure, RuntimeBuilder};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

#[test]
fn test_runtime_block_on_returns_the_value() {
    let runtime = RuntimeBuilder::new().build();

    assert_eq!(runtime.block_on(async { 6 * 7 }).unwrap(), 42);
}

#[test]
fn test_runtime_block_on_moves_non_clone_values_out() {
    let runtime = RuntimeBuilder::new().build();

    let result: Result<(), anyhow::Error> = runtime
        .block_on(async { Err(anyhow::anyhow!("not clonable")) })
        .unwrap();

    assert_eq!(result.unwrap_err().to_string(), "not clonable");
}

#[test]
fn test_runtime_block_on_reports_panics_as_failures() {
    let runtime = RuntimeBuilder::new().build();

    let result: Result<(), Failure> = runtime.block_on(async { panic!("inside block_on") });

    assert!(result.unwrap_err().is_panic());
}

#[test]
fn test_runtime_block_on_waits_for_thread_dispatch() {
    let runtime = RuntimeBuilder::new()
        .thread_per_task()
        .thread_name("corio-block-on")
        .thread_stack_size(256 * 1024)
        .build();

    let name = runtime
        .block_on(async { thread::current().name().map(String::from) })
        .unwrap();

    assert_eq!(name.as_deref(), Some("corio-block-on"));
}

#[test]
#[should_panic(expected = "thread_stack_size must be > 0")]
fn test_runtime_zero_stack_size_is_rejected() {
    let _ = RuntimeBuilder::new().thread_stack_size(0);
}

#[test]
fn test_runtime_executors_run_jobs() {
    let ran = Arc::new(AtomicBool::new(false));

    let flag = ran.clone();
    InlineExecutor.execute(Box::new(move || flag.store(true, Ordering::SeqCst)));
    assert!(ran.load(Ordering::SeqCst));

    let (promise, task) = corio::Task::pending();
    ThreadExecutor::new()
        .name("corio-job")
        .execute(Box::new(move || {
            promise.set_value(thread::current().name().map(String::from));
        }));

    assert_eq!(task.get_result().unwrap().as_deref(), Some("corio-job"));
}

#[test]
fn test_runtime_exposes_its_executor() {
    let runtime = RuntimeBuilder::new().build();
    let cloned = runtime.clone();

    assert!(Arc::ptr_eq(runtime.executor(), cloned.executor()));
}

#[corio::test]
async fn test_macro_drives_the_body() {
    let value = corio::spawn(async { 1 + 1 }).await.unwrap();

    assert_eq!(value, 2);
}

#[corio::test]
async fn test_macro_accepts_result_bodies() -> anyhow::Result<()> {
    let task = corio::try_spawn(async { "17".parse::<u8>() });

    assert_eq!(task.await?, 17);
    Ok(())
}

#[corio::test(executor = "thread")]
async fn test_macro_selects_thread_dispatch() {
    let main = thread::current().id();
    let task = corio::spawn(async { thread::current().id() });

    assert_ne!(task.await.unwrap(), main);
}

#[corio::test]
#[should_panic(expected = "frame panicked")]
async fn test_macro_reraises_failures() {
    panic!("test body panicked");
}
