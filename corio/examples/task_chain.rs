use corio::{Outcome, Task};

use std::thread;
use std::time::Duration;

async fn fetch(id: u32) -> anyhow::Result<String> {
    let (promise, task) = Task::pending();

    thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        if id == 0 {
            promise.set_failure(corio::Failure::msg("id 0 does not exist"));
        } else {
            promise.set_value(format!("record #{id}"));
        }
    });

    Ok(task.await?)
}

#[corio::main(executor = "thread")]
async fn main() -> anyhow::Result<()> {
    let record = corio::try_spawn(fetch(7));

    record.then(|value| println!("then: {value}"));
    record.finally(|| println!("finally: record settled"));

    println!("awaited: {}", record.await?);

    let missing = corio::try_spawn(fetch(0));

    missing.catching(|failure| println!("catching: {failure}"));
    missing.on_completed(|outcome: Outcome<String>| {
        println!("on_completed: failed = {}", outcome.is_failure());
    });

    if let Err(failure) = missing.await {
        println!("awaited failure: {failure}");
    }

    Ok(())
}
