use corio::sync::BroadcastEvent;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[corio::main]
async fn main() {
    let ready = Arc::new(BroadcastEvent::new(false));

    let workers: Vec<_> = (0..4)
        .map(|id| {
            let ready = ready.clone();
            corio::spawn(async move {
                ready.wait().await;
                println!("worker {id} released on {:?}", thread::current().id());
                id * 10
            })
        })
        .collect();

    let signal = {
        let ready = ready.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            println!("setting event from {:?}", thread::current().id());
            ready.set();
        })
    };

    let mut total = 0;
    for worker in workers {
        total += worker.await.unwrap();
    }

    signal.join().unwrap();
    println!("total = {total}");
}
