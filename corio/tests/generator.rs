use corio::generator::{Generator, GeneratorState, Sequence};
use corio::{Panicked, Stalled};

use std::cell::Cell;
use std::rc::Rc;

fn fibonacci() -> Generator<u64> {
    Generator::new(|co| async move {
        let (mut a, mut b) = (0u64, 1u64);
        loop {
            co.yield_(a).await;
            (a, b) = (b, a + b);
        }
    })
}

#[test]
fn test_generator_flat_expand_concatenates_inner_sequences() {
    let flat: Vec<i32> = Generator::from([1, 2, 3, 4])
        .flat_expand(|n| Generator::from_iter(0..n))
        .collect()
        .unwrap();

    assert_eq!(flat, [0, 0, 1, 0, 1, 2, 0, 1, 2, 3]);
}

#[test]
fn test_generator_fold_computes_a_factorial() {
    let product = Generator::from([1, 2, 3, 4, 5])
        .fold(1, |acc, n| acc * n)
        .unwrap();

    assert_eq!(product, 120);
}

#[test]
fn test_generator_take_bounds_an_infinite_generator() {
    let first: Vec<u64> = fibonacci().take(10).collect().unwrap();

    assert_eq!(first, [0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);
}

#[test]
fn test_generator_take_while_stops_at_the_first_rejected_value() {
    let small: Vec<u64> = fibonacci().take_while(|n| *n < 50).collect().unwrap();

    assert_eq!(small, [0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);
}

#[test]
fn test_generator_filter_and_map_compose() {
    let mut seen = Vec::new();

    Generator::from(vec![1, 2, 3, 4, 5, 6])
        .filter(|n| n % 2 == 0)
        .map(|n| n * n)
        .for_each(|n| seen.push(n))
        .unwrap();

    assert_eq!(seen, [4, 16, 36]);
}

#[test]
fn test_generator_body_runs_lazily() {
    let started = Rc::new(Cell::new(false));
    let flag = started.clone();

    let mut generator = Generator::new(move |co| async move {
        flag.set(true);
        co.yield_('a').await;
    });

    assert!(!started.get());
    assert_eq!(generator.state(), GeneratorState::NotStarted);

    assert!(generator.has_next());
    assert!(started.get());
    assert_eq!(generator.state(), GeneratorState::Ready);

    assert_eq!(generator.next().unwrap(), 'a');
    assert_eq!(generator.state(), GeneratorState::Suspended);

    assert!(!generator.has_next());
    assert_eq!(generator.state(), GeneratorState::Exhausted);
}

#[test]
fn test_generator_has_next_does_not_skip_values() {
    let mut generator = Generator::from([10, 20]);

    assert!(generator.has_next());
    assert!(generator.has_next());
    assert_eq!(generator.next().unwrap(), 10);
    assert_eq!(generator.next().unwrap(), 20);
}

#[test]
fn test_generator_exhausted_stays_exhausted() {
    let mut generator = Generator::from([1]);

    assert_eq!(generator.next().unwrap(), 1);

    for _ in 0..3 {
        assert!(!generator.has_next());
        assert!(generator.next().unwrap_err().is_exhausted());
    }
}

#[test]
fn test_generator_failure_is_reported_once_then_exhausted() {
    let mut generator = Generator::try_new(|co| async move {
        co.yield_(1).await;
        Err(anyhow::anyhow!("bad input"))
    });

    assert_eq!(generator.next().unwrap(), 1);

    assert!(generator.has_next());
    let error = generator.next().unwrap_err();
    assert_eq!(error.failure().unwrap().to_string(), "bad input");

    assert!(!generator.has_next());
    assert!(generator.next().unwrap_err().is_exhausted());
}

#[test]
fn test_generator_panic_in_body_is_captured() {
    let mut generator = Generator::new(|co| async move {
        co.yield_(1).await;
        panic!("generator blew up");
    });

    assert_eq!(generator.next().unwrap(), 1);

    let error = generator.next().unwrap_err();
    let failure = error.failure().unwrap();

    assert!(failure.is_panic());
    assert_eq!(failure.downcast_ref::<Panicked>().unwrap().message(), "generator blew up");
}

#[test]
fn test_generator_suspending_without_yield_stalls() {
    let mut generator = Generator::<i32>::new(|_co| futures::future::pending::<()>());

    let error = generator.next().unwrap_err();
    assert!(error.failure().unwrap().downcast_ref::<Stalled>().is_some());

    assert!(generator.next().unwrap_err().is_exhausted());
}

#[test]
fn test_generator_fold_stops_at_the_first_failure() {
    let generator = Generator::try_new(|co| async move {
        co.yield_(1).await;
        co.yield_(2).await;
        Err(anyhow::anyhow!("truncated"))
    });

    let error = generator.fold(0, |acc, n| acc + n).unwrap_err();

    assert_eq!(error.to_string(), "truncated");
}

#[test]
fn test_generator_collect_surfaces_failures_from_inner_sequences() {
    let result: Result<Vec<u32>, _> = Generator::from_iter(0..3)
        .flat_expand(|n| {
            Generator::try_new(move |co| async move {
                co.yield_(n).await;
                if n == 1 {
                    anyhow::bail!("inner {n} failed");
                }
                Ok(())
            })
        })
        .collect();

    assert_eq!(result.unwrap_err().to_string(), "inner 1 failed");
}

#[test]
fn test_generator_drop_releases_its_body() {
    struct Guard(Rc<Cell<bool>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    let dropped = Rc::new(Cell::new(false));
    let guard = Guard(dropped.clone());

    let mut generator = Generator::new(move |co| async move {
        let _guard = guard;
        loop {
            co.yield_(()).await;
        }
    });

    generator.next().unwrap();
    assert!(!dropped.get());

    drop(generator);
    assert!(dropped.get());
}

#[test]
fn test_generator_iter_adapts_to_std_iterators() {
    let total: u64 = fibonacci()
        .take(5)
        .iter()
        .map(Result::unwrap)
        .sum();

    assert_eq!(total, 7);
}

#[test]
fn test_generator_by_ref_leaves_the_rest_of_the_sequence() {
    let mut numbers = Generator::from_iter(0u32..);

    let head: Vec<u32> = numbers.by_ref().take(3).collect().unwrap();

    assert_eq!(head, [0, 1, 2]);
    assert_eq!(numbers.next().unwrap(), 3);
}
