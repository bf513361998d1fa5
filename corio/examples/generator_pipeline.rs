use corio::generator::{Generator, Sequence};

fn fibonacci() -> Generator<u64> {
    Generator::new(|co| async move {
        let (mut a, mut b) = (0u64, 1u64);
        loop {
            co.yield_(a).await;
            (a, b) = (b, a + b);
        }
    })
}

fn main() -> anyhow::Result<()> {
    let triangles: Vec<i32> = Generator::from_iter(1..=4)
        .flat_expand(|n| Generator::from_iter(0..n))
        .collect()?;
    println!("flat_expand: {triangles:?}");

    let factorial = Generator::from_iter(1..=5).fold(1, |acc, n| acc * n)?;
    println!("5! = {factorial}");

    print!("even fibonacci below 1000:");
    fibonacci()
        .take_while(|n| *n < 1000)
        .filter(|n| n % 2 == 0)
        .for_each(|n| print!(" {n}"))?;
    println!();

    let squares: Vec<u64> = fibonacci().map(|n| n * n).take(8).collect()?;
    println!("squared fibonacci: {squares:?}");

    Ok(())
}
