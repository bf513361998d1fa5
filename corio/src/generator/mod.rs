//! Lazy, pull-based sequences.
//!
//! This module provides:
//! - [`Generator`]: a sequence produced by a suspendable body
//! - [`Sequence`]: the pull protocol, with its combinators
//! - Adapters returned by the combinators ([`Map`], [`Filter`], ...)
//!
//! Combinators are lazy: `map`, `filter`, `flat_expand`, `take` and
//! `take_while` only wrap their source. The eager ones (`fold`, `for_each`,
//! `collect`) drain it on the calling thread.

mod adapters;
mod frame;

pub use adapters::{Filter, FlatExpand, Iter, Map, Take, TakeWhile};
pub use frame::{Co, Generator, GeneratorState, Yield};

use crate::error::{Error, Failure};

/// A lazy sequence pulled one value at a time.
///
/// `has_next` answers whether a pull would produce something; `next`
/// produces it. A failure raised by the producer counts as "something": it
/// is reported once by `next` as [`Error::Failed`], after which the sequence
/// is exhausted.
///
/// # Examples
///
/// ```rust,ignore
/// let total = Generator::from_iter(1..=5)
///     .filter(|n| n % 2 == 1)
///     .map(|n| n * 10)
///     .fold(0, |acc, n| acc + n)
///     .unwrap();
///
/// assert_eq!(total, 90);
/// ```
pub trait Sequence {
    /// The type of the values produced.
    type Item;

    /// Returns `true` if a call to [`next`](Self::next) would produce a
    /// value or a failure. May advance the producer.
    fn has_next(&mut self) -> bool;

    /// Pulls the next value, or [`Error::Exhausted`] once there is none.
    fn next(&mut self) -> Result<Self::Item, Error>;

    /// Transforms every value with `f`.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: FnMut(Self::Item) -> U,
    {
        Map::new(self, f)
    }

    /// Keeps only the values matching `predicate`.
    fn filter<P>(self, predicate: P) -> Filter<Self, P>
    where
        Self: Sized,
        P: FnMut(&Self::Item) -> bool,
    {
        Filter::new(self, predicate)
    }

    /// Replaces every value with the sequence `f` returns for it, and
    /// produces the inner sequences one after the other.
    ///
    /// ```rust,ignore
    /// let flat: Vec<i32> = Generator::from_iter(1..=4)
    ///     .flat_expand(|n| Generator::from_iter(0..n))
    ///     .collect()
    ///     .unwrap();
    ///
    /// assert_eq!(flat, [0, 0, 1, 0, 1, 2, 0, 1, 2, 3]);
    /// ```
    fn flat_expand<G, F>(self, f: F) -> FlatExpand<Self, F, G>
    where
        Self: Sized,
        F: FnMut(Self::Item) -> G,
        G: Sequence,
    {
        FlatExpand::new(self, f)
    }

    /// Produces at most the first `n` values.
    ///
    /// The source is not pulled past the `n`-th value, so `take` bounds
    /// infinite sequences.
    fn take(self, n: usize) -> Take<Self>
    where
        Self: Sized,
    {
        Take::new(self, n)
    }

    /// Produces values while `predicate` holds. The first value failing it
    /// is consumed and discarded, and the sequence ends there.
    fn take_while<P>(self, predicate: P) -> TakeWhile<Self, P>
    where
        Self: Sized,
        P: FnMut(&Self::Item) -> bool,
    {
        TakeWhile::new(self, predicate)
    }

    /// Drains the sequence into an accumulator.
    ///
    /// Stops at the first failure and returns it.
    fn fold<A, F>(mut self, init: A, mut f: F) -> Result<A, Error>
    where
        Self: Sized,
        F: FnMut(A, Self::Item) -> A,
    {
        let mut acc = init;

        while self.has_next() {
            acc = f(acc, self.next()?);
        }

        Ok(acc)
    }

    /// Calls `f` with every value, in order.
    ///
    /// Stops at the first failure and returns it.
    fn for_each<F>(mut self, mut f: F) -> Result<(), Error>
    where
        Self: Sized,
        F: FnMut(Self::Item),
    {
        while self.has_next() {
            f(self.next()?);
        }

        Ok(())
    }

    /// Drains the sequence into a collection.
    fn collect<B>(self) -> Result<B, Error>
    where
        Self: Sized,
        B: FromIterator<Self::Item>,
    {
        self.iter().collect::<Result<B, Failure>>().map_err(Error::from)
    }

    /// Adapts the sequence to a standard [`Iterator`] of results.
    fn iter(self) -> Iter<Self>
    where
        Self: Sized,
    {
        Iter::new(self)
    }

    /// Borrows the sequence, so a combinator can consume part of it.
    ///
    /// ```rust,ignore
    /// let mut numbers = Generator::from_iter(0..);
    ///
    /// let head: Vec<u32> = numbers.by_ref().take(3).collect().unwrap();
    /// assert_eq!(numbers.next().unwrap(), 3);
    /// ```
    fn by_ref(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self
    }
}

impl<S: Sequence + ?Sized> Sequence for &mut S {
    type Item = S::Item;

    fn has_next(&mut self) -> bool {
        (**self).has_next()
    }

    fn next(&mut self) -> Result<S::Item, Error> {
        (**self).next()
    }
}
