use super::Sequence;
use crate::error::{Error, Failure};

use std::mem;

/// A pulled value or failure an adapter has not handed out yet.
enum Lookahead<T> {
    Empty,
    Value(T),
    Failure(Failure),
}

impl<T> Lookahead<T> {
    fn is_empty(&self) -> bool {
        matches!(self, Lookahead::Empty)
    }

    fn take(&mut self) -> Result<T, Error> {
        match mem::replace(self, Lookahead::Empty) {
            Lookahead::Value(value) => Ok(value),
            Lookahead::Failure(failure) => Err(Error::Failed(failure)),
            Lookahead::Empty => Err(Error::Exhausted),
        }
    }
}

/// Sequence returned by [`Sequence::map`].
pub struct Map<S, F> {
    source: S,
    f: F,
}

impl<S, F> Map<S, F> {
    pub(super) fn new(source: S, f: F) -> Self {
        Self { source, f }
    }
}

impl<S, F, U> Sequence for Map<S, F>
where
    S: Sequence,
    F: FnMut(S::Item) -> U,
{
    type Item = U;

    fn has_next(&mut self) -> bool {
        self.source.has_next()
    }

    fn next(&mut self) -> Result<U, Error> {
        self.source.next().map(&mut self.f)
    }
}

/// Sequence returned by [`Sequence::filter`].
pub struct Filter<S: Sequence, P> {
    source: S,
    predicate: P,
    ahead: Lookahead<S::Item>,
}

impl<S: Sequence, P> Filter<S, P> {
    pub(super) fn new(source: S, predicate: P) -> Self {
        Self {
            source,
            predicate,
            ahead: Lookahead::Empty,
        }
    }
}

impl<S, P> Sequence for Filter<S, P>
where
    S: Sequence,
    P: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    /// Pulls from the source until a value matches.
    fn has_next(&mut self) -> bool {
        while self.ahead.is_empty() && self.source.has_next() {
            match self.source.next() {
                Ok(value) if (self.predicate)(&value) => self.ahead = Lookahead::Value(value),
                Ok(_) => {}
                Err(Error::Failed(failure)) => self.ahead = Lookahead::Failure(failure),
                Err(Error::Exhausted) => break,
            }
        }

        !self.ahead.is_empty()
    }

    fn next(&mut self) -> Result<S::Item, Error> {
        self.has_next();
        self.ahead.take()
    }
}

/// Sequence returned by [`Sequence::flat_expand`].
pub struct FlatExpand<S, F, G> {
    source: S,
    f: F,

    /// Inner sequence being drained.
    current: Option<G>,

    /// Failure of the source, reported once the current inner sequence is
    /// drained.
    failure: Option<Failure>,

    /// Set after a failure has been reported.
    done: bool,
}

impl<S, F, G> FlatExpand<S, F, G> {
    pub(super) fn new(source: S, f: F) -> Self {
        Self {
            source,
            f,
            current: None,
            failure: None,
            done: false,
        }
    }
}

impl<S, F, G> Sequence for FlatExpand<S, F, G>
where
    S: Sequence,
    F: FnMut(S::Item) -> G,
    G: Sequence,
{
    type Item = G::Item;

    /// Moves on to the next non-empty inner sequence if needed.
    fn has_next(&mut self) -> bool {
        if self.done {
            return false;
        }

        loop {
            if let Some(inner) = self.current.as_mut() {
                if inner.has_next() {
                    return true;
                }

                self.current = None;
            }

            if self.failure.is_some() {
                return true;
            }

            if !self.source.has_next() {
                return false;
            }

            match self.source.next() {
                Ok(value) => self.current = Some((self.f)(value)),
                Err(Error::Failed(failure)) => self.failure = Some(failure),
                Err(Error::Exhausted) => return false,
            }
        }
    }

    fn next(&mut self) -> Result<G::Item, Error> {
        if !self.has_next() {
            return Err(Error::Exhausted);
        }

        let result = match self.current.as_mut() {
            Some(inner) => inner.next(),
            None => Err(self.failure.take().map_or(Error::Exhausted, Error::Failed)),
        };

        if matches!(result, Err(Error::Failed(_))) {
            self.done = true;
            self.current = None;
        }

        result
    }
}

/// Sequence returned by [`Sequence::take`].
pub struct Take<S> {
    source: S,
    remaining: usize,
}

impl<S> Take<S> {
    pub(super) fn new(source: S, remaining: usize) -> Self {
        Self { source, remaining }
    }
}

impl<S: Sequence> Sequence for Take<S> {
    type Item = S::Item;

    fn has_next(&mut self) -> bool {
        self.remaining > 0 && self.source.has_next()
    }

    fn next(&mut self) -> Result<S::Item, Error> {
        if self.remaining == 0 {
            return Err(Error::Exhausted);
        }

        let result = self.source.next();

        match result {
            Ok(_) => self.remaining -= 1,
            Err(_) => self.remaining = 0,
        }

        result
    }
}

/// Sequence returned by [`Sequence::take_while`].
pub struct TakeWhile<S: Sequence, P> {
    source: S,
    predicate: P,
    ahead: Lookahead<S::Item>,
    done: bool,
}

impl<S: Sequence, P> TakeWhile<S, P> {
    pub(super) fn new(source: S, predicate: P) -> Self {
        Self {
            source,
            predicate,
            ahead: Lookahead::Empty,
            done: false,
        }
    }
}

impl<S, P> Sequence for TakeWhile<S, P>
where
    S: Sequence,
    P: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    fn has_next(&mut self) -> bool {
        if !self.ahead.is_empty() {
            return true;
        }

        if self.done {
            return false;
        }

        if !self.source.has_next() {
            self.done = true;
            return false;
        }

        match self.source.next() {
            Ok(value) if (self.predicate)(&value) => {
                self.ahead = Lookahead::Value(value);
                true
            }
            Ok(_) | Err(Error::Exhausted) => {
                self.done = true;
                false
            }
            Err(Error::Failed(failure)) => {
                self.done = true;
                self.ahead = Lookahead::Failure(failure);
                true
            }
        }
    }

    fn next(&mut self) -> Result<S::Item, Error> {
        self.has_next();
        self.ahead.take()
    }
}

/// Iterator returned by [`Sequence::iter`].
///
/// Yields `Ok` for every value, `Err` once for a failure, then ends.
pub struct Iter<S> {
    source: S,
}

impl<S> Iter<S> {
    pub(super) fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: Sequence> Iterator for Iter<S> {
    type Item = Result<S::Item, Failure>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.source.has_next() {
            return None;
        }

        match self.source.next() {
            Ok(value) => Some(Ok(value)),
            Err(Error::Failed(failure)) => Some(Err(failure)),
            Err(Error::Exhausted) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Generator;
    use super::*;

    #[test]
    fn filter_skips_until_a_match() {
        let mut odd = Generator::from_iter([2, 4, 5, 6, 7]).filter(|n| n % 2 == 1);

        assert!(odd.has_next());
        assert!(odd.has_next());
        assert_eq!(odd.next().unwrap(), 5);
        assert_eq!(odd.next().unwrap(), 7);
        assert!(!odd.has_next());
        assert!(odd.next().unwrap_err().is_exhausted());
    }

    #[test]
    fn take_zero_never_pulls() {
        let mut pulled = false;
        let probe = Generator::from_iter([1]).map(|n| {
            pulled = true;
            n
        });

        let mut none = probe.take(0);
        assert!(!none.has_next());
        drop(none);

        assert!(!pulled);
    }

    #[test]
    fn take_while_discards_the_first_rejected_value() {
        let mut numbers = Generator::from_iter(0..);

        let small: Vec<u32> = numbers.by_ref().take_while(|n| *n < 3).collect().unwrap();

        assert_eq!(small, [0, 1, 2]);
        assert_eq!(numbers.next().unwrap(), 4);
    }

    #[test]
    fn flat_expand_skips_empty_inner_sequences() {
        let flat: Vec<u32> = Generator::from_iter([0, 2, 0, 1])
            .flat_expand(|n| Generator::from_iter(0..n))
            .collect()
            .unwrap();

        assert_eq!(flat, [0, 1, 0]);
    }
}
