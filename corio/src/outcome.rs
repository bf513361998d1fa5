use crate::error::Failure;

/// The result slot of a task.
///
/// An `Outcome` starts [`Unset`](Outcome::Unset) and is filled exactly once
/// with either a value or a captured [`Failure`]. The unset state is how a
/// task tells "not completed yet" apart from a completed one, so no separate
/// flag is kept next to it.
#[derive(Debug, Clone)]
pub enum Outcome<T> {
    /// Not completed yet.
    Unset,

    /// The producer returned a value.
    Value(T),

    /// The producer failed.
    Failure(Failure),
}

impl<T> Outcome<T> {
    /// Returns `true` while no value or failure has been stored.
    pub fn is_unset(&self) -> bool {
        matches!(self, Outcome::Unset)
    }

    /// Returns `true` if a value is stored.
    pub fn is_value(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    /// Returns `true` if a failure is stored.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// Borrows the stored value.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Borrows the stored failure.
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Failure(failure) => Some(failure),
            _ => None,
        }
    }

    /// Returns a copy of the value, or re-raises the captured failure.
    ///
    /// # Panics
    ///
    /// Panics if the outcome is still unset. Reading an incomplete result is
    /// a caller bug, not a recoverable condition.
    pub fn get_or_raise(&self) -> Result<T, Failure>
    where
        T: Clone,
    {
        match self {
            Outcome::Value(value) => Ok(value.clone()),
            Outcome::Failure(failure) => Err(failure.clone()),
            Outcome::Unset => panic!("outcome read before completion"),
        }
    }

    /// Consumes the outcome. `None` if it was unset.
    pub fn into_result(self) -> Option<Result<T, Failure>> {
        match self {
            Outcome::Value(value) => Some(Ok(value)),
            Outcome::Failure(failure) => Some(Err(failure)),
            Outcome::Unset => None,
        }
    }
}

impl<T> Default for Outcome<T> {
    fn default() -> Self {
        Outcome::Unset
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T>
where
    E: Into<Failure>,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Value(value),
            Err(error) => Outcome::Failure(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unset() {
        let outcome: Outcome<u8> = Outcome::default();

        assert!(outcome.is_unset());
        assert!(outcome.into_result().is_none());
    }

    #[test]
    fn failure_is_raised_on_every_read() {
        let outcome: Outcome<u8> = Outcome::Failure(Failure::msg("boom"));

        let first = outcome.get_or_raise().unwrap_err();
        let second = outcome.get_or_raise().unwrap_err();

        assert!(first.ptr_eq(&second));
        assert_eq!(first.to_string(), "boom");
    }

    #[test]
    #[should_panic(expected = "outcome read before completion")]
    fn reading_unset_panics() {
        let outcome: Outcome<u8> = Outcome::Unset;
        let _ = outcome.get_or_raise();
    }
}
