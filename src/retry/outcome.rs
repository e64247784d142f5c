//! Terminal result of a retry sequence run inside a timeout envelope.

use crate::patience::PatienceConfig;
use crate::retry::context::AttemptContext;
use crate::retry::error::TimeoutFailure;

/// What the timeout envelope observed first: a success, or the deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
    /// An attempt returned normally before the deadline.
    Success(T),
    /// The deadline fired first.
    Failure {
        /// The failure of the last completed attempt, if any completed.
        last_failure: Option<E>,
        /// Number of attempts that failed before the deadline.
        retry_count: u32,
    },
}

impl<T, E> Outcome<T, E> {
    /// A deadline outcome built from the attempts recorded so far.
    pub fn timed_out(ctx: AttemptContext<E>) -> Self {
        let (retry_count, last_failure) = ctx.into_parts();
        Outcome::Failure {
            last_failure,
            retry_count,
        }
    }

    /// Returns true if an attempt succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Translate into the caller-facing result.
    ///
    /// A deadline with at least one recorded failure becomes an exhausted
    /// [`TimeoutFailure`]; a deadline with none becomes the timed-out shape.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eventually::{Outcome, DEFAULT_PATIENCE};
    ///
    /// let ok: Outcome<i32, String> = Outcome::Success(7);
    /// assert_eq!(ok.into_result(&DEFAULT_PATIENCE), Ok(7));
    ///
    /// let none_failed: Outcome<i32, String> = Outcome::Failure { last_failure: None, retry_count: 0 };
    /// let err = none_failed.into_result(&DEFAULT_PATIENCE).unwrap_err();
    /// assert_eq!(err.attempts(), None);
    /// ```
    pub fn into_result(self, config: &PatienceConfig) -> Result<T, TimeoutFailure<E>>
    where
        E: std::fmt::Display,
    {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure {
                last_failure: Some(failure),
                retry_count,
            } if retry_count > 0 => Err(TimeoutFailure::exhausted(config, retry_count, failure)),
            Outcome::Failure { .. } => Err(TimeoutFailure::timed_out(config)),
        }
    }
}
