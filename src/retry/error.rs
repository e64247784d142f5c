//! Error types for `eventually` operations.

use std::any::Any;
use std::time::Duration;

use crate::patience::{ClockTime, PatienceConfig};

/// Error returned when the code passed to `eventually` did not succeed in time.
///
/// This is the only error an `eventually` call ever surfaces. Transient
/// failures of individual attempts are recovered internally; only the last one
/// is kept, here, as [`last_failure`](Self::last_failure).
///
/// There are two shapes:
///
/// - **exhausted**: at least one attempt failed before the deadline. Carries the
///   attempt count and the last failure.
/// - **timed out**: the very first attempt was still running when the deadline
///   fired, so there is no failure to report.
///
/// The message is derived once, at construction, from the fields.
///
/// # Examples
///
/// ```rust
/// use eventually::{eventually, TimeoutFailure};
///
/// let failure: TimeoutFailure<String> =
///     eventually(|| Err::<(), _>("not yet".to_string())).unwrap_err();
///
/// assert!(failure.is_exhausted());
/// assert_eq!(failure.last_failure().map(String::as_str), Some("not yet"));
/// assert!(failure
///     .to_string()
///     .starts_with("The code passed to eventually never returned normally."));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutFailure<E> {
    timeout: Duration,
    interval: Duration,
    attempts: Option<u32>,
    last_failure: Option<E>,
    message: String,
}

impl<E: std::fmt::Display> TimeoutFailure<E> {
    /// Failure after `attempts` failed attempts, the last of which raised `last_failure`.
    pub fn exhausted(config: &PatienceConfig, attempts: u32, last_failure: E) -> Self {
        let message = format!(
            "The code passed to eventually never returned normally. \
             Attempted {} times over {}. Last failure message: {}",
            attempts,
            ClockTime(config.timeout()),
            last_failure
        );
        Self {
            timeout: config.timeout(),
            interval: config.interval(),
            attempts: Some(attempts),
            last_failure: Some(last_failure),
            message,
        }
    }
}

impl<E> TimeoutFailure<E> {
    /// Failure where the deadline fired before any attempt had failed.
    pub fn timed_out(config: &PatienceConfig) -> Self {
        let message = format!(
            "The code passed to eventually did not complete and was ended after {} timeout.",
            ClockTime(config.timeout())
        );
        Self {
            timeout: config.timeout(),
            interval: config.interval(),
            attempts: None,
            last_failure: None,
            message,
        }
    }

    /// The configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The configured interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of failed attempts, or `None` if no attempt completed.
    pub fn attempts(&self) -> Option<u32> {
        self.attempts
    }

    /// The failure raised by the last completed attempt.
    pub fn last_failure(&self) -> Option<&E> {
        self.last_failure.as_ref()
    }

    /// Extract the last failure, discarding metadata.
    pub fn into_last_failure(self) -> Option<E> {
        self.last_failure
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true if at least one attempt failed before the deadline.
    pub fn is_exhausted(&self) -> bool {
        self.attempts.is_some()
    }
}

impl<E> std::fmt::Display for TimeoutFailure<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl<E: std::error::Error + 'static> std::error::Error for TimeoutFailure<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.last_failure
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// A panic caught while running an action, kept as a failure value.
///
/// Actions passed to `eventually_action` fail the way assertions do, by
/// panicking. The panic message becomes this error's `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panicked {
    message: String,
}

impl Panicked {
    /// Build from a payload returned by `catch_unwind`.
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_string(),
                Err(_) => "Box<dyn Any>".to_string(),
            },
        };
        Self { message }
    }

    /// The panic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for Panicked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Panicked {}
