//! Assertion macros for `eventually` results.
//!
//! # Examples
//!
//! ```rust
//! use eventually::{assert_eventually, assert_times_out, eventually};
//!
//! let value = assert_eventually!(eventually(|| Ok::<_, String>(42)));
//! assert_eq!(value, 42);
//!
//! let failure = assert_times_out!(eventually(|| Err::<(), _>("never")));
//! assert!(failure.is_exhausted());
//! ```

/// Assert that an `eventually` call succeeded, yielding its value.
///
/// Panics with the timeout message if the result is an `Err`.
///
/// # Example
///
/// ```rust
/// use eventually::{assert_eventually, eventually_action};
///
/// assert_eventually!(eventually_action(|| assert!(true)));
/// ```
#[macro_export]
macro_rules! assert_eventually {
    ($result:expr) => {
        match $result {
            ::std::result::Result::Ok(value) => value,
            ::std::result::Result::Err(failure) => {
                panic!("Expected eventual success, got: {}", failure);
            }
        }
    };
}

/// Assert that an `eventually` call timed out, yielding the failure.
///
/// Panics if the result is an `Ok`.
///
/// # Example
///
/// ```rust
/// use eventually::{assert_times_out, eventually_with, PatienceConfig};
/// use std::time::Duration;
///
/// let config = PatienceConfig::new(Duration::from_millis(20), Duration::from_millis(5));
/// let failure = assert_times_out!(eventually_with(|| Err::<u8, _>("down"), config));
/// assert_eq!(failure.timeout(), Duration::from_millis(20));
/// ```
#[macro_export]
macro_rules! assert_times_out {
    ($result:expr) => {
        match $result {
            ::std::result::Result::Err(failure) => failure,
            ::std::result::Result::Ok(value) => {
                panic!("Expected timeout, got success: {:?}", value);
            }
        }
    };
}
