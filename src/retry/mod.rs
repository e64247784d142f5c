//! Poll-until-success: retry at a fixed interval, inside a timeout envelope.
//!
//! Three pieces compose into every `eventually` call:
//!
//! - **Retry loop**: invokes the operation; on failure records it, waits the
//!   interval and tries again; on success stops. It never gives up on its own.
//! - **Timeout envelope**: races the retry loop against a deadline measured from
//!   the start of the call. If the deadline wins, the loop is cancelled at its
//!   next checkpoint (before an attempt, or during the interval wait) and the
//!   attempt in flight, if any, is abandoned.
//! - **Outcome composer**: turns whatever happened first into the caller-facing
//!   result, either the success value or a single [`TimeoutFailure`].
//!
//! Both a blocking form ([`blocking`]) and a suspending form (`suspend`, behind
//! the `async` feature) are provided, with identical decisions.
//!
//! # Quick Start
//!
//! ```rust
//! use eventually::{eventually_with, PatienceConfig};
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let flag = Arc::new(AtomicBool::new(false));
//! let setter = flag.clone();
//! std::thread::spawn(move || {
//!     std::thread::sleep(Duration::from_millis(20));
//!     setter.store(true, Ordering::SeqCst);
//! });
//!
//! let config = PatienceConfig::new(Duration::from_secs(2), Duration::from_millis(5));
//! eventually_with(
//!     move || if flag.load(Ordering::SeqCst) { Ok(()) } else { Err("flag not set") },
//!     config,
//! )
//! .unwrap();
//! ```
//!
//! # Error Types
//!
//! - [`TimeoutFailure`]: the only error surfaced; carries the config, the attempt
//!   count and the last failure
//! - [`Panicked`]: the failure recorded when an action panics

pub mod blocking;
mod context;
mod error;
mod outcome;
#[cfg(feature = "async")]
pub mod suspend;

pub use blocking::{
    eventually, eventually_action, eventually_action_with, eventually_with, Attempt,
};
pub use context::AttemptContext;
pub use error::{Panicked, TimeoutFailure};
pub use outcome::Outcome;
#[cfg(feature = "async")]
pub use suspend::{
    eventually_action_async, eventually_action_async_with, eventually_async,
    eventually_async_with,
};

use crate::patience::PatienceConfig;

/// Shared tail of every composer: translate the outcome and log it.
fn finish<T, E>(outcome: Outcome<T, E>, config: &PatienceConfig) -> Result<T, TimeoutFailure<E>>
where
    E: std::fmt::Display,
{
    let result = outcome.into_result(config);

    #[cfg(feature = "tracing")]
    match &result {
        Ok(_) => tracing::debug!("eventually succeeded"),
        Err(failure) => tracing::warn!(
            attempts = failure.attempts(),
            timeout = ?failure.timeout(),
            interval = ?failure.interval(),
            "{}",
            failure
        ),
    }

    result
}

#[cfg(test)]
mod tests;
