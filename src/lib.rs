//! # Eventually
//!
//! > *"Give it a moment"*
//!
//! Poll-until-success for tests that assert eventual consistency.
//!
//! `eventually` runs a fallible operation, and if it fails, waits a fixed
//! interval and runs it again, until it succeeds or a total timeout elapses.
//! On timeout you get a single [`TimeoutFailure`] that says how many attempts
//! were made and what the last one failed with.
//!
//! ## Quick Example
//!
//! ```rust
//! use eventually::{eventually, eventually_action};
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::sync::Arc;
//!
//! let inbox = Arc::new(AtomicU32::new(0));
//!
//! // Some asynchronous side effect we want to observe
//! let sender = inbox.clone();
//! std::thread::spawn(move || sender.store(3, Ordering::SeqCst));
//!
//! // Value-returning form: failure is an `Err`
//! let probe = inbox.clone();
//! let seen = eventually(move || match probe.load(Ordering::SeqCst) {
//!     0 => Err("inbox still empty"),
//!     n => Ok(n),
//! })
//! .unwrap();
//! assert_eq!(seen, 3);
//!
//! // Action form: failure is a panicking assertion
//! eventually_action(move || assert_eq!(inbox.load(Ordering::SeqCst), 3)).unwrap();
//! ```
//!
//! ## Patience
//!
//! Without an explicit [`PatienceConfig`], calls use [`DEFAULT_PATIENCE`]:
//! a 150ms timeout and a 15ms interval. The `*_with` functions and the methods
//! on [`PatienceConfig`] take an explicit one.
//!
//! ## Features
//!
//! - `async` (default): suspending forms built on tokio
//! - `tracing`: debug events per failed attempt, a warning on timeout
//! - `serde`: (de)serialize [`PatienceConfig`]
//! - `proptest`: `Arbitrary` for [`PatienceConfig`]

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod patience;
pub mod retry;
pub mod testing;

// Re-exports
pub use patience::{PatienceConfig, DEFAULT_PATIENCE};
pub use retry::{
    eventually, eventually_action, eventually_action_with, eventually_with, AttemptContext,
    Outcome, Panicked, TimeoutFailure,
};
#[cfg(feature = "async")]
pub use retry::{
    eventually_action_async, eventually_action_async_with, eventually_async,
    eventually_async_with,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::patience::{PatienceConfig, DEFAULT_PATIENCE};
    pub use crate::retry::{
        eventually, eventually_action, eventually_action_with, eventually_with, Panicked,
        TimeoutFailure,
    };
    #[cfg(feature = "async")]
    pub use crate::retry::{
        eventually_action_async, eventually_action_async_with, eventually_async,
        eventually_async_with,
    };
    pub use crate::{assert_eventually, assert_times_out};
}
