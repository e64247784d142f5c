//! Suspending `eventually`: the same decisions as the blocking form, expressed
//! as suspension points in a single task.
//!
//! Attempts, interval waits and the deadline race are all `.await`s. When the
//! deadline wins, the retry future is dropped, which cancels whatever it was
//! awaiting, be it an attempt or an interval sleep. The [`AttemptContext`]
//! lives on the caller's stack and is only borrowed by the retry future, so
//! any number of invocations may run concurrently without sharing anything.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;

use crate::patience::{PatienceConfig, DEFAULT_PATIENCE};
use crate::retry::context::AttemptContext;
use crate::retry::error::{Panicked, TimeoutFailure};
use crate::retry::outcome::Outcome;

/// Await `operation()` until it succeeds, sleeping `interval` after each failure.
///
/// Failures are recorded into `ctx`. A zero interval yields to the scheduler
/// instead of sleeping, since a timer sleep always lasts at least one tick.
/// The loop never gives up by itself; bound it with [`with_timeout`].
pub async fn retry_loop<T, E, F, Fut>(
    mut operation: F,
    interval: Duration,
    ctx: &mut AttemptContext<E>,
) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    loop {
        match operation().await {
            Ok(value) => return value,
            Err(failure) => {
                ctx.record_failure(failure);
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    attempt = ctx.retry_count(),
                    ?interval,
                    "eventually attempt failed, retrying"
                );
                if interval.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }
}

/// Race `inner` against `timeout`, measured from the first poll.
///
/// Returns `None` if the deadline passed first; `inner` is then dropped, not
/// awaited to completion. The deadline wins ties: a zero timeout has already
/// expired, so `inner` is never polled.
///
/// # Examples
///
/// ```rust
/// use eventually::retry::suspend::with_timeout;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// assert_eq!(with_timeout(async { 42 }, Duration::from_millis(10)).await, Some(42));
///
/// let stuck = std::future::pending::<()>();
/// assert_eq!(with_timeout(stuck, Duration::from_millis(10)).await, None);
/// # });
/// ```
pub async fn with_timeout<T, Fut>(inner: Fut, timeout: Duration) -> Option<T>
where
    Fut: Future<Output = T>,
{
    if timeout.is_zero() {
        return None;
    }

    tokio::select! {
        biased;
        _ = tokio::time::sleep(timeout) => None,
        value = inner => Some(value),
    }
}

async fn run<T, E, F, Fut>(operation: F, config: PatienceConfig) -> Outcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut ctx = AttemptContext::new();
    let finished = with_timeout(
        retry_loop(operation, config.interval(), &mut ctx),
        config.timeout(),
    )
    .await;

    match finished {
        Some(value) => Outcome::Success(value),
        None => Outcome::timed_out(ctx),
    }
}

/// Suspending form of [`eventually`](crate::eventually), with the default patience.
///
/// Requires a tokio runtime with the time driver enabled.
///
/// # Examples
///
/// ```rust
/// use eventually::eventually_async;
///
/// # tokio_test::block_on(async {
/// let mut calls = 0;
/// let value = eventually_async(|| {
///     calls += 1;
///     let n = calls;
///     async move { if n < 3 { Err("warming up") } else { Ok(n * 10) } }
/// })
/// .await
/// .unwrap();
///
/// assert_eq!(value, 30);
/// # });
/// ```
pub async fn eventually_async<T, E, F, Fut>(operation: F) -> Result<T, TimeoutFailure<E>>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    eventually_async_with(operation, DEFAULT_PATIENCE).await
}

/// Suspending form of [`eventually_with`](crate::eventually_with).
pub async fn eventually_async_with<T, E, F, Fut>(
    operation: F,
    config: PatienceConfig,
) -> Result<T, TimeoutFailure<E>>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let outcome = run(operation, config).await;
    super::finish(outcome, &config)
}

/// Suspending form of [`eventually_action`](crate::eventually_action): retries
/// until the future returned by `action` completes without panicking.
pub async fn eventually_action_async<F, Fut>(action: F) -> Result<(), TimeoutFailure<Panicked>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    eventually_action_async_with(action, DEFAULT_PATIENCE).await
}

/// Suspending form of [`eventually_action_with`](crate::eventually_action_with).
pub async fn eventually_action_async_with<F, Fut>(
    mut action: F,
    config: PatienceConfig,
) -> Result<(), TimeoutFailure<Panicked>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    eventually_async_with(
        move || {
            AssertUnwindSafe(action())
                .catch_unwind()
                .map(|result| result.map_err(Panicked::from_payload))
        },
        config,
    )
    .await
}

impl PatienceConfig {
    /// Suspending retry of `operation` with this config.
    pub async fn eventually_async<T, E, F, Fut>(&self, operation: F) -> Result<T, TimeoutFailure<E>>
    where
        E: std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        eventually_async_with(operation, *self).await
    }

    /// Suspending retry of `action` with this config.
    pub async fn eventually_action_async<F, Fut>(
        &self,
        action: F,
    ) -> Result<(), TimeoutFailure<Panicked>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        eventually_action_async_with(action, *self).await
    }
}
