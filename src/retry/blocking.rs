//! Blocking `eventually`: the calling thread waits for the outcome.
//!
//! The retry loop runs on a dedicated worker thread and reports every attempt
//! over a channel. The calling thread is the deadline timer: it receives
//! attempt reports until the deadline, keeping the [`AttemptContext`] up to
//! date, and then drops the cancellation sender. The worker notices the
//! cancellation before its next attempt, or immediately if it is waiting out
//! the interval. An attempt that is still running when the deadline fires is
//! abandoned: the caller gets its answer at the deadline, not when the attempt
//! finally returns.
//!
//! Because the worker may outlive the call, operations must be
//! `Send + 'static`. Share state with them through `Arc`.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crate::patience::{PatienceConfig, DEFAULT_PATIENCE};
use crate::retry::context::AttemptContext;
use crate::retry::error::{Panicked, TimeoutFailure};
use crate::retry::outcome::Outcome;

/// One finished attempt, as reported by the retry loop to the envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T, E> {
    /// The operation returned normally.
    Succeeded(T),
    /// The operation failed.
    Failed(E),
}

/// Invoke `operation` until it succeeds, waiting `interval` after each failure.
///
/// Every attempt is reported on `report`. The loop never gives up by itself:
/// it stops after a success, when `cancel` fires (message received or sender
/// dropped), or when nobody listens on `report` any more. Cancellation is
/// checked before every attempt and interrupts the interval wait.
pub fn retry_loop<T, E, F>(
    mut operation: F,
    interval: Duration,
    cancel: &Receiver<()>,
    report: &Sender<Attempt<T, E>>,
) where
    F: FnMut() -> Result<T, E>,
{
    #[cfg(feature = "tracing")]
    let mut attempt = 0u32;

    loop {
        if is_cancelled(cancel) {
            return;
        }

        match operation() {
            Ok(value) => {
                let _ = report.send(Attempt::Succeeded(value));
                return;
            }
            Err(failure) => {
                #[cfg(feature = "tracing")]
                {
                    attempt += 1;
                    tracing::debug!(attempt, ?interval, "eventually attempt failed, retrying");
                }
                if report.send(Attempt::Failed(failure)).is_err() {
                    return;
                }
            }
        }

        match cancel.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
        }
    }
}

fn is_cancelled(cancel: &Receiver<()>) -> bool {
    !matches!(cancel.try_recv(), Err(TryRecvError::Empty))
}

/// Run `inner` on a worker thread, racing it against `timeout`.
///
/// `inner` receives a cancellation receiver and a report sender. Failed
/// attempts it reports are recorded into a fresh [`AttemptContext`]; the first
/// success it reports becomes [`Outcome::Success`]. When the deadline passes
/// first, the worker is told to stop and the envelope returns
/// [`Outcome::Failure`] without waiting for it.
///
/// The deadline is measured from the moment this function is entered, and a
/// failure is never reported before it has passed. The deadline wins ties: a
/// zero timeout has already expired, so `inner` is not started at all. If
/// `inner` panics, the panic is resumed on the calling thread.
///
/// # Panics
///
/// Panics if the worker thread cannot be spawned, or if `inner` panics.
///
/// # Examples
///
/// ```rust
/// use eventually::retry::blocking::{retry_loop, with_timeout};
/// use std::time::Duration;
///
/// let outcome = with_timeout(
///     |cancel, report| retry_loop(|| Err::<(), _>("down"), Duration::from_millis(5), cancel, report),
///     Duration::from_millis(30),
/// );
/// assert!(!outcome.is_success());
/// ```
pub fn with_timeout<T, E, F>(inner: F, timeout: Duration) -> Outcome<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnOnce(&Receiver<()>, &Sender<Attempt<T, E>>) + Send + 'static,
{
    if timeout.is_zero() {
        return Outcome::timed_out(AttemptContext::new());
    }

    let deadline = Instant::now().checked_add(timeout);
    let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
    let (report_tx, report_rx) = mpsc::channel();

    let worker = thread::Builder::new()
        .name("eventually-attempt".to_string())
        .spawn(move || inner(&cancel_rx, &report_tx))
        .unwrap_or_else(|err| panic!("failed to spawn eventually worker thread: {}", err));

    let mut ctx = AttemptContext::new();
    loop {
        let received = match deadline {
            Some(deadline) => {
                report_rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
            }
            None => report_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(Attempt::Succeeded(value)) => return Outcome::Success(value),
            Ok(Attempt::Failed(failure)) => ctx.record_failure(failure),
            Err(RecvTimeoutError::Timeout) => break,
            Err(RecvTimeoutError::Disconnected) => {
                // the worker is gone without reporting a success
                if let Err(payload) = worker.join() {
                    panic::resume_unwind(payload);
                }
                break;
            }
        }
    }

    drop(cancel_tx);
    Outcome::timed_out(ctx)
}

/// Retry `operation` with the default patience until it returns `Ok`.
///
/// Uses [`DEFAULT_PATIENCE`]: a 150ms timeout and a 15ms interval.
///
/// # Examples
///
/// ```rust
/// use eventually::eventually;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::sync::Arc;
///
/// let calls = Arc::new(AtomicU32::new(0));
/// let counter = calls.clone();
///
/// let value = eventually(move || {
///     let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
///     if n < 3 { Err(format!("only {} calls", n)) } else { Ok(n) }
/// })
/// .unwrap();
///
/// assert_eq!(value, 3);
/// assert_eq!(calls.load(Ordering::SeqCst), 3);
/// ```
pub fn eventually<T, E, F>(operation: F) -> Result<T, TimeoutFailure<E>>
where
    T: Send + 'static,
    E: std::fmt::Display + Send + 'static,
    F: FnMut() -> Result<T, E> + Send + 'static,
{
    eventually_with(operation, DEFAULT_PATIENCE)
}

/// Retry `operation` with an explicit [`PatienceConfig`] until it returns `Ok`.
///
/// On timeout, the returned [`TimeoutFailure`] carries the config's timeout and
/// interval, the number of failed attempts, and the last failure.
///
/// # Panics
///
/// Attempts run on a worker thread, so this panics if that thread cannot be
/// spawned. A panic raised by `operation` itself is resumed on the caller.
pub fn eventually_with<T, E, F>(operation: F, config: PatienceConfig) -> Result<T, TimeoutFailure<E>>
where
    T: Send + 'static,
    E: std::fmt::Display + Send + 'static,
    F: FnMut() -> Result<T, E> + Send + 'static,
{
    let interval = config.interval();
    let outcome = with_timeout(
        move |cancel, report| retry_loop(operation, interval, cancel, report),
        config.timeout(),
    );
    super::finish(outcome, &config)
}

/// Retry a side-effect-only `action` with the default patience until it
/// runs without panicking.
///
/// Actions fail the way assertions do: by panicking. Each panic is caught
/// and becomes a [`Panicked`] failure. The default panic hook still prints
/// every caught panic.
///
/// # Examples
///
/// ```rust
/// use eventually::eventually_action;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::sync::Arc;
///
/// let ready = Arc::new(AtomicU32::new(0));
/// let probe = ready.clone();
///
/// eventually_action(move || {
///     let seen = probe.fetch_add(1, Ordering::SeqCst);
///     assert!(seen >= 1, "not ready yet");
/// })
/// .unwrap();
/// ```
pub fn eventually_action<F>(action: F) -> Result<(), TimeoutFailure<Panicked>>
where
    F: FnMut() + Send + 'static,
{
    eventually_action_with(action, DEFAULT_PATIENCE)
}

/// Retry a side-effect-only `action` with an explicit [`PatienceConfig`].
pub fn eventually_action_with<F>(
    mut action: F,
    config: PatienceConfig,
) -> Result<(), TimeoutFailure<Panicked>>
where
    F: FnMut() + Send + 'static,
{
    eventually_with(
        move || panic::catch_unwind(AssertUnwindSafe(&mut action)).map_err(Panicked::from_payload),
        config,
    )
}

impl PatienceConfig {
    /// Retry `operation` with this config. See [`eventually_with`].
    pub fn eventually<T, E, F>(&self, operation: F) -> Result<T, TimeoutFailure<E>>
    where
        T: Send + 'static,
        E: std::fmt::Display + Send + 'static,
        F: FnMut() -> Result<T, E> + Send + 'static,
    {
        eventually_with(operation, *self)
    }

    /// Retry `action` with this config. See [`eventually_action_with`].
    pub fn eventually_action<F>(&self, action: F) -> Result<(), TimeoutFailure<Panicked>>
    where
        F: FnMut() + Send + 'static,
    {
        eventually_action_with(action, *self)
    }
}
