//! Behavioral tests for the `eventually` composers, blocking and suspending.

use super::*;
use crate::patience::{PatienceConfig, DEFAULT_PATIENCE};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Stand-in for a bare exception: no message of its own.
#[derive(Debug, Clone, PartialEq)]
struct Exception;

impl std::fmt::Display for Exception {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Exception of type 'Exception' was thrown.")
    }
}

fn expected_exhausted_message(attempts: u32) -> String {
    format!(
        "The code passed to eventually never returned normally. Attempted {} times over \
         00:00:00.1500000. Last failure message: Exception of type 'Exception' was thrown.",
        attempts
    )
}

#[test]
fn test_returns_value_on_first_success() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();

    let result = eventually(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok::<_, Exception>(99)
    });

    assert_eq!(result, Ok(99));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_invokes_five_times_after_four_failures() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();

    let result = eventually(move || {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        if n < 5 {
            Err(Exception)
        } else {
            Ok(n)
        }
    });

    assert_eq!(result, Ok(5));
    assert_eq!(calls.load(Ordering::SeqCst), 5);
}

#[test]
fn test_always_failing_reports_attempts_and_last_failure() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();

    let failure = eventually(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Err::<(), _>(Exception)
    })
    .unwrap_err();

    // an attempt started right at the deadline is abandoned, not counted
    let attempts = failure.attempts().expect("attempts were recorded");
    let calls = calls.load(Ordering::SeqCst);
    assert!(attempts == calls || attempts + 1 == calls, "{} vs {}", attempts, calls);
    assert_eq!(failure.message(), expected_exhausted_message(attempts));
    assert_eq!(failure.last_failure(), Some(&Exception));
    assert_eq!(failure.timeout(), Duration::from_millis(150));
    assert_eq!(failure.interval(), Duration::from_millis(15));
}

#[test]
fn test_last_failure_is_from_final_attempt() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();

    let failure = eventually(move || {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        Err::<(), _>(format!("attempt {}", n))
    })
    .unwrap_err();

    let attempts = failure.attempts().unwrap();
    assert_eq!(
        failure.last_failure().map(String::as_str),
        Some(format!("attempt {}", attempts).as_str())
    );
    assert!(failure.message().ends_with(&format!("Last failure message: attempt {}", attempts)));
}

#[test]
fn test_default_patience_waits_at_least_150ms() {
    let started: Arc<Mutex<Option<Instant>>> = Arc::new(Mutex::new(None));
    let first_call = started.clone();

    let result = eventually(move || {
        first_call.lock().unwrap().get_or_insert_with(Instant::now);
        Err::<(), _>("1 + 1 should be 3")
    });

    assert!(result.is_err());
    let started = started.lock().unwrap().take().expect("operation ran");
    assert!(started.elapsed() >= Duration::from_millis(150));
}

#[test]
fn test_custom_timeout_is_respected() {
    let config = PatienceConfig::new(Duration::from_millis(1500), Duration::from_millis(15));
    let start = Instant::now();

    let failure = eventually_with(|| Err::<(), _>("1 + 1 should be 3"), config).unwrap_err();

    assert!(start.elapsed() >= Duration::from_millis(1500));
    assert_eq!(failure.timeout(), config.timeout());
    assert_eq!(failure.interval(), config.interval());
    assert!(failure.message().contains("over 00:00:01.5000000."));
}

#[test]
fn test_single_attempt_longer_than_timeout_is_timed_out() {
    let config = PatienceConfig::new(Duration::from_millis(50), Duration::from_millis(5));
    let start = Instant::now();

    let failure = eventually_with(
        || {
            std::thread::sleep(Duration::from_millis(400));
            Err::<(), _>(Exception)
        },
        config,
    )
    .unwrap_err();

    assert!(start.elapsed() < Duration::from_millis(400));
    assert_eq!(failure.attempts(), None);
    assert!(failure.last_failure().is_none());
    assert_eq!(
        failure.message(),
        "The code passed to eventually did not complete and was ended after \
         00:00:00.0500000 timeout."
    );
}

#[test]
fn test_action_returns_after_assertion_passes() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();

    eventually_action(move || {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        assert!(n >= 3, "only {} calls so far", n);
    })
    .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_action_failure_includes_assertion_message() {
    let failure = eventually_action(|| assert_eq!(1 + 1, 3)).unwrap_err();

    assert!(failure
        .message()
        .starts_with("The code passed to eventually never returned normally. Attempted "));
    assert!(failure.message().contains("assertion `left == right` failed"));
    assert_eq!(failure.timeout(), DEFAULT_PATIENCE.timeout());
}

#[cfg(feature = "async")]
mod suspending {
    use super::*;

    #[tokio::test]
    async fn test_returns_value_on_first_success() {
        let mut calls = 0;
        let result = eventually_async(|| {
            calls += 1;
            async { Ok::<_, Exception>(99) }
        })
        .await;

        assert_eq!(result, Ok(99));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_invokes_five_times_after_four_failures() {
        let calls = Arc::new(AtomicU32::new(0));

        let result = eventually_async(|| {
            let calls = calls.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 5 {
                    Err(Exception)
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(5));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_always_failing_reports_attempts_and_last_failure() {
        let mut calls = 0u32;

        let failure = eventually_async(|| {
            calls += 1;
            async { Err::<(), _>(Exception) }
        })
        .await
        .unwrap_err();

        let attempts = failure.attempts().expect("attempts were recorded");
        assert_eq!(attempts, calls);
        assert_eq!(failure.message(), expected_exhausted_message(attempts));
        assert_eq!(failure.interval(), Duration::from_millis(15));
        assert_eq!(failure.timeout(), Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_default_patience_waits_at_least_150ms() {
        let mut started: Option<Instant> = None;

        let result = eventually_async(|| {
            started.get_or_insert_with(Instant::now);
            async { Err::<(), _>("1 + 1 should be 3") }
        })
        .await;

        assert!(result.is_err());
        assert!(started.unwrap().elapsed() >= Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_custom_timeout_is_respected() {
        let config = PatienceConfig::new(Duration::from_millis(1500), Duration::from_millis(15));
        let start = Instant::now();

        let failure = eventually_async_with(|| async { Err::<(), _>("nope") }, config)
            .await
            .unwrap_err();

        assert!(start.elapsed() >= Duration::from_millis(1500));
        assert_eq!(failure.timeout(), config.timeout());
        assert_eq!(failure.interval(), config.interval());
    }

    #[tokio::test]
    async fn test_action_retries_until_assertion_passes() {
        let calls = Arc::new(AtomicU32::new(0));

        eventually_action_async(|| {
            let calls = calls.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                assert!(n >= 2);
            }
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_invocations_do_not_interfere() {
        let config = PatienceConfig::new(Duration::from_millis(300), Duration::from_millis(5));

        let fast = config.eventually_async(|| async { Ok::<_, String>("fast") });
        let mut slow_calls = 0;
        let slow = config.eventually_async(|| {
            slow_calls += 1;
            let n = slow_calls;
            async move { if n < 4 { Err(format!("slow {}", n)) } else { Ok("slow") } }
        });
        let never = config.eventually_async(|| async { Err::<&str, _>("never") });

        let (fast, slow, never) = tokio::join!(fast, slow, never);
        assert_eq!(fast, Ok("fast"));
        assert_eq!(slow, Ok("slow"));
        assert_eq!(never.unwrap_err().last_failure(), Some(&"never"));
    }

    #[test]
    fn test_blocking_and_suspending_agree() {
        let config = PatienceConfig::new(Duration::from_millis(200), Duration::from_millis(2));
        let script = |n: u32| if n < 3 { Err(format!("fail {}", n)) } else { Ok(n * 2) };

        let blocking_calls = Arc::new(AtomicU32::new(0));
        let counter = blocking_calls.clone();
        let blocking = eventually_with(
            move || script(counter.fetch_add(1, Ordering::SeqCst) + 1),
            config,
        );

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let mut suspending_calls = 0;
        let suspending = runtime.block_on(config.eventually_async(|| {
            suspending_calls += 1;
            let result = script(suspending_calls);
            async move { result }
        }));

        assert_eq!(blocking, suspending);
        assert_eq!(blocking, Ok(6));
        assert_eq!(blocking_calls.load(Ordering::SeqCst), suspending_calls);

        let blocking_failure = eventually_with(|| Err::<(), _>(Exception), config).unwrap_err();
        let suspending_failure = runtime
            .block_on(eventually_async_with(|| async { Err::<(), _>(Exception) }, config))
            .unwrap_err();
        let shape = |message: &str| {
            message
                .split_once("Attempted ")
                .and_then(|(_, rest)| rest.split_once(" times"))
                .map(|(_, tail)| tail.to_string())
        };
        assert_eq!(shape(blocking_failure.message()), shape(suspending_failure.message()));
        assert!(shape(blocking_failure.message()).is_some());

        let expired = PatienceConfig::new(Duration::ZERO, Duration::from_millis(2));
        let blocking = eventually_with(|| Ok::<_, Exception>(1), expired).unwrap_err();
        let suspending = runtime
            .block_on(eventually_async_with(|| async { Ok::<_, Exception>(1) }, expired))
            .unwrap_err();
        assert_eq!(blocking.message(), suspending.message());
        assert_eq!(blocking.attempts(), suspending.attempts());
        assert!(!blocking.is_exhausted());

        let blocking = eventually_with(|| Err::<(), _>(Exception), expired).unwrap_err();
        let suspending = runtime
            .block_on(eventually_async_with(|| async { Err::<(), _>(Exception) }, expired))
            .unwrap_err();
        assert_eq!(blocking.message(), suspending.message());
        assert_eq!(suspending.attempts(), None);
    }
}

#[cfg(feature = "tracing")]
mod logging {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_timeout_is_logged_as_warning() {
        let config = PatienceConfig::new(Duration::from_millis(30), Duration::from_millis(5));
        let _ = eventually_with(|| Err::<(), _>(Exception), config);

        assert!(logs_contain("WARN"));
        assert!(logs_contain("never returned normally"));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    #[traced_test]
    async fn test_failed_attempts_are_logged() {
        let config = PatienceConfig::new(Duration::from_millis(30), Duration::from_millis(5));
        let mut calls = 0;
        let result = eventually_async_with(
            || {
                calls += 1;
                let n = calls;
                async move { if n < 2 { Err("cold") } else { Ok(n) } }
            },
            config,
        )
        .await;

        assert_eq!(result, Ok(2));
        assert!(logs_contain("eventually attempt failed, retrying"));
        assert!(logs_contain("eventually succeeded"));
    }
}
