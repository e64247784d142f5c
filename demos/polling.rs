//! Polling Example
//!
//! Demonstrates waiting for eventually-consistent state:
//! - Blocking wait on a value written by another thread
//! - Assertion-style wait with `eventually_action`
//! - Suspending wait inside a tokio task
//! - Reading the diagnostics of a timeout

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use eventually::prelude::*;

// ==================== Blocking ====================

/// Example 1: wait for a counter bumped by a background thread
fn example_blocking() {
    println!("\n=== Example 1: Blocking Wait ===");

    let counter = Arc::new(AtomicU32::new(0));
    let bumper = counter.clone();
    std::thread::spawn(move || {
        for _ in 0..5 {
            std::thread::sleep(Duration::from_millis(10));
            bumper.fetch_add(1, Ordering::SeqCst);
        }
    });

    let config = PatienceConfig::new(Duration::from_secs(1), Duration::from_millis(5));
    let probe = counter.clone();
    match eventually_with(
        move || match probe.load(Ordering::SeqCst) {
            n if n >= 5 => Ok(n),
            n => Err(format!("counter at {}", n)),
        },
        config,
    ) {
        Ok(n) => println!("  Counter reached {}", n),
        Err(failure) => println!("  {}", failure),
    }
}

/// Example 2: assertion-style wait
fn example_action() {
    println!("\n=== Example 2: Assertion-Style Wait ===");

    let ready = Arc::new(AtomicU32::new(0));
    let probe = ready.clone();
    std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(30));
        ready.store(1, Ordering::SeqCst);
    });

    let result = PatienceConfig::default()
        .with_timeout(Duration::from_millis(500))
        .eventually_action(move || assert_eq!(probe.load(Ordering::SeqCst), 1));
    println!("  Ready: {}", result.is_ok());
}

// ==================== Diagnostics ====================

/// Example 3: what a timeout tells you
fn example_timeout() {
    println!("\n=== Example 3: Timeout Diagnostics ===");

    let failure = eventually(|| Err::<(), _>("service unavailable")).unwrap_err();
    println!("  Message:  {}", failure);
    println!("  Attempts: {:?}", failure.attempts());
    println!("  Timeout:  {:?}", failure.timeout());
    println!("  Interval: {:?}", failure.interval());

    let config = PatienceConfig::new(Duration::from_millis(20), Duration::from_millis(5));
    let stuck = eventually_with(
        || {
            std::thread::sleep(Duration::from_millis(200));
            Ok::<_, String>(())
        },
        config,
    )
    .unwrap_err();
    println!("  Stuck:    {}", stuck);
}

// ==================== Suspending ====================

/// Example 4: suspending wait in a tokio task
async fn example_suspending() {
    println!("\n=== Example 4: Suspending Wait ===");

    let (tx, rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(25)).await;
        let _ = tx.send(true);
    });

    let result = eventually_async(|| {
        let done = *rx.borrow();
        async move {
            if done {
                Ok("job finished")
            } else {
                Err("job still running")
            }
        }
    })
    .await;
    println!("  {:?}", result.map_err(|failure| failure.to_string()));
}

#[tokio::main]
async fn main() {
    // timeouts are also logged as warnings
    #[cfg(feature = "tracing")]
    tracing_subscriber::fmt::init();

    println!("Eventually Polling Examples");
    println!("===========================");

    example_blocking();
    example_action();
    example_timeout();
    example_suspending().await;

    println!("\n=== All examples completed ===");
}
