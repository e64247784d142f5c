//! Patience configuration: how long to keep trying, and how often.
//!
//! A [`PatienceConfig`] is pure data. It is created once per call (explicitly,
//! or by falling back to [`DEFAULT_PATIENCE`]) and never mutated afterwards.
//!
//! # Examples
//!
//! ```rust
//! use eventually::{PatienceConfig, DEFAULT_PATIENCE};
//! use std::time::Duration;
//!
//! assert_eq!(DEFAULT_PATIENCE.timeout(), Duration::from_millis(150));
//! assert_eq!(DEFAULT_PATIENCE.interval(), Duration::from_millis(15));
//!
//! let patient = PatienceConfig::default().with_timeout(Duration::from_secs(2));
//! assert_eq!(patient.interval(), Duration::from_millis(15));
//! ```

use std::fmt;
use std::time::Duration;

/// The process-wide default: give up after 150ms, retrying every 15ms.
pub const DEFAULT_PATIENCE: PatienceConfig =
    PatienceConfig::new(Duration::from_millis(150), Duration::from_millis(15));

/// Total time budget and retry interval for one `eventually` invocation.
///
/// Both values are [`Duration`]s and therefore never negative. The interval is
/// usually much smaller than the timeout, but that is not enforced: an interval
/// longer than the timeout simply means at most one failed attempt is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatienceConfig {
    timeout: Duration,
    interval: Duration,
}

impl PatienceConfig {
    /// Create a config from an explicit timeout and interval.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eventually::PatienceConfig;
    /// use std::time::Duration;
    ///
    /// let config = PatienceConfig::new(Duration::from_millis(1500), Duration::from_millis(15));
    /// assert_eq!(config.timeout(), Duration::from_millis(1500));
    /// ```
    pub const fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// Replace the total time budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the wait between a failed attempt and the next one.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Total wall-clock budget for the whole retry sequence.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fixed wait between a failed attempt and the next attempt.
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for PatienceConfig {
    fn default() -> Self {
        DEFAULT_PATIENCE
    }
}

impl fmt::Display for PatienceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "timeout {}, interval {}",
            ClockTime(self.timeout),
            ClockTime(self.interval)
        )
    }
}

/// Renders a [`Duration`] as a clock-style time span: `[d.]hh:mm:ss[.fffffff]`.
///
/// The fraction has seven digits (100ns ticks) and is omitted when zero.
///
/// # Examples
///
/// ```rust
/// use eventually::patience::ClockTime;
/// use std::time::Duration;
///
/// assert_eq!(ClockTime(Duration::from_millis(150)).to_string(), "00:00:00.1500000");
/// assert_eq!(ClockTime(Duration::from_secs(2)).to_string(), "00:00:02");
/// assert_eq!(ClockTime(Duration::from_secs(90_061)).to_string(), "1.01:01:01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime(pub Duration);

const NANOS_PER_TICK: u32 = 100;
const SECS_PER_DAY: u64 = 86_400;

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        let days = secs / SECS_PER_DAY;
        let hours = (secs % SECS_PER_DAY) / 3600;
        let minutes = (secs % 3600) / 60;
        let seconds = secs % 60;
        let ticks = self.0.subsec_nanos() / NANOS_PER_TICK;

        if days > 0 {
            write!(f, "{}.", days)?;
        }
        write!(f, "{:02}:{:02}:{:02}", hours, minutes, seconds)?;
        if ticks > 0 {
            write!(f, ".{:07}", ticks)?;
        }
        Ok(())
    }
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl Arbitrary for PatienceConfig {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (0u64..=10_000, 0u64..=1_000)
            .prop_map(|(timeout, interval)| {
                PatienceConfig::new(
                    Duration::from_millis(timeout),
                    Duration::from_millis(interval),
                )
            })
            .boxed()
    }
}
