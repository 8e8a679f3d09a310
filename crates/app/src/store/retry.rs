//! Bounded retry for optimistic-commit conflicts.
//!
//! A conflicted commit is ordinary under contention; callers re-run the
//! transaction after a short backoff. The policy bounds both the attempt
//! count and the total elapsed time so a contended checkout can never hang:
//! exhausting either budget surfaces as a transaction failure.

use std::time::Duration;

use rand::Rng;

/// Exponential backoff with jitter, capped delay, and bounded attempts and
/// elapsed time.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Backoff before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on a single backoff.
    pub max_delay: Duration,
    /// Growth factor per retry.
    pub multiplier: f64,
    /// Upper bound on total time spent, checked before every retry.
    pub max_elapsed: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(25),
            max_delay: Duration::from_millis(250),
            multiplier: 2.0,
            max_elapsed: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Whether another attempt fits in the budget after `attempts` have run
    /// and `elapsed` time has passed.
    #[must_use]
    pub fn allows_retry(&self, attempts: u32, elapsed: Duration) -> bool {
        attempts < self.max_attempts && elapsed < self.max_elapsed
    }

    /// Backoff before retry number `retry` (zero-based): exponential growth
    /// capped at [`RetryPolicy::max_delay`], then jittered to a random point
    /// in the upper half so synchronized retries spread out.
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let scaled = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped = scaled.min(self.max_delay.as_secs_f64());

        let jitter = rand::thread_rng().gen_range(0.5..=1.0);

        Duration::from_secs_f64(capped * jitter)
    }
}
