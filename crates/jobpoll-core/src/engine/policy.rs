//! Polling and backoff policy.
//!
//! Two distinct delays live here: the escalating backoff applied after
//! transient failures, and the flat jittered delay used while the job is
//! simply still pending. Pending is an expected steady state, not a fault,
//! so it never escalates.

use rand::Rng;
use std::time::Duration;

/// Polling policy for one client instance. Fixed at construction time so
/// polling frequency stays under the library's control, not the caller's.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Initial polling interval, also the base of the pending delay.
    pub initial: Duration,
    /// Multiplicative backoff growth per transient failure.
    pub factor: f64,
    /// Upper bound on the backoff interval.
    pub max: Duration,
    /// Maximum number of non-terminal attempts before giving up with a soft
    /// `Pending`; `None` means poll forever.
    pub max_retries: Option<u32>,
    /// Bounds of the random component added to `initial` for pending sleeps.
    pub jitter_min: Duration,
    /// See `jitter_min`.
    pub jitter_max: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(1),
            factor: 2.0,
            max: Duration::from_secs(30),
            max_retries: None,
            jitter_min: Duration::from_secs(1),
            jitter_max: Duration::from_secs(4),
        }
    }
}

impl PollPolicy {
    /// Next backoff interval after a transient failure: `min(factor × current, max)`.
    /// Idempotent once the cap is reached.
    pub fn next_backoff(&self, current: Duration) -> Duration {
        current.mul_f64(self.factor).min(self.max)
    }

    /// Jittered delay for a pending (non-error) answer:
    /// `initial + uniform(jitter_min, jitter_max)`.
    pub fn pending_delay(&self) -> Duration {
        let lo = self.jitter_min.as_millis() as u64;
        let hi = self.jitter_max.as_millis() as u64;
        let jitter_ms = if lo >= hi {
            lo
        } else {
            rand::rng().random_range(lo..=hi)
        };
        self.initial + Duration::from_millis(jitter_ms)
    }

    /// True once `attempts` non-terminal iterations have used up the retry
    /// budget.
    pub fn give_up(&self, attempts: u32) -> bool {
        match self.max_retries {
            Some(max) => attempts >= max,
            None => false,
        }
    }
}
