//! Bounded exponential-backoff retry
//!
//! Wraps any fallible async operation. The delay starts at
//! `initial_delay` and doubles after every failed attempt; no jitter is added.

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};

/// Retry bounds for one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Wait before the first retry
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
        }
    }

    /// Single attempt, no waiting
    #[allow(dead_code)]
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }
}

/// Progress of one `retry` call. Attempts only go down, the delay only goes up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    pub attempts_remaining: u32,
    pub current_delay: Duration,
}

impl RetryState {
    fn start(policy: &RetryPolicy) -> Self {
        Self {
            attempts_remaining: policy.max_retries,
            current_delay: policy.initial_delay,
        }
    }

    /// Advance past one failed attempt, returning the delay to wait first.
    /// `None` once no retries remain.
    fn next(&mut self) -> Option<Duration> {
        if self.attempts_remaining == 0 {
            return None;
        }
        let wait = self.current_delay;
        self.attempts_remaining -= 1;
        self.current_delay = self.current_delay.saturating_mul(2);
        Some(wait)
    }
}

/// Run `operation` until it succeeds or the retry budget is spent.
///
/// Makes at most `1 + policy.max_retries` attempts and returns the last
/// error unchanged. Every error is treated as retryable.
pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut state = RetryState::start(&policy);

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => match state.next() {
                None => {
                    debug!("Giving up after {} retries: {}", policy.max_retries, err);
                    return Err(err);
                }
                Some(wait) => {
                    warn!(
                        "Call failed: {}. Retrying in {:?} ({} attempts left)",
                        err,
                        wait,
                        state.attempts_remaining + 1
                    );
                    tokio::time::sleep(wait).await;
                }
            },
        }
    }
}
