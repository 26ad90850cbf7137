use backoff::{backoff::Backoff, ExponentialBackoff};
use std::time::Duration;

use super::errors::GeminiError;

/// HTTP statuses worth retrying against the same model.
pub const RETRIABLE_STATUS: [u16; 2] = [429, 503];

pub fn is_retriable_status(status: u16) -> bool {
    RETRIABLE_STATUS.contains(&status)
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts per candidate, including the first one.
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(300),
            multiplier: 2.0,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    fn backoff(&self) -> ExponentialBackoff {
        let mut backoff = ExponentialBackoff {
            initial_interval: self.base_delay,
            max_interval: self.max_delay,
            multiplier: self.multiplier,
            randomization_factor: 0.0,
            max_elapsed_time: None,
            ..Default::default()
        };
        // current_interval still holds the crate default until reset
        backoff.reset();
        backoff
    }
}

/// Attempt bookkeeping for a single candidate. A new state is created for
/// every candidate, so backoff never carries over between models.
pub struct RetryState {
    max_attempts: usize,
    backoff: ExponentialBackoff,
    attempt_count: usize,
    last_error: Option<String>,
}

impl RetryState {
    pub fn new(policy: &RetryPolicy) -> Self {
        Self {
            max_attempts: policy.max_attempts.max(1),
            backoff: policy.backoff(),
            attempt_count: 0,
            last_error: None,
        }
    }

    pub fn begin_attempt(&mut self) -> usize {
        self.attempt_count += 1;
        self.attempt_count
    }

    pub fn attempts(&self) -> usize {
        self.attempt_count
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Records the failed attempt and returns the delay before the next one,
    /// or `None` when the candidate should be abandoned.
    pub fn next_delay(&mut self, error: &GeminiError) -> Option<Duration> {
        self.last_error = Some(error.to_string());

        if !error.is_transient() || self.attempt_count >= self.max_attempts {
            return None;
        }

        self.backoff.next_backoff()
    }
}
