use thiserror::Error;

const MINUTE_MILLIS: i64 = 1000 * 60;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidRetryPolicy {
    #[error("At least one backoff delay is required")]
    EmptyBackoff,
    #[error("Backoff delays must be positive, got {0} minutes")]
    NonPositiveDelay(i64),
    #[error("Max attempts must be at least 1, got {0}")]
    InvalidMaxAttempts(i32),
}

/// Bounded backoff used to requeue reminders after a transient send failure
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    backoff_minutes: Vec<i64>,
    max_attempts: i32,
}

impl RetryPolicy {
    pub fn new(backoff_minutes: Vec<i64>, max_attempts: i32) -> Result<Self, InvalidRetryPolicy> {
        if backoff_minutes.is_empty() {
            return Err(InvalidRetryPolicy::EmptyBackoff);
        }
        if let Some(delay) = backoff_minutes.iter().find(|d| **d <= 0) {
            return Err(InvalidRetryPolicy::NonPositiveDelay(*delay));
        }
        if max_attempts < 1 {
            return Err(InvalidRetryPolicy::InvalidMaxAttempts(max_attempts));
        }
        Ok(Self {
            backoff_minutes,
            max_attempts,
        })
    }

    pub fn max_attempts(&self) -> i32 {
        self.max_attempts
    }

    pub fn backoff_minutes(&self) -> &[i64] {
        &self.backoff_minutes
    }

    /// Whether another attempt is allowed after `attempts` attempts were made
    pub fn can_retry(&self, attempts: i32) -> bool {
        attempts < self.max_attempts
    }

    /// Delay in millis before the next attempt after the `attempts`-th failure.
    /// The last delay is reused once the list is exhausted.
    pub fn delay_millis(&self, attempts: i32) -> i64 {
        let idx = (attempts.max(1) as usize).min(self.backoff_minutes.len()) - 1;
        self.backoff_minutes[idx] * MINUTE_MILLIS
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            backoff_minutes: vec![1, 5, 30],
            max_attempts: 3,
        }
    }
}
