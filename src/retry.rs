use std::time::Duration;

/// Configures the bounded retry loop with geometric backoff.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryConfig {
    /// Total number of attempts, the first one included. Values below 1 act as 1.
    pub max_attempts: usize,
    /// Delay after the first failed attempt.
    pub initial_interval: Duration,
    /// Upper bound for any single delay.
    pub max_interval: Duration,
    /// Multiplier applied per attempt.
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(30),
            backoff_factor: 2.0,
        }
    }
}

impl RetryConfig {
    /// Disables retries: every request is attempted exactly once.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub(crate) fn attempts(&self) -> usize {
        self.max_attempts.max(1)
    }

    /// Delay to wait after failed attempt `attempt` (0-indexed):
    /// `min(initial_interval * backoff_factor^attempt, max_interval)`.
    pub fn backoff(&self, attempt: usize) -> Duration {
        let exp = attempt.min(i32::MAX as usize) as i32;
        let multiplier = self.backoff_factor.powi(exp);
        let nanos = self.initial_interval.as_nanos() as f64 * multiplier;
        if !nanos.is_finite() || nanos >= self.max_interval.as_nanos() as f64 {
            return self.max_interval;
        }
        Duration::from_nanos(nanos.max(0.0).round() as u64)
    }
}

/// `429 Too Many Requests` and every `5xx` are retried.
pub(crate) fn should_retry(status: u16) -> bool {
    status == 429 || (500..=599).contains(&status)
}
