//! Retry logic for transient NCBI API failures
//!
//! Wraps `tokio-retry` with an exponential backoff policy and an error
//! classification trait, so only network-level and server-side failures are
//! retried. Parse failures never reach this layer as retryable.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio_retry::RetryIf;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::{debug, warn};

/// Classification of errors into transient and permanent failures
pub trait RetryableError {
    /// Whether repeating the same request could plausibly succeed
    fn is_retryable(&self) -> bool;

    /// Short human-readable reason used in retry logs
    fn retry_reason(&self) -> &str;
}

/// Backoff policy for retried requests
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: usize,
    /// Delay before the first retry; doubles on every subsequent retry
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Randomize each delay by up to +/-25%
    pub use_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            use_jitter: true,
        }
    }
}

impl RetryConfig {
    /// Create the default retry policy (3 retries, 1s initial delay, 30s cap)
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable retries entirely
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    /// Delay sequence for this policy, one entry per allowed retry
    pub(crate) fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        // ExponentialBackoff yields base^n * factor milliseconds
        let factor = (self.initial_delay.as_millis() as u64 / 2).max(1);
        let use_jitter = self.use_jitter;

        ExponentialBackoff::from_millis(2)
            .factor(factor)
            .max_delay(self.max_delay)
            .map(move |delay| if use_jitter { jitter(delay) } else { delay })
            .take(self.max_retries)
    }
}

fn jitter(delay: Duration) -> Duration {
    let scale = rand::thread_rng().gen_range(0.75..=1.25);
    delay.mul_f64(scale)
}

/// Run `operation`, retrying it according to `config` while it fails with a
/// retryable error.
pub async fn with_retry<F, Fut, T, E>(
    operation: F,
    config: &RetryConfig,
    operation_name: &str,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + Display,
{
    let mut attempt = 0usize;
    let max_retries = config.max_retries;

    let result = RetryIf::spawn(config.delays(), operation, |err: &E| {
        attempt += 1;
        let retry = err.is_retryable() && attempt <= max_retries;
        if retry {
            warn!(
                operation = operation_name,
                attempt,
                max_retries,
                reason = err.retry_reason(),
                error = %err,
                "Retrying after transient failure"
            );
        } else {
            debug!(
                operation = operation_name,
                reason = err.retry_reason(),
                "Not retrying"
            );
        }
        retry
    })
    .await;

    if result.is_err() && attempt > 0 {
        debug!(operation = operation_name, attempts = attempt, "Giving up");
    }

    result
}
