use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use crate::error::{ELinkError, Result};

const DEFAULT_RATE: f64 = 3.0;

/// Token-bucket pacing for outbound EUtils requests
///
/// NCBI allows 3 requests per second without an API key (one request every
/// ~330ms) and 10 per second with one. Clones share the same bucket, so one
/// limiter can pace every request a process makes.
#[derive(Clone)]
pub struct RateLimiter {
    rate: f64,
    bucket: Arc<Mutex<TokenBucket>>,
}

struct TokenBucket {
    tokens: f64,
    capacity: f64,
    refill_rate: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Create a limiter allowing `rate` requests per second
    ///
    /// A rate that is not finite and positive falls back to the NCBI default
    /// of 3 per second.
    ///
    /// # Example
    ///
    /// ```
    /// use elink_client::rate_limit::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(3.0);
    /// assert_eq!(limiter.min_interval().as_millis(), 333);
    /// ```
    pub fn new(rate: f64) -> Self {
        let rate = if Self::is_usable_rate(rate) {
            rate
        } else {
            warn!(rate, "Unusable rate limit, using the NCBI default");
            DEFAULT_RATE
        };
        let capacity = rate.max(1.0);
        Self {
            rate,
            bucket: Arc::new(Mutex::new(TokenBucket {
                tokens: capacity,
                capacity,
                refill_rate: rate,
                last_refill: Instant::now(),
            })),
        }
    }

    /// 3 requests per second, the limit for callers without an API key
    pub fn ncbi_default() -> Self {
        Self::new(DEFAULT_RATE)
    }

    /// 10 requests per second, the limit for callers with an API key
    pub fn ncbi_with_key() -> Self {
        Self::new(10.0)
    }

    /// Whether `rate` can pace requests: finite and above zero
    pub fn is_usable_rate(rate: f64) -> bool {
        rate.is_finite() && rate > 0.0
    }

    /// Spacing between requests once the initial burst is spent
    pub fn min_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.rate)
    }

    /// Wait until a request may be sent, then consume one token
    #[instrument(skip(self))]
    pub async fn acquire(&self) -> Result<()> {
        let wait_time = {
            let mut bucket = self.bucket.lock().await;
            bucket.refill();

            if bucket.tokens >= 1.0 {
                bucket.tokens -= 1.0;
                debug!(remaining_tokens = %bucket.tokens, "Token acquired immediately");
                None
            } else {
                let missing = 1.0 - bucket.tokens;
                Some(Duration::from_secs_f64(missing / bucket.refill_rate))
            }
        };

        if let Some(duration) = wait_time {
            debug!(
                wait_duration_ms = duration.as_millis(),
                "Sleeping to respect rate limit"
            );
            sleep(duration).await;

            let mut bucket = self.bucket.lock().await;
            bucket.refill();

            // Another task may have taken the refilled token while we slept
            if bucket.tokens >= 1.0 - 1e-9 {
                bucket.tokens = (bucket.tokens - 1.0).max(0.0);
                debug!(remaining_tokens = %bucket.tokens, "Token acquired after waiting");
            } else {
                warn!(tokens = %bucket.tokens, "No token available after waiting");
                return Err(ELinkError::RateLimitExceeded);
            }
        }

        Ok(())
    }

    /// Whether a token could be taken right now, without consuming it
    pub async fn check_available(&self) -> bool {
        let mut bucket = self.bucket.lock().await;
        bucket.refill();
        bucket.tokens >= 1.0
    }

    /// Current token count
    pub async fn token_count(&self) -> f64 {
        let mut bucket = self.bucket.lock().await;
        bucket.refill();
        bucket.tokens
    }

    /// Configured requests per second
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl TokenBucket {
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill);
        let new_tokens = elapsed.as_secs_f64() * self.refill_rate;

        self.tokens = (self.tokens + new_tokens).min(self.capacity);
        self.last_refill = now;
    }
}
