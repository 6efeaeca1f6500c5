//! Token bucket rate limiter.
//!
//! Tokens accrue at `refill_rate` per second up to `capacity`; each outbound
//! call consumes one. [`RateLimiter::acquire`] sleeps until a token is free,
//! which keeps the client under the explorer's per-key quota instead of
//! provoking 429s.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum tokens in the bucket.
    pub capacity: f64,
    /// Token refill rate (tokens per second).
    pub refill_rate: f64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        // Etherscan free tier: 5 calls/second
        Self {
            capacity: 5.0,
            refill_rate: 5.0,
        }
    }
}

impl RateLimiterConfig {
    /// Bucket sized for one second of traffic. Rates below 0.01/s are
    /// raised to 0.01/s so the bucket always refills.
    pub fn per_second(rate: f64) -> Self {
        let rate = rate.max(0.01);
        Self {
            capacity: rate.max(1.0),
            refill_rate: rate,
        }
    }
}

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Thread-safe token bucket.
pub struct TokenBucket {
    config: RateLimiterConfig,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            state: Mutex::new(BucketState {
                tokens: config.capacity,
                last_refill: Instant::now(),
            }),
            config,
        }
    }

    /// Consume `cost` tokens if available.
    pub fn try_acquire(&self, cost: f64) -> bool {
        let mut state = self.lock();
        self.refill(&mut state);
        if state.tokens >= cost {
            state.tokens -= cost;
            true
        } else {
            false
        }
    }

    /// Estimated wait before `cost` tokens are available.
    pub fn wait_time(&self, cost: f64) -> Duration {
        let mut state = self.lock();
        self.refill(&mut state);
        let deficit = cost - state.tokens;
        if deficit <= 0.0 || self.config.refill_rate <= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(deficit / self.config.refill_rate)
        }
    }

    pub fn available(&self) -> f64 {
        let mut state = self.lock();
        self.refill(&mut state);
        state.tokens
    }

    fn lock(&self) -> MutexGuard<'_, BucketState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn refill(&self, state: &mut BucketState) {
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.config.refill_rate).min(self.config.capacity);
        state.last_refill = now;
    }
}

/// Async pacing wrapper around [`TokenBucket`].
pub struct RateLimiter {
    bucket: TokenBucket,
    /// Tokens consumed per call
    pub default_cost: f64,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            bucket: TokenBucket::new(config),
            default_cost: 1.0,
        }
    }

    pub fn try_acquire(&self) -> bool {
        self.bucket.try_acquire(self.default_cost)
    }

    pub fn wait_time(&self) -> Duration {
        self.bucket.wait_time(self.default_cost)
    }

    /// Wait until a token is available, then consume it.
    pub async fn acquire(&self) {
        while !self.try_acquire() {
            let wait = self.wait_time().max(Duration::from_millis(1));
            tokio::time::sleep(wait).await;
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimiterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_within_capacity() {
        let rl = RateLimiter::new(RateLimiterConfig {
            capacity: 5.0,
            refill_rate: 1.0,
        });
        for _ in 0..5 {
            assert!(rl.try_acquire(), "should succeed within capacity");
        }
    }

    #[test]
    fn reject_when_empty() {
        let rl = RateLimiter::new(RateLimiterConfig {
            capacity: 2.0,
            refill_rate: 0.0001,
        });
        rl.try_acquire();
        rl.try_acquire();
        assert!(!rl.try_acquire(), "should be rate limited");
    }

    #[test]
    fn wait_time_when_empty() {
        let rl = RateLimiter::new(RateLimiterConfig {
            capacity: 1.0,
            refill_rate: 10.0,
        });
        rl.try_acquire();
        let wait = rl.wait_time();
        assert!(wait.as_millis() <= 150, "unexpected wait time: {wait:?}");
    }

    #[tokio::test]
    async fn acquire_waits_for_refill() {
        let rl = RateLimiter::new(RateLimiterConfig {
            capacity: 1.0,
            refill_rate: 50.0,
        });
        rl.acquire().await;
        let start = Instant::now();
        rl.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(5));
    }
}
