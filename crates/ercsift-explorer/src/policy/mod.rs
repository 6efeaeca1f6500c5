//! Resilience policies applied to every outbound call.

pub mod rate_limiter;
pub mod retry;

pub use rate_limiter::{RateLimiter, RateLimiterConfig, TokenBucket};
pub use retry::{with_retry, RetryConfig, RetryPolicy};
