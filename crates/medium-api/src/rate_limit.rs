//! Client-side request throttling.
//!
//! RapidAPI plans are metered as "n requests per p seconds". The limiter
//! is a GCRA bucket holding `n` permits that refill one every `p / n`.

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota,
};
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::debug;

type DirectLimiter = governor::RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Shared "n requests per period" limiter. Disabled when either bound is zero.
pub struct RateLimiter {
    inner: Option<DirectLimiter>,
    requests: u32,
    period: Duration,
}

impl RateLimiter {
    /// Allow `requests` calls per `period`
    pub fn new(requests: u32, period: Duration) -> Self {
        let inner = NonZeroU32::new(requests)
            .filter(|_| !period.is_zero())
            .and_then(|burst| {
                // governor rejects a zero replenish interval
                let interval = (period / requests).max(Duration::from_nanos(1));
                Quota::with_period(interval).map(|q| q.allow_burst(burst))
            })
            .map(DirectLimiter::direct);

        RateLimiter {
            inner,
            requests,
            period,
        }
    }

    /// A limiter that never waits
    pub fn unlimited() -> Self {
        RateLimiter {
            inner: None,
            requests: 0,
            period: Duration::ZERO,
        }
    }

    /// Whether requests are being throttled at all
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Wait until a permit is available, then consume it
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.inner {
            if limiter.check().is_ok() {
                return;
            }
            debug!(
                requests = self.requests,
                period_ms = self.period.as_millis() as u64,
                "Rate limit reached, waiting for a permit"
            );
            limiter.until_ready().await;
        }
    }

    /// Consume a permit if one is available right now
    pub fn try_acquire(&self) -> bool {
        match &self.inner {
            Some(limiter) => limiter.check().is_ok(),
            None => true,
        }
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("requests", &self.requests)
            .field("period", &self.period)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_burst_then_denied() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[test]
    fn test_zero_bounds_disable_limiter() {
        assert!(!RateLimiter::new(0, Duration::from_secs(60)).is_enabled());
        assert!(!RateLimiter::new(10, Duration::ZERO).is_enabled());
        let limiter = RateLimiter::unlimited();
        for _ in 0..1_000 {
            assert!(limiter.try_acquire());
        }
    }

    #[test]
    fn test_sub_nanosecond_interval_still_limits() {
        // 1µs / 1_000_000 rounds down to a zero interval
        let limiter = RateLimiter::new(1_000_000, Duration::from_micros(1));
        assert!(limiter.is_enabled());
        assert!(limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_acquire_waits_for_replenish() {
        let limiter = RateLimiter::new(2, Duration::from_millis(200));
        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;
        // third permit refills after period / requests = 100ms
        assert!(start.elapsed() >= Duration::from_millis(80));
    }
}
