//! Rate limiting for dial attempts.
//!
//! Token bucket pacing shared by every probe of a scan.

use governor::{DefaultDirectRateLimiter, Quota};
use std::num::NonZeroU32;
use std::sync::Arc;

/// A shared token bucket limiting dial attempts per second.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl RateLimiter {
    /// Create a limiter allowing `rate` attempts per second.
    ///
    /// Returns `None` for a rate of 0, which means unlimited.
    pub fn new(rate: u32) -> Option<Self> {
        let rate = NonZeroU32::new(rate)?;
        Some(Self {
            limiter: Arc::new(DefaultDirectRateLimiter::direct(Quota::per_second(rate))),
        })
    }

    /// Wait until the bucket allows another attempt.
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Take a token without waiting. Returns `false` if none is available.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}
