//! Per-source rate limiting over a sliding one-minute window.
//!
//! Wraps the governor crate's direct rate limiter. The quota allows the
//! full window size as a burst, refilling continuously, which matches the
//! "n requests per sliding 60 seconds" contract of the upstream sources.
//! All timing uses governor's monotonic clock, immune to wall-clock
//! adjustments.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};

use crate::error::HarvestError;

/// Sliding-window rate limiter shared by a source's scanner and harvester.
///
/// Two concurrent pipelines for the same source should share one limiter
/// (clone the `Arc` it is usually wrapped in).
pub struct SourceRateLimiter {
    limiter: DefaultDirectRateLimiter,
    clock: DefaultClock,
    requests_per_minute: u32,
}

impl SourceRateLimiter {
    /// Build a limiter admitting `requests_per_minute` calls per sliding
    /// minute. Callers validate the value in their configs first.
    pub fn per_minute(requests_per_minute: NonZeroU32) -> Self {
        let quota = Quota::per_minute(requests_per_minute).allow_burst(requests_per_minute);
        Self {
            limiter: RateLimiter::direct(quota),
            clock: DefaultClock::default(),
            requests_per_minute: requests_per_minute.get(),
        }
    }

    /// Configured window size.
    pub fn requests_per_minute(&self) -> u32 {
        self.requests_per_minute
    }

    /// Wait until a permit is available. Used where pacing is preferable
    /// to failing, e.g. per-item detail fetches.
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }

    /// Take a permit or report saturation with a retry hint. Used by
    /// scanners so local saturation surfaces as a `RATE_LIMITED` outcome
    /// instead of an unbounded wait.
    pub fn try_acquire(&self) -> Result<(), HarvestError> {
        self.limiter.check().map_err(|not_until| {
            let retry_after = not_until.wait_time_from(self.clock.now());
            HarvestError::RateLimited {
                retry_after: retry_after.max(Duration::from_millis(1)),
            }
        })
    }
}
