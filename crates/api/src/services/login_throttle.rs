//! Per-badge login throttling.
//!
//! One keyed governor limiter tracks every badge number seen at login, so
//! guessing at one account never locks out another. Badge numbers come from
//! unauthenticated callers; `prune` drops entries whose budget has fully
//! refilled and must run periodically to keep the key set bounded.

use governor::{
    clock::{Clock, DefaultClock},
    middleware::NoOpMiddleware,
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter,
};
use std::num::NonZeroU32;

type BadgeRateLimiter<C> =
    RateLimiter<String, DefaultKeyedStateStore<String>, C, NoOpMiddleware<<C as Clock>::Instant>>;

pub struct LoginThrottle<C: Clock = DefaultClock> {
    limiter: BadgeRateLimiter<C>,
    attempts_per_minute: u32,
}

impl LoginThrottle {
    /// Returns `None` when `attempts_per_minute` is zero (throttling disabled).
    pub fn new(attempts_per_minute: u32) -> Option<Self> {
        Self::with_clock(attempts_per_minute, DefaultClock::default())
    }
}

impl<C: Clock> LoginThrottle<C> {
    pub fn with_clock(attempts_per_minute: u32, clock: C) -> Option<Self> {
        let per_minute = NonZeroU32::new(attempts_per_minute)?;
        Some(Self {
            limiter: RateLimiter::new(
                Quota::per_minute(per_minute),
                DefaultKeyedStateStore::default(),
                clock,
            ),
            attempts_per_minute,
        })
    }

    /// Consumes one attempt for the badge.
    /// Returns the seconds to wait when the badge is over quota.
    pub fn check(&self, badge_number: &str) -> Result<(), u64> {
        match self.limiter.check_key(&badge_number.to_string()) {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let wait = not_until.wait_time_from(self.limiter.clock().now());
                Err(wait.as_secs().max(1))
            }
        }
    }

    /// Forgets badges whose attempts have fully replenished.
    /// Returns how many were dropped.
    pub fn prune(&self) -> usize {
        let before = self.limiter.len();
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        before.saturating_sub(self.limiter.len())
    }

    /// Badges currently holding throttle state.
    pub fn tracked_badges(&self) -> usize {
        self.limiter.len()
    }

    pub fn attempts_per_minute(&self) -> u32 {
        self.attempts_per_minute
    }
}

impl<C: Clock> std::fmt::Debug for LoginThrottle<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginThrottle")
            .field("attempts_per_minute", &self.attempts_per_minute)
            .field("tracked_badges", &self.tracked_badges())
            .finish()
    }
}
