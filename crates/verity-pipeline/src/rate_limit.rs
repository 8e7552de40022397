//! Knowledge-base pacing
//!
//! A [`RateLimiter`] is shared by every user of a pipeline, so query volume
//! toward the knowledge base stays bounded no matter how many claims or
//! requests are in flight.

use crate::clock::Clock;
use crate::config::{KnowledgeBaseConfig, Pacing};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

/// Paces calls toward a rate-limited service
pub trait RateLimiter: Send + Sync {
    /// Wait until one more attempt is allowed
    fn acquire(&self);

    /// Called once after a query completes, whatever its outcome
    fn settle(&self) {}
}

/// No pacing at all
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

impl RateLimiter for Unlimited {
    fn acquire(&self) {}
}

/// Fixed pause after every completed query
pub struct FixedPause {
    clock: Arc<dyn Clock>,
    pause: Duration,
}

impl FixedPause {
    /// Pause for `pause` after each query
    pub fn new(clock: Arc<dyn Clock>, pause: Duration) -> Self {
        Self { clock, pause }
    }
}

impl RateLimiter for FixedPause {
    fn acquire(&self) {}

    fn settle(&self) {
        self.clock.sleep(self.pause);
    }
}

/// Token bucket: one token per `interval`, at most `burst` banked
///
/// Callers reserve a token under the lock and sleep outside it. A reservation
/// may drive the balance negative, which makes later callers wait longer.
pub struct TokenBucket {
    clock: Arc<dyn Clock>,
    interval: Duration,
    burst: f64,
    state: Mutex<BucketState>,
}

struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a full bucket
    pub fn new(clock: Arc<dyn Clock>, interval: Duration, burst: u32) -> Self {
        let burst = f64::from(burst.max(1));
        let now = clock.now();
        Self {
            clock,
            interval,
            burst,
            state: Mutex::new(BucketState {
                tokens: burst,
                last_refill: now,
            }),
        }
    }

    /// Reserve a token and return how long the caller must wait for it
    fn reserve(&self) -> Duration {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = self.clock.now();
        let interval = self.interval.as_secs_f64();

        if interval > 0.0 {
            let elapsed = now.saturating_duration_since(state.last_refill).as_secs_f64();
            state.tokens = (state.tokens + elapsed / interval).min(self.burst);
        } else {
            state.tokens = self.burst;
        }
        state.last_refill = now;
        state.tokens -= 1.0;

        if state.tokens >= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(-state.tokens * interval)
        }
    }
}

impl RateLimiter for TokenBucket {
    fn acquire(&self) {
        let wait = self.reserve();
        if !wait.is_zero() {
            debug!("Knowledge-base pacing: waiting {:?}", wait);
            self.clock.sleep(wait);
        }
    }
}

/// Build the limiter selected by the knowledge-base configuration
pub fn from_config(config: &KnowledgeBaseConfig, clock: Arc<dyn Clock>) -> Arc<dyn RateLimiter> {
    match config.pacing {
        Pacing::TokenBucket => Arc::new(TokenBucket::new(
            clock,
            config.pacing_interval(),
            config.burst,
        )),
        Pacing::FixedPause => Arc::new(FixedPause::new(clock, config.pacing_interval())),
        Pacing::Unlimited => Arc::new(Unlimited),
    }
}
