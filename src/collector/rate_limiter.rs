//! Per-domain request spacing
//!
//! The rate limiter owns the run's `RateLimitState` and decides how long the
//! collector must wait before touching a domain again. Each wait samples a
//! fresh delay uniformly from `[min_delay, max_delay]` so requests to one
//! domain never fall into a fixed interval.
//!
//! Two per-domain adjustments sit on top of the sampled delay:
//! - a floor taken from a robots.txt `Crawl-delay`
//! - a back-off penalty that doubles on every HTTP 429 from the domain

use crate::config::CollectorConfig;
use crate::state::RateLimitState;
use rand::Rng;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Upper bound for the accumulated HTTP 429 penalty
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Decides and performs the wait before each request to a domain
#[derive(Debug, Clone)]
pub struct RateLimiter {
    state: RateLimitState,
    min_delay: Duration,
    max_delay: Duration,
    /// Minimum spacing declared by the domain itself (robots.txt)
    floors: HashMap<String, Duration>,
    /// Extra spacing after rate-limit responses
    penalties: HashMap<String, Duration>,
}

impl RateLimiter {
    /// Creates a limiter with empty state
    ///
    /// Bounds given in the wrong order are swapped; configuration validation
    /// rejects that case before a run starts.
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        let (min_delay, max_delay) = if min_delay <= max_delay {
            (min_delay, max_delay)
        } else {
            (max_delay, min_delay)
        };

        Self {
            state: RateLimitState::new(),
            min_delay,
            max_delay,
            floors: HashMap::new(),
            penalties: HashMap::new(),
        }
    }

    pub fn from_config(config: &CollectorConfig) -> Self {
        Self::new(config.min_delay(), config.max_delay())
    }

    /// Waits until `domain` may be requested again, then records the access
    ///
    /// A domain with no recorded access proceeds immediately. Otherwise a
    /// delay is sampled and, if less time than that has passed since the last
    /// access, the caller is suspended for the remainder. The current time is
    /// recorded as the new last access before returning.
    ///
    /// Returns how long the call slept.
    pub async fn wait_if_needed(&mut self, domain: &str) -> Duration {
        let now = Instant::now();
        let mut waited = Duration::ZERO;

        if let Some(elapsed) = self.state.elapsed_since_last(domain, now) {
            let required = self.required_delay(domain);
            if elapsed < required {
                waited = required - elapsed;
                tracing::debug!(
                    domain = %domain,
                    wait_ms = waited.as_millis() as u64,
                    "Waiting before next request to domain"
                );
                tokio::time::sleep(waited).await;
            }
        }

        self.state.record(domain, Instant::now());
        waited
    }

    /// Delay to enforce for the next request to `domain`
    ///
    /// The sampled delay, raised to the domain's floor, plus any penalty.
    pub fn required_delay(&self, domain: &str) -> Duration {
        let sampled = self.sample_delay();
        let floor = self.floors.get(domain).copied().unwrap_or(Duration::ZERO);
        let penalty = self.penalty(domain);

        sampled.max(floor) + penalty
    }

    /// Samples a delay uniformly from the configured bounds
    pub fn sample_delay(&self) -> Duration {
        if self.min_delay == self.max_delay {
            return self.min_delay;
        }
        rand::thread_rng().gen_range(self.min_delay..=self.max_delay)
    }

    /// Records a rate-limit response from `domain`
    ///
    /// The first penalty equals `max_delay` (at least one second); every
    /// further 429 doubles it, capped at `MAX_BACKOFF`. Returns the new
    /// penalty.
    pub fn back_off(&mut self, domain: &str) -> Duration {
        let base = self.max_delay.max(Duration::from_secs(1));
        let penalty = self
            .penalties
            .entry(domain.to_string())
            .and_modify(|p| *p = (*p * 2).min(MAX_BACKOFF))
            .or_insert(base.min(MAX_BACKOFF));
        *penalty
    }

    /// Current penalty for `domain`
    pub fn penalty(&self, domain: &str) -> Duration {
        self.penalties.get(domain).copied().unwrap_or(Duration::ZERO)
    }

    /// Raises the minimum spacing for `domain`
    pub fn set_floor(&mut self, domain: &str, floor: Duration) {
        self.floors.insert(domain.to_string(), floor);
    }

    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    pub fn state(&self) -> &RateLimitState {
        &self.state
    }
}
