use std::collections::HashMap;
use tokio::time::Instant;

/// Last access time per domain
///
/// Grows monotonically for the lifetime of one run. Only the `RateLimiter`
/// mutates it.
#[derive(Debug, Clone, Default)]
pub struct RateLimitState {
    last_access: HashMap<String, Instant>,
}

impl RateLimitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns when `domain` was last accessed, if ever
    pub fn last_access(&self, domain: &str) -> Option<Instant> {
        self.last_access.get(domain).copied()
    }

    /// Records an access to `domain` at `now`
    pub fn record(&mut self, domain: &str, now: Instant) {
        self.last_access.insert(domain.to_string(), now);
    }

    /// Time elapsed since the last access, or None for an unseen domain
    pub fn elapsed_since_last(&self, domain: &str, now: Instant) -> Option<std::time::Duration> {
        self.last_access(domain)
            .map(|last| now.saturating_duration_since(last))
    }

    /// Number of domains seen so far
    pub fn len(&self) -> usize {
        self.last_access.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_access.is_empty()
    }
}
