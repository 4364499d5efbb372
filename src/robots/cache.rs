//! Per-run robots.txt cache
//!
//! robots.txt is fetched at most once per origin per run. The cache is
//! dropped with the run; a new run fetches again.

use crate::robots::ParsedRobots;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// robots.txt for one origin and when it was fetched
#[derive(Debug, Clone)]
pub struct CachedRobots {
    pub robots: ParsedRobots,
    pub fetched_at: DateTime<Utc>,
}

impl CachedRobots {
    pub fn new(robots: ParsedRobots) -> Self {
        Self {
            robots,
            fetched_at: Utc::now(),
        }
    }
}

/// robots.txt entries keyed by origin (`scheme://host[:port]`)
#[derive(Debug, Clone, Default)]
pub struct RobotsCache {
    entries: HashMap<String, CachedRobots>,
}

impl RobotsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, origin: &str) -> Option<&CachedRobots> {
        self.entries.get(origin)
    }

    pub fn insert(&mut self, origin: &str, robots: ParsedRobots) -> &CachedRobots {
        self.entries
            .entry(origin.to_string())
            .or_insert_with(|| CachedRobots::new(robots))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut cache = RobotsCache::new();
        assert!(cache.is_empty());

        cache.insert("https://example.com", ParsedRobots::allow_all());

        assert!(cache.get("https://example.com").is_some());
        assert!(cache.get("https://other.com").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_first_insert_wins() {
        let mut cache = RobotsCache::new();
        cache.insert(
            "https://example.com",
            ParsedRobots::from_content("User-agent: *\nDisallow: /"),
        );
        let entry = cache.insert("https://example.com", ParsedRobots::allow_all());

        assert!(!entry.robots.is_allow_all());
    }
}
