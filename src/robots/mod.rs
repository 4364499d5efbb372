//! Optional robots.txt gate
//!
//! When enabled, each URL is checked against its origin's robots.txt before
//! it is fetched. A missing, unreachable, or non-2xx robots.txt allows
//! everything.

mod cache;
mod parser;

pub use cache::{CachedRobots, RobotsCache};
pub use parser::ParsedRobots;

use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Outcome of checking one URL
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotsVerdict {
    pub allowed: bool,
    /// Crawl-delay declared for our agent, if any
    pub crawl_delay: Option<Duration>,
}

/// Fetches robots.txt for the origin of `url`
///
/// Never fails: any problem is logged and treated as allow-all.
pub async fn fetch_robots(client: &Client, url: &Url, timeout: Duration) -> ParsedRobots {
    let robots_url = match url.join("/robots.txt") {
        Ok(u) => u,
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "Cannot build robots.txt URL");
            return ParsedRobots::allow_all();
        }
    };

    let response = match client.get(robots_url.clone()).timeout(timeout).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!(url = %robots_url, error = %e, "robots.txt unreachable, allowing all");
            return ParsedRobots::allow_all();
        }
    };

    if !response.status().is_success() {
        tracing::debug!(
            url = %robots_url,
            status = response.status().as_u16(),
            "No robots.txt, allowing all"
        );
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(body) => ParsedRobots::from_content(&body),
        Err(e) => {
            tracing::debug!(url = %robots_url, error = %e, "Unreadable robots.txt, allowing all");
            ParsedRobots::allow_all()
        }
    }
}

/// Checks URLs against robots.txt, fetching each origin's file once per run
#[derive(Debug, Clone)]
pub struct RobotsGate {
    client: Client,
    agent: String,
    timeout: Duration,
    cache: RobotsCache,
}

impl RobotsGate {
    /// `agent` is the product token matched against `User-agent` lines
    pub fn new(client: Client, agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            agent: agent.into(),
            timeout,
            cache: RobotsCache::new(),
        }
    }

    /// Whether robots.txt for the origin of `url` is already known
    ///
    /// When this is false, the next [`check`](RobotsGate::check) makes a
    /// request to the origin.
    pub fn is_cached(&self, url: &Url) -> bool {
        self.cache
            .get(&url.origin().ascii_serialization())
            .is_some()
    }

    pub async fn check(&mut self, url: &Url) -> RobotsVerdict {
        let origin = url.origin().ascii_serialization();

        if self.cache.get(&origin).is_none() {
            tracing::debug!(origin = %origin, "Fetching robots.txt");
            let robots = fetch_robots(&self.client, url, self.timeout).await;
            self.cache.insert(&origin, robots);
        }

        match self.cache.get(&origin) {
            Some(cached) => RobotsVerdict {
                allowed: cached.robots.is_allowed(url.as_str(), &self.agent),
                crawl_delay: cached
                    .robots
                    .crawl_delay(&self.agent)
                    .and_then(|secs| Duration::try_from_secs_f64(secs).ok()),
            },
            None => RobotsVerdict {
                allowed: true,
                crawl_delay: None,
            },
        }
    }

    pub fn cache(&self) -> &RobotsCache {
        &self.cache
    }
}
