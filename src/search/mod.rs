//! Search providers
//!
//! A search provider turns a query into a finite, single-pass sequence of
//! candidate URLs. The collector consumes that sequence in order and never
//! asks for it twice.

mod duckduckgo;
mod fixed;

pub use duckduckgo::DuckDuckGoSearch;
pub use fixed::FixedSearch;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Lazy, finite, non-restartable sequence of result URLs
pub type UrlStream = Box<dyn Iterator<Item = String> + Send>;

/// Errors raised while enumerating search results
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search query cannot be empty")]
    EmptyQuery,

    #[error("Search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Search endpoint returned HTTP {0}")]
    Status(u16),

    #[error("Invalid search endpoint: {0}")]
    InvalidEndpoint(String),
}

/// A non-empty, trimmed free-text query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Result<Self, SearchError> {
        let query = query.into();
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of candidate URLs for a query
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short name used in log events
    fn name(&self) -> &str;

    /// Returns up to `count` candidate URLs for `query`
    ///
    /// May yield fewer than `count` when the source runs out.
    async fn search(&self, query: &SearchQuery, count: usize) -> Result<UrlStream, SearchError>;
}
