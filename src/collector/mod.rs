//! Collector module for page fetching and email extraction
//!
//! This module contains the core collection logic, including:
//! - HTTP fetching with per-request timeouts
//! - Email extraction from page text
//! - Per-domain request spacing
//! - Result accumulation and run coordination

mod coordinator;
mod extractor;
mod fetcher;
mod rate_limiter;
mod record;

pub use coordinator::{ResultCollector, UrlOutcome};
pub use extractor::{matches_email_pattern, page_text, EmailExtractor};
pub use fetcher::{build_http_client, FetchError, FetchedPage, PageFetcher};
pub use rate_limiter::{RateLimiter, MAX_BACKOFF};
pub use record::{
    CollectionReport, CollectionResult, EmailRecord, RunOutcome, RunStats, SkipReason,
};

use crate::config::Config;
use crate::search::SearchQuery;
use crate::HarvestError;

/// Runs a complete collection against the configured search endpoint
///
/// Convenience entry point for callers that do not need to swap the search
/// provider or hold on to the cancellation token.
pub async fn collect(config: &Config, query: &str) -> Result<CollectionReport, HarvestError> {
    let query = SearchQuery::new(query)?;
    let collector = ResultCollector::with_duckduckgo(config)?;
    Ok(collector.collect(&query).await)
}
