//! DuckDuckGo HTML results
//!
//! Queries the no-JavaScript HTML endpoint and reads result links out of the
//! returned page. Result anchors point at DuckDuckGo's redirector
//! (`/l/?uddg=<target>`); the target is unwrapped before it is returned.

use crate::search::{SearchError, SearchProvider, SearchQuery, UrlStream};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

/// Result link selectors, most specific first
const RESULT_SELECTORS: &[&str] = &["a.result__url", "a.result__a"];

/// Redirect parameter carrying the real target
const REDIRECT_PARAM: &str = "uddg";

/// Search provider backed by DuckDuckGo's HTML endpoint
#[derive(Debug, Clone)]
pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: Url,
}

impl DuckDuckGoSearch {
    pub fn new(client: Client, endpoint: &str) -> Result<Self, SearchError> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| SearchError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &SearchQuery, count: usize) -> Result<UrlStream, SearchError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("q", query.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let html = response.text().await?;
        let urls = parse_results(&html, &self.endpoint, count);
        tracing::debug!(
            query = %query,
            found = urls.len(),
            "Parsed search result page"
        );

        Ok(Box::new(urls.into_iter()))
    }
}

/// Extracts up to `count` result URLs from a DuckDuckGo HTML result page
pub fn parse_results(html: &str, base: &Url, count: usize) -> Vec<String> {
    let document = Html::parse_document(html);

    for selector_str in RESULT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };

        let urls: Vec<String> = document
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .filter_map(|href| resolve_result_link(href, base))
            .take(count)
            .collect();

        if !urls.is_empty() {
            return urls;
        }
    }

    Vec::new()
}

/// Resolves a result href to the absolute target URL
///
/// Returns None for anything that is not an http(s) URL after unwrapping.
fn resolve_result_link(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let resolved = base.join(href).ok()?;

    let target = if is_redirector(&resolved) {
        let encoded = resolved
            .query_pairs()
            .find(|(key, _)| key == REDIRECT_PARAM)
            .map(|(_, value)| value.into_owned())?;
        Url::parse(&encoded).ok()?
    } else {
        resolved
    };

    match target.scheme() {
        "http" | "https" => Some(target.to_string()),
        _ => None,
    }
}

fn is_redirector(url: &Url) -> bool {
    url.path().starts_with("/l/") && url.query_pairs().any(|(key, _)| key == REDIRECT_PARAM)
}
