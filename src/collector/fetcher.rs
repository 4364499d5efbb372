//! HTTP page fetcher
//!
//! This module handles every page request the collector makes:
//! - Building the HTTP client with a tool-identifying user agent
//! - Single GET requests with a per-request timeout
//! - Classifying failures as network, HTTP status, or content problems
//!
//! Failures are values, not panics: the collector logs them and moves on to
//! the next URL.

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum redirect hops followed for a single page
const MAX_REDIRECTS: usize = 10;

/// Classified failure of a single page fetch
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Connection refused, DNS failure, timeout, broken transfer
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    /// Response status code >= 400
    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    /// Response received but the content is not usable text
    #[error("Unusable content from {url}: {message}")]
    Parse { url: String, message: String },
}

impl FetchError {
    /// True for HTTP 429 responses, which callers answer by backing off
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Http { status, .. } if *status == StatusCode::TOO_MANY_REQUESTS.as_u16())
    }

    /// Short classification label used in log events
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Http { .. } => "http",
            Self::Parse { .. } => "parse",
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Network { url, .. } | Self::Http { url, .. } | Self::Parse { url, .. } => url,
        }
    }
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Content-Type header value, if the server sent one
    pub content_type: Option<String>,

    /// Decoded body
    pub body: String,
}

impl FetchedPage {
    /// Whether the body should be treated as markup rather than plain text
    pub fn is_html(&self) -> bool {
        match &self.content_type {
            Some(ct) => {
                let ct = ct.to_ascii_lowercase();
                ct.contains("html") || ct.contains("xml")
            }
            // Unlabelled bodies are parsed as HTML; plain text survives parsing
            None => true,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use email_harvest::config::UserAgentConfig;
/// use email_harvest::collector::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent_string())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs single-page GET requests
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with its own client
    pub fn from_user_agent(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetches `url`, returning its text or a classified failure
    ///
    /// | Condition                         | Result             |
    /// |-----------------------------------|--------------------|
    /// | Timeout, connect or DNS failure   | `Network`          |
    /// | Status >= 400                     | `Http { status }`  |
    /// | Non-text Content-Type             | `Parse`            |
    /// | Body cannot be decoded            | `Parse`            |
    ///
    /// No retries are attempted.
    pub async fn fetch(&self, url: &Url, timeout: Duration) -> Result<FetchedPage, FetchError> {
        let url_str = url.as_str();

        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_request_error(url_str, &e))?;

        let status = response.status();
        let final_url = response.url().to_string();

        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Http {
                url: url_str.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        if let Some(ct) = &content_type {
            if !is_textual(ct) {
                return Err(FetchError::Parse {
                    url: url_str.to_string(),
                    message: format!("Expected text or HTML, got {}", ct),
                });
            }
        }

        let body = response.text().await.map_err(|e| {
            if e.is_decode() {
                FetchError::Parse {
                    url: url_str.to_string(),
                    message: format!("Failed to decode body: {}", e),
                }
            } else {
                classify_request_error(url_str, &e)
            }
        })?;

        Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        })
    }
}

/// Maps a transport-level reqwest error to `FetchError`
fn classify_request_error(url: &str, e: &reqwest::Error) -> FetchError {
    let message = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else if e.is_redirect() {
        format!("Redirect error: {}", e)
    } else {
        e.to_string()
    };

    FetchError::Network {
        url: url.to_string(),
        message,
    }
}

/// Content types that can carry readable addresses
fn is_textual(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    mime.starts_with("text/") || mime == "application/xhtml+xml" || mime == "application/xml"
}
