//! Email-Harvest: a polite contact-address collector
//!
//! This crate discovers pages relevant to a search query, visits them one at a
//! time with per-domain throttling and page budgets, and extracts the email
//! addresses they publish.

pub mod collector;
pub mod config;
pub mod output;
pub mod prompt;
pub mod robots;
pub mod search;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Email-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Search error: {0}")]
    Search(#[from] search::SearchError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Collection interrupted by operator")]
    Interrupted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Email-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use collector::{
    CollectionReport, CollectionResult, EmailExtractor, EmailRecord, FetchError, PageFetcher,
    RateLimiter, ResultCollector,
};
pub use config::Config;
pub use search::{SearchProvider, SearchQuery};
pub use state::{PageBudget, RateLimitState, RunPhase};
pub use crate::url::CandidateUrl;
