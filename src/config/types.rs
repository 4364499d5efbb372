use serde::Deserialize;
use std::time::Duration;

/// Default DuckDuckGo HTML endpoint used for result enumeration
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// Default CSV destination
pub const DEFAULT_CSV_PATH: &str = "collected_emails.csv";

/// Main configuration structure for Email-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub collector: CollectorConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub search: SearchConfig,
    pub output: OutputConfig,
}

/// Collection pipeline configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Number of search results to request
    #[serde(rename = "result-count")]
    pub result_count: usize,

    /// Lower bound of the randomized per-domain delay (seconds)
    #[serde(rename = "min-delay")]
    pub min_delay: f64,

    /// Upper bound of the randomized per-domain delay (seconds)
    #[serde(rename = "max-delay")]
    pub max_delay: f64,

    /// Maximum number of pages fetched from one domain per run
    #[serde(rename = "max-pages-per-domain")]
    pub max_pages_per_domain: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "fetch-timeout")]
    pub fetch_timeout: f64,

    /// Drop an email already recorded for a different URL
    #[serde(rename = "dedup-across-urls")]
    pub dedup_across_urls: bool,

    /// Consult robots.txt before fetching
    #[serde(rename = "respect-robots")]
    pub respect_robots: bool,
}

impl CollectorConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_secs_f64(self.min_delay)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_secs_f64(self.max_delay)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.fetch_timeout)
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            result_count: 10,
            min_delay: 1.0,
            max_delay: 3.0,
            max_pages_per_domain: 3,
            fetch_timeout: 10.0,
            dedup_across_urls: false,
            respect_robots: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the tool as sent to servers
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version sent alongside the name
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the operator
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,

    /// Email address for operator contact
    #[serde(rename = "contact-email")]
    pub contact_email: Option<String>,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `Name/Version`, followed by ` (+ContactURL; ContactEmail)` when
    /// contact details are configured.
    pub fn user_agent_string(&self) -> String {
        let base = format!("{}/{}", self.crawler_name, self.crawler_version);
        let contact: Vec<&str> = [
            self.contact_url.as_deref().map(|u| u.trim()),
            self.contact_email.as_deref().map(|e| e.trim()),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();

        match contact.as_slice() {
            [] => base,
            [url, email] => format!("{} (+{}; {})", base, url, email),
            [single] => format!("{} (+{})", base, single),
            _ => base,
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

/// Search provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// HTML search endpoint queried with `?q=<query>`
    pub endpoint: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV file receiving `URL,Email` rows
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: DEFAULT_CSV_PATH.to_string(),
        }
    }
}
