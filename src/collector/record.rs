//! Records and run results
//!
//! `CollectionResult` is the ordered, duplicate-free sequence of
//! `(URL, email)` pairs a run produces. `CollectionReport` wraps it with the
//! run's counters and how the run ended.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// One discovered address and the page it came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EmailRecord {
    #[serde(rename = "URL")]
    pub url: String,

    #[serde(rename = "Email")]
    pub email: String,
}

impl EmailRecord {
    pub fn new(url: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            email: email.into(),
        }
    }
}

/// Ordered records of one run, in discovery order
///
/// The same `(URL, email)` pair is never stored twice. With
/// `dedup_across_urls` an address already recorded for any URL is also
/// dropped.
#[derive(Debug, Clone, Default)]
pub struct CollectionResult {
    records: Vec<EmailRecord>,
    seen_pairs: HashSet<(String, String)>,
    seen_emails: HashSet<String>,
    dedup_across_urls: bool,
}

impl CollectionResult {
    pub fn new(dedup_across_urls: bool) -> Self {
        Self {
            dedup_across_urls,
            ..Self::default()
        }
    }

    /// Appends a record unless it duplicates one already held
    ///
    /// Returns true if the record was added.
    pub fn push(&mut self, url: &str, email: &str) -> bool {
        if self.dedup_across_urls && self.seen_emails.contains(email) {
            return false;
        }

        if !self
            .seen_pairs
            .insert((url.to_string(), email.to_string()))
        {
            return false;
        }

        self.seen_emails.insert(email.to_string());
        self.records.push(EmailRecord::new(url, email));
        true
    }

    pub fn records(&self) -> &[EmailRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<EmailRecord> {
        self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EmailRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct addresses across all URLs, sorted
    pub fn unique_emails(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.email.as_str()).collect()
    }

    /// Distinct source URLs that produced at least one record
    pub fn url_count(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.url.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

impl<'a> IntoIterator for &'a CollectionResult {
    type Item = &'a EmailRecord;
    type IntoIter = std::slice::Iter<'a, EmailRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Why a URL was passed over without fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The domain already used its page budget
    BudgetExceeded,
    /// robots.txt disallows the URL for our user agent
    RobotsDisallowed,
    /// The search result was not a usable http(s) URL
    InvalidUrl,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::BudgetExceeded => "budget_exceeded",
            Self::RobotsDisallowed => "robots_disallowed",
            Self::InvalidUrl => "invalid_url",
        };
        f.write_str(s)
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every candidate URL was considered
    Completed,
    /// The operator stopped the run; records gathered so far are kept
    Interrupted,
}

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub urls_seen: u64,
    pub pages_fetched: u64,
    pub skipped_budget: u64,
    pub skipped_robots: u64,
    pub skipped_invalid: u64,
    pub network_errors: u64,
    pub http_errors: u64,
    pub parse_errors: u64,
    pub rate_limited: u64,
    pub emails_found: u64,
    pub records_added: u64,
}

impl RunStats {
    pub fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::BudgetExceeded => self.skipped_budget += 1,
            SkipReason::RobotsDisallowed => self.skipped_robots += 1,
            SkipReason::InvalidUrl => self.skipped_invalid += 1,
        }
    }

    pub fn failures(&self) -> u64 {
        self.network_errors + self.http_errors + self.parse_errors
    }
}

/// Everything a run hands back to its caller
#[derive(Debug, Clone)]
pub struct CollectionReport {
    pub query: String,
    pub result: CollectionResult,
    pub stats: RunStats,
    pub outcome: RunOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CollectionReport {
    pub fn was_interrupted(&self) -> bool {
        self.outcome == RunOutcome::Interrupted
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
