//! Collection coordinator - the per-run orchestration loop
//!
//! A run asks the search provider for candidate URLs and processes them one
//! at a time, in discovery order:
//! - skip URLs whose domain has used its page budget
//! - optionally skip URLs disallowed by robots.txt
//! - wait out the per-domain delay
//! - charge the domain's budget and fetch
//! - extract and record new `(URL, email)` pairs
//!
//! All mutable run state is created when `collect` starts and owned by that
//! call alone, so runs are isolated from each other. URLs are processed
//! sequentially, which keeps requests to one domain strictly serialized.

use crate::collector::extractor::EmailExtractor;
use crate::collector::fetcher::{build_http_client, FetchError, PageFetcher};
use crate::collector::rate_limiter::RateLimiter;
use crate::collector::record::{
    CollectionReport, CollectionResult, RunOutcome, RunStats, SkipReason,
};
use crate::config::{validate, CollectorConfig, Config};
use crate::robots::RobotsGate;
use crate::search::{DuckDuckGoSearch, SearchProvider, SearchQuery, UrlStream};
use crate::state::{PageBudget, RunPhase};
use crate::url::CandidateUrl;
use crate::HarvestError;
use chrono::Utc;
use tokio_util::sync::CancellationToken;

/// What happened to a single candidate URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlOutcome {
    /// Page fetched; `found` addresses on it, `added` of them new
    Recorded { found: usize, added: usize },
    /// Passed over without a request
    Skipped(SkipReason),
    /// Fetch failed; the run continues
    Failed(FetchError),
}

/// Mutable state of one collection run
struct RunContext {
    phase: RunPhase,
    rate_limiter: RateLimiter,
    budget: PageBudget,
    robots: Option<RobotsGate>,
    result: CollectionResult,
    stats: RunStats,
}

impl RunContext {
    fn new(config: &CollectorConfig, robots: Option<RobotsGate>) -> Self {
        Self {
            phase: RunPhase::Init,
            rate_limiter: RateLimiter::from_config(config),
            budget: PageBudget::new(config.max_pages_per_domain),
            robots,
            result: CollectionResult::new(config.dedup_across_urls),
            stats: RunStats::default(),
        }
    }

    fn advance(&mut self, next: RunPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "invalid run phase transition {} -> {}",
            self.phase,
            next
        );
        tracing::trace!(from = %self.phase, to = %next, "Run phase transition");
        self.phase = next;
    }
}

/// Orchestrates collection runs
///
/// Holds only immutable collaborators; each call to [`collect`] builds its
/// own run state.
///
/// [`collect`]: ResultCollector::collect
pub struct ResultCollector {
    config: CollectorConfig,
    fetcher: PageFetcher,
    extractor: EmailExtractor,
    search: Box<dyn SearchProvider>,
    robots_agent: Option<String>,
    cancel: CancellationToken,
}

impl ResultCollector {
    /// Creates a collector using `search` for URL enumeration
    ///
    /// Validates `config`, then builds one HTTP client from the user-agent
    /// configuration for page and robots.txt requests.
    pub fn new(config: &Config, search: Box<dyn SearchProvider>) -> Result<Self, HarvestError> {
        validate(config)?;
        let client = build_http_client(&config.user_agent)?;

        let robots_agent = config
            .collector
            .respect_robots
            .then(|| config.user_agent.crawler_name.clone());

        Ok(Self {
            config: config.collector.clone(),
            fetcher: PageFetcher::new(client),
            extractor: EmailExtractor::new(),
            search,
            robots_agent,
            cancel: CancellationToken::new(),
        })
    }

    /// Creates a collector that enumerates URLs through DuckDuckGo
    pub fn with_duckduckgo(config: &Config) -> Result<Self, HarvestError> {
        validate(config)?;
        let client = build_http_client(&config.user_agent)?;
        let search = DuckDuckGoSearch::new(client, &config.search.endpoint)?;
        Self::new(config, Box::new(search))
    }

    /// Replaces the interrupt signal
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops the current run when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Runs one collection for `query`
    ///
    /// Never fails on a per-URL problem: fetch failures are logged and
    /// counted, search failures yield an empty result. When the cancellation
    /// token fires the run stops taking new URLs and returns what it has
    /// with `RunOutcome::Interrupted`.
    pub async fn collect(&self, query: &SearchQuery) -> CollectionReport {
        let started_at = Utc::now();
        let robots = self.robots_agent.as_ref().map(|agent| {
            RobotsGate::new(
                self.fetcher.client().clone(),
                agent.clone(),
                self.config.fetch_timeout(),
            )
        });
        let mut run = RunContext::new(&self.config, robots);

        run.advance(RunPhase::Searching);
        tracing::info!(
            query = %query,
            provider = self.search.name(),
            count = self.config.result_count,
            "Search started"
        );

        let urls = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            urls = self.search_urls(query) => Some(urls),
        };

        let outcome = match urls {
            Some(urls) => self.process_all(&mut run, urls).await,
            None => RunOutcome::Interrupted,
        };

        run.advance(RunPhase::Done);

        if outcome == RunOutcome::Interrupted {
            tracing::warn!(
                records = run.result.len(),
                "Run interrupted, keeping records collected so far"
            );
        }

        tracing::info!(
            query = %query,
            urls_seen = run.stats.urls_seen,
            pages_fetched = run.stats.pages_fetched,
            skipped_budget = run.stats.skipped_budget,
            failures = run.stats.failures(),
            records = run.result.len(),
            "Collection finished"
        );

        CollectionReport {
            query: query.to_string(),
            result: run.result,
            stats: run.stats,
            outcome,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Asks the provider for URLs; a failed search is an empty result
    async fn search_urls(&self, query: &SearchQuery) -> UrlStream {
        match self.search.search(query, self.config.result_count).await {
            Ok(urls) => urls,
            Err(e) => {
                tracing::error!(query = %query, error = %e, "Search failed");
                Box::new(std::iter::empty())
            }
        }
    }

    /// Drives the per-URL loop until the URLs run out or the run is interrupted
    async fn process_all(&self, run: &mut RunContext, urls: UrlStream) -> RunOutcome {
        let mut seen_any = false;

        for raw in urls {
            if self.cancel.is_cancelled() {
                return RunOutcome::Interrupted;
            }

            seen_any = true;
            run.advance(RunPhase::CheckBudget);
            run.stats.urls_seen += 1;

            match self.process_url(run, &raw).await {
                Ok(outcome) => {
                    tracing::trace!(url = %raw, outcome = ?outcome, "URL processed");
                }
                Err(HarvestError::Interrupted) => return RunOutcome::Interrupted,
                Err(e) => {
                    tracing::error!(url = %raw, error = %e, "Error processing URL");
                }
            }
        }

        if !seen_any {
            tracing::warn!("No URLs found in search results");
        }

        RunOutcome::Completed
    }

    /// Processes one candidate URL
    ///
    /// Only `HarvestError::Interrupted` is returned as an error; every
    /// per-URL failure is folded into the returned outcome.
    async fn process_url(&self, run: &mut RunContext, raw: &str) -> Result<UrlOutcome, HarvestError> {
        let candidate = match CandidateUrl::parse(raw) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(url = %raw, error = %e, "Skipping unusable search result");
                return Ok(self.skip(run, raw, SkipReason::InvalidUrl));
            }
        };
        let domain = candidate.domain();

        if run.budget.is_exhausted(domain) {
            tracing::info!(
                url = %candidate,
                domain = %domain,
                max_pages = run.budget.max_pages_per_domain(),
                "Skipping URL, domain page budget exhausted"
            );
            return Ok(self.skip(run, raw, SkipReason::BudgetExceeded));
        }

        if let Some(gate) = run.robots.as_mut() {
            // A robots.txt fetch is a request to the domain like any other
            if !gate.is_cached(candidate.url()) {
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return Err(HarvestError::Interrupted),
                    _ = run.rate_limiter.wait_if_needed(domain) => {}
                }
            }
            let verdict = gate.check(candidate.url()).await;
            if !verdict.allowed {
                tracing::info!(url = %candidate, "Skipping URL, disallowed by robots.txt");
                return Ok(self.skip(run, raw, SkipReason::RobotsDisallowed));
            }
            if let Some(delay) = verdict.crawl_delay {
                run.rate_limiter.set_floor(domain, delay);
            }
        }

        run.advance(RunPhase::RateLimitWait);
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(HarvestError::Interrupted),
            _ = run.rate_limiter.wait_if_needed(domain) => {}
        }

        run.advance(RunPhase::Fetch);
        // Charged per request issued, whatever its outcome
        let pages = run.budget.charge(domain);
        tracing::info!(url = %candidate, domain_pages = pages, "Extracting emails");
        let fetched = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(HarvestError::Interrupted),
            fetched = self.fetcher.fetch(candidate.url(), self.config.fetch_timeout()) => fetched,
        };

        let page = match fetched {
            Ok(page) => page,
            Err(e) => {
                self.record_failure(run, domain, &e);
                return Ok(UrlOutcome::Failed(e));
            }
        };

        run.advance(RunPhase::Extract);
        let emails = self.extractor.extract_from_page(&page);

        run.advance(RunPhase::Record);
        let mut added = 0;
        for email in &emails {
            if run.result.push(candidate.as_str(), email) {
                added += 1;
                tracing::info!(url = %candidate, email = %email, "Email found");
            }
        }

        run.stats.pages_fetched += 1;
        run.stats.emails_found += emails.len() as u64;
        run.stats.records_added += added as u64;

        tracing::info!(
            url = %candidate,
            found = emails.len(),
            new = added,
            domain_pages = pages,
            "Found {} emails on {}",
            emails.len(),
            candidate
        );

        Ok(UrlOutcome::Recorded {
            found: emails.len(),
            added,
        })
    }

    fn skip(&self, run: &mut RunContext, raw: &str, reason: SkipReason) -> UrlOutcome {
        tracing::trace!(url = %raw, reason = %reason, "URL skipped");
        run.stats.record_skip(reason);
        UrlOutcome::Skipped(reason)
    }

    fn record_failure(&self, run: &mut RunContext, domain: &str, error: &FetchError) {
        match error {
            FetchError::Network { .. } => run.stats.network_errors += 1,
            FetchError::Http { .. } => run.stats.http_errors += 1,
            FetchError::Parse { .. } => run.stats.parse_errors += 1,
        }

        tracing::warn!(
            url = %error.url(),
            reason = error.kind(),
            error = %error,
            "Fetch failed"
        );

        if error.is_rate_limited() {
            run.stats.rate_limited += 1;
            let penalty = run.rate_limiter.back_off(domain);
            tracing::warn!(
                domain = %domain,
                penalty_ms = penalty.as_millis() as u64,
                "Rate limited, backing off domain"
            );
        }
    }
}
