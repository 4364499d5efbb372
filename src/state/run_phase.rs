/// Run phase definitions for the collection state machine
///
/// A run moves `Init → Searching → (CheckBudget → RateLimitWait → Fetch →
/// Extract → Record)* → Done`. A skipped or failed URL returns to
/// `CheckBudget` for the next URL, and any phase that can observe an
/// interrupt may move straight to `Done`.
use std::fmt;

/// Represents where a collection run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    /// Run created, nothing requested yet
    Init,

    /// Waiting on the search provider for candidate URLs
    Searching,

    // ===== Per-URL phases =====
    /// Checking the page budget (and robots.txt, if enabled) for the next URL
    CheckBudget,

    /// Waiting out the per-domain delay
    RateLimitWait,

    /// Fetching the page
    Fetch,

    /// Scanning the fetched content for addresses
    Extract,

    /// Appending new records and charging the budget
    Record,

    /// Run finished, completed or interrupted
    Done,
}

impl RunPhase {
    /// Returns true if this phase belongs to the per-URL cycle
    pub fn is_per_url(&self) -> bool {
        matches!(
            self,
            Self::CheckBudget | Self::RateLimitWait | Self::Fetch | Self::Extract | Self::Record
        )
    }

    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Checks whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: RunPhase) -> bool {
        use RunPhase::*;

        match (self, next) {
            (Init, Searching) => true,
            (Searching, CheckBudget) | (Searching, Done) => true,
            // Skip moves to the next URL without leaving the check
            (CheckBudget, RateLimitWait) | (CheckBudget, CheckBudget) | (CheckBudget, Done) => {
                true
            }
            (RateLimitWait, Fetch) | (RateLimitWait, Done) => true,
            // Fetch failures continue with the next URL
            (Fetch, Extract) | (Fetch, CheckBudget) | (Fetch, Done) => true,
            (Extract, Record) => true,
            (Record, CheckBudget) | (Record, Done) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Searching => "searching",
            Self::CheckBudget => "check_budget",
            Self::RateLimitWait => "rate_limit_wait",
            Self::Fetch => "fetch",
            Self::Extract => "extract",
            Self::Record => "record",
            Self::Done => "done",
        }
    }
}

impl Default for RunPhase {
    fn default() -> Self {
        Self::Init
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
