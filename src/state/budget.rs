use std::collections::HashMap;

/// Pages fetched per domain within one run
///
/// Enforces the configured maximum pages per domain. Mutated only by the
/// `ResultCollector` as it processes URLs.
#[derive(Debug, Clone)]
pub struct PageBudget {
    max_pages_per_domain: u32,
    counts: HashMap<String, u32>,
}

impl PageBudget {
    pub fn new(max_pages_per_domain: u32) -> Self {
        Self {
            max_pages_per_domain,
            counts: HashMap::new(),
        }
    }

    /// Pages already counted against `domain`
    pub fn count(&self, domain: &str) -> u32 {
        self.counts.get(domain).copied().unwrap_or(0)
    }

    /// Whether `domain` has used up its budget
    pub fn is_exhausted(&self, domain: &str) -> bool {
        self.count(domain) >= self.max_pages_per_domain
    }

    /// Pages still allowed for `domain`
    pub fn remaining(&self, domain: &str) -> u32 {
        self.max_pages_per_domain.saturating_sub(self.count(domain))
    }

    /// Counts one fetched page against `domain` and returns the new total
    pub fn charge(&mut self, domain: &str) -> u32 {
        let count = self.counts.entry(domain.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn max_pages_per_domain(&self) -> u32 {
        self.max_pages_per_domain
    }

    /// Domains that have been charged at least once
    pub fn domains(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(d, c)| (d.as_str(), *c))
    }
}
