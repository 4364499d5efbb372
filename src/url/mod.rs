//! URL handling module for Email-Harvest
//!
//! Candidate URLs coming out of a search are parsed once and carry their
//! domain with them, so the collector never reparses a URL to find the key it
//! uses for rate limiting and page budgeting.

use crate::UrlError;
use std::fmt;
use url::{Host, Url};

/// A URL queued for processing, with its domain cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateUrl {
    raw: String,
    url: Url,
    domain: String,
}

impl CandidateUrl {
    /// Parses a search result into a candidate
    ///
    /// Only `http` and `https` URLs with a host are accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use email_harvest::url::CandidateUrl;
    ///
    /// let candidate = CandidateUrl::parse("https://Blog.Example.com/contact").unwrap();
    /// assert_eq!(candidate.domain(), "blog.example.com");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let raw = raw.trim();
        let url = Url::parse(raw).map_err(|e| UrlError::Parse(e.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(url.scheme().to_string()));
        }

        let domain = domain_key(&url).ok_or(UrlError::MissingDomain)?;

        Ok(Self {
            raw: raw.to_string(),
            url,
            domain,
        })
    }

    /// The parsed URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The lowercase host used as the rate-limit and budget key
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The URL as the search provider returned it, trimmed
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Rate-limit and budget key for `url`
///
/// The host alone: the port is ignored, a trailing root dot is dropped so
/// `example.com.` and `example.com` share one key. IPv6 hosts keep their
/// brackets.
fn domain_key(url: &Url) -> Option<String> {
    match url.host()? {
        Host::Domain(name) => {
            let name = name.trim_end_matches('.');
            (!name.is_empty()).then(|| name.to_ascii_lowercase())
        }
        Host::Ipv4(addr) => Some(addr.to_string()),
        Host::Ipv6(addr) => Some(format!("[{}]", addr)),
    }
}

impl fmt::Display for CandidateUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
