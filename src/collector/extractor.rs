//! Email address extraction
//!
//! Extraction is a pure function over text: no network access, no state
//! between calls. HTML pages are first reduced to their visible text so that
//! script and stylesheet bodies do not contribute matches.
//!
//! Every returned address is lowercased in full (local part included). Two
//! spellings that differ only in case are therefore the same record, which is
//! what the collector's duplicate checks rely on.

use crate::collector::fetcher::FetchedPage;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// General `local-part@domain.tld` shape
///
/// Local part: letters, digits, `.`, `_`, `%`, `+`, `-`. Domain: letters,
/// digits, `-`, `.`, ending in a label of two or more letters. Letters are
/// ASCII only; case-insensitive matching would also admit Unicode case folds
/// such as the Kelvin sign.
const EMAIL_PATTERN: &str = r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"));

/// Elements whose text is never shown to a reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

const MAILTO: &str = "mailto:";

/// Scans text for email addresses
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailExtractor;

impl EmailExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Returns the distinct, lowercased addresses found in `text`
    ///
    /// # Example
    ///
    /// ```
    /// use email_harvest::collector::EmailExtractor;
    ///
    /// let emails = EmailExtractor::new().extract("Contact: John@Example.com or jane@example.com");
    /// assert!(emails.contains("john@example.com"));
    /// assert!(emails.contains("jane@example.com"));
    /// assert_eq!(emails.len(), 2);
    /// ```
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        EMAIL_RE
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect()
    }

    /// Extracts addresses from an HTML document's visible text and `mailto:` links
    pub fn extract_from_html(&self, html: &str) -> BTreeSet<String> {
        self.extract(&page_text(html))
    }

    /// Extracts from a fetched page, choosing HTML or plain-text handling
    pub fn extract_from_page(&self, page: &FetchedPage) -> BTreeSet<String> {
        if page.is_html() {
            self.extract_from_html(&page.body)
        } else {
            self.extract(&page.body)
        }
    }
}

/// Whether `candidate` is, in its entirety, an address of the accepted shape
pub fn matches_email_pattern(candidate: &str) -> bool {
    EMAIL_RE
        .find(candidate)
        .is_some_and(|m| m.start() == 0 && m.end() == candidate.len())
}

/// Reduces an HTML document to the text a reader would see
///
/// Text nodes are joined with spaces so neighbouring nodes cannot fuse into
/// one address. `mailto:` targets are appended at the end.
pub fn page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::with_capacity(html.len() / 2);

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            out.push_str(trimmed);
            out.push(' ');
        }
    }

    if let Ok(mailto_selector) = Selector::parse("a[href]") {
        for element in document.select(&mailto_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let href = href.trim();
            let is_mailto = href
                .get(..MAILTO.len())
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case(MAILTO));
            if let Some(target) = href.get(MAILTO.len()..).filter(|_| is_mailto) {
                out.push_str(target);
                out.push(' ');
            }
        }
    }

    out
}
