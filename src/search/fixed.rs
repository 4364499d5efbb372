use crate::search::{SearchError, SearchProvider, SearchQuery, UrlStream};
use async_trait::async_trait;

/// Provider over a fixed list of URLs
///
/// Ignores the query text. Used for `--url` runs and in tests.
#[derive(Debug, Clone, Default)]
pub struct FixedSearch {
    urls: Vec<String>,
}

impl FixedSearch {
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[async_trait]
impl SearchProvider for FixedSearch {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn search(&self, _query: &SearchQuery, count: usize) -> Result<UrlStream, SearchError> {
        Ok(Box::new(self.urls.clone().into_iter().take(count)))
    }
}
