//! Adapters for the upstream APIs.
//!
//! Each provider turns a [`PageQuery`] into one request (plus any enrichment
//! requests it needs) and normalizes the response into a [`Page`].

pub mod devto;
pub mod github;
pub mod stackoverflow;

use async_trait::async_trait;
use url::Url;

use crate::app::{DashError, Result};
use crate::domain::{FeedItem, Mode, SortKey};

pub use devto::DevToProvider;
pub use github::GitHubProvider;
pub use stackoverflow::StackOverflowProvider;

/// Everything a provider needs to build one page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery<S> {
    pub mode: Mode,
    /// Trimmed, lower-cased search term; `None` in discovery mode.
    pub term: Option<String>,
    pub sort: S,
    pub page: u32,
    pub per_page: u32,
}

/// One page of normalized results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Whether the provider indicated that a later page exists.
    pub has_more: bool,
    /// Total result count, for providers that report one.
    pub total: Option<u64>,
}

#[async_trait]
pub trait Provider: Send + Sync + 'static {
    type Item: FeedItem;
    type Sort: SortKey;

    /// Plural used in headings and notices, e.g. "repositories".
    fn noun(&self) -> &'static str;

    /// What a search term is called for this provider, e.g. "topic".
    fn term_kind(&self) -> &'static str;

    fn default_sort(&self) -> Self::Sort;

    fn per_page(&self) -> u32;

    /// The single message shown when a fetch fails.
    fn failure_message(&self) -> &'static str;

    /// Quick-pick search terms.
    fn suggestions(&self) -> &'static [&'static str];

    /// Order a fetched page for providers without server-side sorting. Only
    /// the page passed in is reordered.
    fn sort_page(&self, _sort: Self::Sort, _items: &mut [Self::Item]) {}

    fn page_url(&self, query: &PageQuery<Self::Sort>) -> Result<Url>;

    async fn fetch_page(&self, query: &PageQuery<Self::Sort>) -> Result<Page<Self::Item>>;
}

/// Build `base/segments...?pairs`, percent-encoding every component.
pub(crate) fn endpoint(base: &str, segments: &[&str], pairs: &[(&str, String)]) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| DashError::Other(format!("Cannot append path to {}", base)))?
        .pop_if_empty()
        .extend(segments);
    if !pairs.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
    }
    Ok(url)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_segments_and_pairs() {
        let url = endpoint(
            "https://api.github.com",
            &["repos", "rust-lang", "rust", "pulls"],
            &[("q", "topic:c++ tools".to_string())],
        )
        .unwrap();
        assert_eq!(url.path(), "/repos/rust-lang/rust/pulls");
        assert_eq!(url.query(), Some("q=topic%3Ac%2B%2B+tools"));
    }

    #[test]
    fn test_endpoint_without_pairs_has_no_query() {
        let url = endpoint("https://dev.to/api", &["articles"], &[]).unwrap();
        assert_eq!(url.as_str(), "https://dev.to/api/articles");
    }
}
