use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::app::Result;
use crate::domain::{Article, ArticleSort, Mode};
use crate::feed::sort::sort_page_by;
use crate::fetcher::{FetchRequest, Fetcher};
use crate::provider::{endpoint, Page, PageQuery, Provider};

pub const DEVTO_API: &str = "https://dev.to/api";
pub const TOPIC_SUGGESTIONS: &[&str] = &["ai", "databases", "react", "node", "tailwind"];

/// dev.to article listing. The API has no sort parameter and no total count.
pub struct DevToProvider {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    per_page: u32,
}

impl DevToProvider {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, per_page: u32) -> Self {
        Self { fetcher, per_page }
    }
}

#[async_trait]
impl Provider for DevToProvider {
    type Item = Article;
    type Sort = ArticleSort;

    fn noun(&self) -> &'static str {
        "articles"
    }

    fn term_kind(&self) -> &'static str {
        "tag"
    }

    fn default_sort(&self) -> ArticleSort {
        ArticleSort::Reactions
    }

    fn per_page(&self) -> u32 {
        self.per_page
    }

    fn failure_message(&self) -> &'static str {
        "Failed to fetch articles. Please try again."
    }

    fn suggestions(&self) -> &'static [&'static str] {
        TOPIC_SUGGESTIONS
    }

    fn sort_page(&self, sort: ArticleSort, items: &mut [Article]) {
        sort_page_by(items, |a, b| sort.compare(a, b));
    }

    fn page_url(&self, query: &PageQuery<ArticleSort>) -> Result<Url> {
        let mut pairs = vec![
            ("per_page", query.per_page.to_string()),
            ("page", query.page.to_string()),
        ];
        if let (Mode::Search, Some(tag)) = (&query.mode, &query.term) {
            pairs.push(("tag", tag.clone()));
        }
        endpoint(DEVTO_API, &["articles"], &pairs)
    }

    async fn fetch_page(&self, query: &PageQuery<ArticleSort>) -> Result<Page<Article>> {
        let url = self.page_url(query)?;
        let body = self.fetcher.fetch(&FetchRequest::get(url)).await?;
        let items: Vec<Article> = serde_json::from_slice(&body)?;

        Ok(Page {
            has_more: items.len() as u32 >= query.per_page,
            items,
            total: None,
        })
    }
}
