use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::app::Result;
use crate::domain::{Mode, Question, QuestionSort};
use crate::fetcher::{FetchRequest, Fetcher};
use crate::provider::{endpoint, Page, PageQuery, Provider};

pub const STACK_EXCHANGE_API: &str = "https://api.stackexchange.com/2.3";
pub const SUGGESTED_TAGS: &[&str] = &["reactjs", "node.js", "csharp", "python", "java"];

/// Basic question fields plus the paging wrapper.
const QUESTION_FILTER: &str = "!9_bDDxJY5";

#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    #[serde(default)]
    items: Vec<Question>,
    has_more: Option<bool>,
    quota_remaining: Option<u64>,
}

pub struct StackOverflowProvider {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    per_page: u32,
}

impl StackOverflowProvider {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, per_page: u32) -> Self {
        Self { fetcher, per_page }
    }
}

#[async_trait]
impl Provider for StackOverflowProvider {
    type Item = Question;
    type Sort = QuestionSort;

    fn noun(&self) -> &'static str {
        "questions"
    }

    fn term_kind(&self) -> &'static str {
        "tag"
    }

    fn default_sort(&self) -> QuestionSort {
        QuestionSort::Votes
    }

    fn per_page(&self) -> u32 {
        self.per_page
    }

    fn failure_message(&self) -> &'static str {
        "Failed to fetch questions. Please try again."
    }

    fn suggestions(&self) -> &'static [&'static str] {
        SUGGESTED_TAGS
    }

    fn page_url(&self, query: &PageQuery<QuestionSort>) -> Result<Url> {
        let mut pairs = Vec::new();
        if let (Mode::Search, Some(tag)) = (&query.mode, &query.term) {
            pairs.push(("tagged", tag.clone()));
        }
        pairs.extend([
            ("sort", query.sort.query_param().to_string()),
            ("order", "desc".to_string()),
            ("site", "stackoverflow".to_string()),
            ("pagesize", query.per_page.to_string()),
            ("page", query.page.to_string()),
            ("filter", QUESTION_FILTER.to_string()),
        ]);
        endpoint(STACK_EXCHANGE_API, &["questions"], &pairs)
    }

    async fn fetch_page(&self, query: &PageQuery<QuestionSort>) -> Result<Page<Question>> {
        let url = self.page_url(query)?;
        let body = self.fetcher.fetch(&FetchRequest::get(url)).await?;
        let response: QuestionsResponse = serde_json::from_slice(&body)?;

        if let Some(quota) = response.quota_remaining {
            tracing::debug!("Stack Exchange quota remaining: {}", quota);
        }

        let full_page = response.items.len() as u32 >= query.per_page;
        let has_more = response.has_more.unwrap_or(full_page);
        let items = response
            .items
            .into_iter()
            .map(Question::decode_entities)
            .collect();

        Ok(Page {
            items,
            has_more,
            total: None,
        })
    }
}
