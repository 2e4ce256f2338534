use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::app::{DashError, Result};
use crate::domain::stats::{GraphQlResponse, VIEWER_STATS_QUERY};
use crate::domain::{Mode, Repo, RepoSort, ViewerStats};
use crate::fetcher::parallel::ParallelFetcher;
use crate::fetcher::{FetchRequest, Fetcher, Method};
use crate::provider::{endpoint, Page, PageQuery, Provider};

pub const GITHUB_API: &str = "https://api.github.com";
pub const DEFAULT_SEARCH_QUERY: &str = "stars:>50000";
pub const SUGGESTED_TOPICS: &[&str] = &[
    "react",
    "node",
    "python",
    "machine-learning",
    "frontend",
    "typescript",
];

const GITHUB_V3: &str = "application/vnd.github.v3+json";
const MISSING_TOKEN: &str = "GitHub token not available.";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total_count: u64,
    #[serde(default)]
    items: Vec<Repo>,
}

/// GitHub repository search, enriched with open pull-request counts.
///
/// The bearer token is optional for searching and required for the starring
/// and viewer-stats calls.
pub struct GitHubProvider {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    parallel: ParallelFetcher,
    per_page: u32,
    token: Option<String>,
}

impl GitHubProvider {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        parallel: ParallelFetcher,
        per_page: u32,
        token: Option<String>,
    ) -> Self {
        Self {
            fetcher,
            parallel,
            per_page,
            token,
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| DashError::Unauthorized(MISSING_TOKEN.to_string()))
    }

    fn authorize(&self, request: FetchRequest) -> FetchRequest {
        match &self.token {
            Some(token) => request.with_bearer(token),
            None => request,
        }
    }

    /// The `q` parameter for a query.
    pub fn search_terms(query: &PageQuery<RepoSort>) -> String {
        match (&query.mode, &query.term) {
            (Mode::Search, Some(term)) => format!("topic:{}", term),
            _ => DEFAULT_SEARCH_QUERY.to_string(),
        }
    }

    fn pulls_request(&self, repo: &Repo) -> Result<FetchRequest> {
        let url = endpoint(
            GITHUB_API,
            &["repos", &repo.owner.login, &repo.name, "pulls"],
            &[("state", "open".to_string()), ("per_page", "100".to_string())],
        )?;
        Ok(self.authorize(FetchRequest::get(url)))
    }

    /// Fill in `pull_requests` for every repo. A failed lookup counts as zero.
    pub async fn enrich(&self, repos: &mut [Repo]) {
        let requests: Vec<Option<FetchRequest>> = repos
            .iter()
            .map(|repo| self.pulls_request(repo).ok())
            .collect();
        let sent: Vec<FetchRequest> = requests.iter().flatten().cloned().collect();
        let mut responses = self.parallel.fetch_all(sent).await.into_iter();

        for (repo, request) in repos.iter_mut().zip(&requests) {
            let response = match request {
                Some(_) => responses.next(),
                None => None,
            };
            let count = match response {
                Some(Ok(body)) => serde_json::from_slice::<Vec<serde_json::Value>>(&body)
                    .map(|pulls| pulls.len() as u64)
                    .unwrap_or(0),
                Some(Err(e)) => {
                    debug!("Pull request count failed for {}: {}", repo.full_name, e);
                    0
                }
                None => 0,
            };
            repo.pull_requests = Some(count);
        }
    }

    pub async fn star(&self, repo: &Repo) -> Result<()> {
        let token = self.require_token()?;
        let url = endpoint(
            GITHUB_API,
            &["user", "starred", &repo.owner.login, &repo.name],
            &[],
        )?;
        let request = FetchRequest::new(Method::Put, url)
            .with_bearer(token)
            .with_accept(GITHUB_V3);
        self.fetcher.fetch(&request).await?;
        info!("Starred {}", repo.full_name);
        Ok(())
    }

    pub async fn unstar(&self, repo: &Repo) -> Result<()> {
        let token = self.require_token()?;
        let url = endpoint(
            GITHUB_API,
            &["user", "starred", &repo.owner.login, &repo.name],
            &[],
        )?;
        let request = FetchRequest::new(Method::Delete, url)
            .with_bearer(token)
            .with_accept(GITHUB_V3);
        self.fetcher.fetch(&request).await?;
        info!("Unstarred {}", repo.full_name);
        Ok(())
    }

    /// Repositories the token owner has starred upstream.
    pub async fn starred(&self) -> Result<Vec<Repo>> {
        let token = self.require_token()?;
        let url = endpoint(GITHUB_API, &["user", "starred"], &[])?;
        let body = self
            .fetcher
            .fetch(&FetchRequest::get(url).with_bearer(token))
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn viewer_stats(&self) -> Result<ViewerStats> {
        let token = self.require_token()?;
        let url = endpoint(GITHUB_API, &["graphql"], &[])?;
        let request = FetchRequest::new(Method::Post, url)
            .with_bearer(token)
            .with_json(serde_json::json!({ "query": VIEWER_STATS_QUERY }));
        let body = self.fetcher.fetch(&request).await?;

        let response: GraphQlResponse = serde_json::from_slice(&body)?;
        if let Some(errors) = response.errors {
            return Err(DashError::Other(format!("GitHub GraphQL error: {}", errors)));
        }
        let data = response
            .data
            .ok_or_else(|| DashError::Other("GitHub GraphQL returned no data".into()))?;
        Ok(ViewerStats::from(data.viewer))
    }
}

#[async_trait]
impl Provider for GitHubProvider {
    type Item = Repo;
    type Sort = RepoSort;

    fn noun(&self) -> &'static str {
        "repositories"
    }

    fn term_kind(&self) -> &'static str {
        "topic"
    }

    fn default_sort(&self) -> RepoSort {
        RepoSort::Stars
    }

    fn per_page(&self) -> u32 {
        self.per_page
    }

    fn failure_message(&self) -> &'static str {
        "Failed to fetch repositories."
    }

    fn suggestions(&self) -> &'static [&'static str] {
        SUGGESTED_TOPICS
    }

    fn page_url(&self, query: &PageQuery<RepoSort>) -> Result<Url> {
        let mut pairs = vec![
            ("q", Self::search_terms(query)),
            ("page", query.page.to_string()),
            ("per_page", query.per_page.to_string()),
            ("order", "desc".to_string()),
        ];
        if let Some(sort) = query.sort.query_param() {
            pairs.push(("sort", sort.to_string()));
        }
        endpoint(GITHUB_API, &["search", "repositories"], &pairs)
    }

    async fn fetch_page(&self, query: &PageQuery<RepoSort>) -> Result<Page<Repo>> {
        let url = self.page_url(query)?;
        let body = self
            .fetcher
            .fetch(&self.authorize(FetchRequest::get(url)))
            .await?;
        let response: SearchResponse = serde_json::from_slice(&body)?;

        let mut items = response.items;
        self.enrich(&mut items).await;

        let seen = u64::from(query.page) * u64::from(query.per_page);
        Ok(Page {
            items,
            has_more: seen < response.total_count,
            total: Some(response.total_count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::FakeFetcher;

    const SEARCH_BODY: &str = r#"{
        "total_count": 13,
        "incomplete_results": false,
        "items": [
            {"id": 1, "name": "react", "full_name": "facebook/react",
             "owner": {"login": "facebook", "avatar_url": ""},
             "html_url": "https://github.com/facebook/react",
             "description": "UI", "stargazers_count": 5, "forks_count": 1},
            {"id": 2, "name": "vue", "full_name": "vuejs/vue",
             "owner": {"login": "vuejs", "avatar_url": ""},
             "html_url": "https://github.com/vuejs/vue",
             "description": null, "stargazers_count": 4, "forks_count": 1}
        ]
    }"#;

    fn provider(fetcher: Arc<FakeFetcher>, token: Option<&str>) -> GitHubProvider {
        let parallel = ParallelFetcher::with_workers(fetcher.clone(), 2);
        GitHubProvider::new(fetcher, parallel, 6, token.map(String::from))
    }

    fn query(mode: Mode, term: Option<&str>, sort: RepoSort, page: u32) -> PageQuery<RepoSort> {
        PageQuery {
            mode,
            term: term.map(String::from),
            sort,
            page,
            per_page: 6,
        }
    }

    #[test]
    fn test_discovery_url_uses_default_query() {
        let fetcher = Arc::new(FakeFetcher::new());
        let url = provider(fetcher, None)
            .page_url(&query(Mode::Discovery, None, RepoSort::Stars, 3))
            .unwrap();
        assert_eq!(url.path(), "/search/repositories");
        assert_eq!(
            url.query(),
            Some("q=stars%3A%3E50000&page=3&per_page=6&order=desc&sort=stars")
        );
    }

    #[test]
    fn test_search_url_uses_topic_and_omits_best_match_sort() {
        let fetcher = Arc::new(FakeFetcher::new());
        let url = provider(fetcher, None)
            .page_url(&query(Mode::Search, Some("machine-learning"), RepoSort::BestMatch, 1))
            .unwrap();
        let q = url.query().unwrap();
        assert!(q.starts_with("q=topic%3Amachine-learning&page=1"));
        assert!(!q.contains("sort="));
    }

    #[tokio::test]
    async fn test_fetch_page_enriches_with_pull_request_counts() {
        let fetcher = Arc::new(
            FakeFetcher::new()
                .route("/search/repositories", SEARCH_BODY)
                .route("/repos/facebook/react/pulls", r#"[{"id":1},{"id":2},{"id":3}]"#)
                .fail("/repos/vuejs/vue/pulls", 500),
        );
        let page = provider(fetcher.clone(), None)
            .fetch_page(&query(Mode::Search, Some("ui"), RepoSort::Stars, 1))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].pull_requests, Some(3));
        assert_eq!(page.items[1].pull_requests, Some(0));
        assert_eq!(page.total, Some(13));
        assert!(page.has_more);
        assert_eq!(fetcher.urls().len(), 3);
    }

    #[tokio::test]
    async fn test_last_page_has_no_more() {
        let fetcher = Arc::new(
            FakeFetcher::new()
                .route("/search/repositories", SEARCH_BODY)
                .route("/repos/facebook/react/pulls", "[]")
                .route("/repos/vuejs/vue/pulls", "[]"),
        );
        let page = provider(fetcher, None)
            .fetch_page(&query(Mode::Search, Some("ui"), RepoSort::Stars, 3))
            .await
            .unwrap();
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_search_failure_propagates() {
        let fetcher = Arc::new(FakeFetcher::new().fail("/search/repositories", 422));
        let result = provider(fetcher, None)
            .fetch_page(&query(Mode::Discovery, None, RepoSort::Stars, 1))
            .await;
        assert!(matches!(result, Err(DashError::Upstream { status: 422, .. })));
    }

    #[tokio::test]
    async fn test_star_requires_token() {
        let fetcher = Arc::new(FakeFetcher::new());
        let github = provider(fetcher.clone(), None);
        let repo: Repo = serde_json::from_str::<SearchResponse>(SEARCH_BODY)
            .unwrap()
            .items
            .remove(0);

        let err = github.star(&repo).await.unwrap_err();
        assert!(matches!(err, DashError::Unauthorized(_)));
        assert_eq!(err.to_string(), "GitHub token not available.");
        assert!(fetcher.urls().is_empty());
    }

    #[tokio::test]
    async fn test_star_and_unstar_send_authorized_requests() {
        let fetcher = Arc::new(FakeFetcher::new().route("/user/starred/facebook/react", ""));
        let github = provider(fetcher.clone(), Some("tok"));
        let repo: Repo = serde_json::from_str::<SearchResponse>(SEARCH_BODY)
            .unwrap()
            .items
            .remove(0);

        github.star(&repo).await.unwrap();
        github.unstar(&repo).await.unwrap();

        let requests = fetcher.requests.lock().unwrap();
        assert_eq!(requests[0].method, Method::Put);
        assert_eq!(requests[1].method, Method::Delete);
        assert!(requests
            .iter()
            .all(|r| r.bearer_token.as_deref() == Some("tok")));
    }

    #[tokio::test]
    async fn test_viewer_stats_reports_graphql_errors() {
        let fetcher = Arc::new(
            FakeFetcher::new().route("/graphql", r#"{"data": null, "errors": [{"message": "bad"}]}"#),
        );
        let err = provider(fetcher, Some("tok"))
            .viewer_stats()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("GraphQL"));
    }
}
