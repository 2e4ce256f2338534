//! The three feeds, their saved sets, and the GitHub starred list.

use std::sync::Arc;

use tracing::info;

use crate::app::{AppContext, Result};
use crate::domain::{Article, Question, Repo, RepoSort};
use crate::feed::{Completion, FeedController, Outcome, Ticket};
use crate::provider::{DevToProvider, GitHubProvider, Provider, StackOverflowProvider};
use crate::store::{
    SavedItems, Store, SAVED_ARTICLES_KEY, SAVED_QUESTIONS_KEY, SAVED_REPOS_KEY,
};

/// A finished fetch for one of the feeds.
#[derive(Debug)]
pub enum FeedCompletion {
    Repos(Completion<Repo>),
    Questions(Completion<Question>),
    Articles(Completion<Article>),
}

pub struct Dashboard {
    pub repos: FeedController<GitHubProvider>,
    pub questions: FeedController<StackOverflowProvider>,
    pub articles: FeedController<DevToProvider>,
    pub saved_repos: SavedItems<Repo>,
    pub saved_questions: SavedItems<Question>,
    pub saved_articles: SavedItems<Article>,
    starred: Vec<Repo>,
}

impl Dashboard {
    pub fn new(
        github: Arc<GitHubProvider>,
        stackoverflow: Arc<StackOverflowProvider>,
        devto: Arc<DevToProvider>,
        store: Arc<dyn Store + Send + Sync>,
        max_saved_repos: usize,
    ) -> Result<Self> {
        Ok(Self {
            saved_repos: SavedItems::hydrate(
                store.clone(),
                SAVED_REPOS_KEY,
                github.noun(),
                Some(max_saved_repos),
            )?,
            saved_questions: SavedItems::hydrate(
                store.clone(),
                SAVED_QUESTIONS_KEY,
                stackoverflow.noun(),
                None,
            )?,
            saved_articles: SavedItems::hydrate(store, SAVED_ARTICLES_KEY, devto.noun(), None)?,
            repos: FeedController::new(github),
            questions: FeedController::new(stackoverflow),
            articles: FeedController::new(devto),
            starred: Vec::new(),
        })
    }

    pub fn from_context(ctx: &AppContext) -> Result<Self> {
        Self::new(
            ctx.github.clone(),
            ctx.stackoverflow.clone(),
            ctx.devto.clone(),
            ctx.store.clone(),
            ctx.config.feeds.max_saved_repos,
        )
    }

    pub fn github(&self) -> &Arc<GitHubProvider> {
        self.repos.provider()
    }

    /// Apply a completion to the feed it belongs to.
    pub fn apply(&mut self, completion: FeedCompletion) -> Outcome {
        match completion {
            FeedCompletion::Repos(c) => self.repos.complete(c),
            FeedCompletion::Questions(c) => self.questions.complete(c),
            FeedCompletion::Articles(c) => self.articles.complete(c),
        }
    }

    pub fn settle_new_items(&mut self) {
        self.repos.settle_new_items();
        self.questions.settle_new_items();
        self.articles.settle_new_items();
    }

    pub fn starred(&self) -> &[Repo] {
        &self.starred
    }

    pub fn is_starred(&self, repo: &Repo) -> bool {
        self.starred.iter().any(|s| s.same_repo(repo))
    }

    /// Replace the starred list with what GitHub reports.
    pub fn set_starred(&mut self, repos: Vec<Repo>) -> usize {
        self.starred = repos;
        self.starred.len()
    }

    /// Record a successful upstream star: move the repo from the feed to the
    /// starred list.
    ///
    /// Returns a ticket for a replacement item only when the repo left the
    /// live feed; starring from the saved view opens no gap.
    pub fn record_star(&mut self, repo: &Repo) -> Option<Ticket<RepoSort>> {
        let removed = self.repos.remove(repo.id);
        if !self.is_starred(repo) {
            self.starred.push(repo.clone());
        }
        info!("{} moved to starred list", repo.full_name);

        if removed.is_none() {
            return None;
        }
        let exclude = self.starred.iter().map(|r| r.id).collect();
        Some(self.repos.request_replacement(exclude))
    }

    pub fn record_unstar(&mut self, repo: &Repo) {
        self.starred.retain(|s| !s.same_repo(repo));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DashError;
    use crate::fetcher::parallel::ParallelFetcher;
    use crate::provider::testing::FakeFetcher;
    use crate::provider::Page;
    use crate::store::{Confirmation, SqliteStore, Toggle};

    const SEARCH_BODY: &str = r#"{
        "total_count": 3,
        "items": [
            {"id": 1, "name": "react", "full_name": "facebook/react",
             "owner": {"login": "facebook", "avatar_url": ""},
             "html_url": "https://github.com/facebook/react",
             "stargazers_count": 9, "forks_count": 1},
            {"id": 2, "name": "vue", "full_name": "vuejs/vue",
             "owner": {"login": "vuejs", "avatar_url": ""},
             "html_url": "https://github.com/vuejs/vue",
             "stargazers_count": 8, "forks_count": 1},
            {"id": 3, "name": "svelte", "full_name": "sveltejs/svelte",
             "owner": {"login": "sveltejs", "avatar_url": ""},
             "html_url": "https://github.com/sveltejs/svelte",
             "stargazers_count": 7, "forks_count": 1}
        ]
    }"#;

    fn dashboard(fetcher: Arc<FakeFetcher>, token: Option<&str>) -> Dashboard {
        let parallel = ParallelFetcher::with_workers(fetcher.clone(), 2);
        let github = GitHubProvider::new(fetcher.clone(), parallel, 2, token.map(String::from));
        Dashboard::new(
            Arc::new(github),
            Arc::new(StackOverflowProvider::new(fetcher.clone(), 6)),
            Arc::new(DevToProvider::new(fetcher, 10)),
            Arc::new(SqliteStore::in_memory().unwrap()),
            8,
        )
        .unwrap()
    }

    fn repo(id: i64, login: &str) -> Repo {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("repo{}", id),
            "full_name": format!("{}/repo{}", login, id),
            "owner": {"login": login, "avatar_url": ""},
            "html_url": format!("https://github.com/{}/repo{}", login, id),
            "stargazers_count": 0,
            "forks_count": 0
        }))
        .unwrap()
    }

    fn github_fetcher() -> Arc<FakeFetcher> {
        Arc::new(
            FakeFetcher::new()
                .route("/search/repositories", SEARCH_BODY)
                .route("/repos/facebook/react/pulls", "[]")
                .route("/repos/vuejs/vue/pulls", "[]")
                .route("/repos/sveltejs/svelte/pulls", "[]")
                .route("/user/starred/facebook/react", "")
                .route("/user/starred/facebook/repo1", ""),
        )
    }

    fn settle_search(dash: &mut Dashboard, items: Vec<Repo>) {
        let ticket = dash.repos.search("ui").unwrap();
        dash.repos.complete(Completion {
            token: ticket.token,
            kind: ticket.kind,
            result: Ok(Page {
                items,
                has_more: true,
                total: Some(3),
            }),
        });
    }

    #[tokio::test]
    async fn test_star_moves_repo_and_fills_gap() {
        let mut dash = dashboard(github_fetcher(), Some("tok"));
        settle_search(&mut dash, vec![repo(1, "facebook"), repo(2, "vuejs")]);
        let react = dash.repos.items()[0].clone();

        dash.github().star(&react).await.unwrap();
        let ticket = dash.record_star(&react).unwrap();
        assert!(dash.is_starred(&react));
        assert_eq!(dash.repos.items().len(), 1);

        let outcome = dash.repos.run(ticket).await;
        assert_eq!(outcome, Outcome::Replaced(Some(3)));
        assert!(dash.repos.is_new(3));
    }

    #[test]
    fn test_star_outside_feed_keeps_page_size() {
        let mut dash = dashboard(github_fetcher(), Some("tok"));
        settle_search(&mut dash, vec![repo(1, "facebook"), repo(2, "vuejs")]);

        let elsewhere = repo(99, "someone");
        assert!(dash.record_star(&elsewhere).is_none());
        assert!(dash.is_starred(&elsewhere));
        let ids: Vec<i64> = dash.repos.items().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_star_without_token_is_refused_upstream() {
        let dash = dashboard(github_fetcher(), None);
        let err = dash.github().star(&repo(1, "facebook")).await.unwrap_err();
        assert!(matches!(err, DashError::Unauthorized(_)));
        assert!(dash.starred().is_empty());
    }

    #[test]
    fn test_unstar_removes_from_starred_list() {
        let mut dash = dashboard(github_fetcher(), Some("tok"));
        let react = repo(1, "facebook");
        dash.record_star(&react);
        dash.record_unstar(&repo(1, "FACEBOOK"));
        assert!(!dash.is_starred(&react));
    }

    #[test]
    fn test_feed_and_saved_set_change_independently() {
        let mut dash = dashboard(github_fetcher(), Some("tok"));
        settle_search(&mut dash, vec![repo(1, "facebook"), repo(2, "vuejs")]);

        dash.saved_repos.toggle(&repo(1, "facebook")).unwrap();
        dash.record_star(&repo(1, "facebook"));
        assert!(dash.repos.items().iter().all(|r| r.id != 1));
        assert!(dash.saved_repos.contains(1));

        dash.saved_repos.toggle(&repo(2, "vuejs")).unwrap();
        assert_eq!(dash.saved_repos.toggle(&repo(2, "vuejs")).unwrap(), Toggle::Removed);
        assert!(!dash.saved_repos.contains(2));
        assert!(dash.repos.items().iter().any(|r| r.id == 2));
    }

    #[test]
    fn test_starred_match_ignores_login_case() {
        let mut dash = dashboard(Arc::new(FakeFetcher::new()), None);
        dash.starred.push(repo(7, "Facebook"));
        assert!(dash.is_starred(&repo(7, "facebook")));
        assert!(!dash.is_starred(&repo(7, "meta")));
        assert!(!dash.is_starred(&repo(8, "facebook")));
    }

    #[tokio::test]
    async fn test_load_starred() {
        let body = serde_json::to_string(&vec![repo(4, "a"), repo(5, "b")]).unwrap();
        let fetcher = Arc::new(FakeFetcher::new().route("/user/starred", &body));
        let mut dash = dashboard(fetcher, Some("tok"));
        let repos = dash.github().starred().await.unwrap();
        assert_eq!(dash.set_starred(repos), 2);
        assert!(dash.is_starred(&repo(5, "B")));
    }

    #[test]
    fn test_saved_repos_capacity_from_config() {
        let mut dash = dashboard(Arc::new(FakeFetcher::new()), None);
        for id in 0..8 {
            dash.saved_repos.toggle(&repo(id, "o")).unwrap();
        }
        let err = dash.saved_repos.toggle(&repo(99, "o")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "You have reached the limit of 8 saved repositories."
        );
        assert_eq!(dash.saved_repos.len(), 8);
    }

    #[test]
    fn test_same_id_on_another_page_is_recognized_as_saved() {
        let mut dash = dashboard(Arc::new(FakeFetcher::new()), None);
        let first = repo(42, "rust-lang");
        assert_eq!(dash.saved_repos.toggle(&first).unwrap(), Toggle::Added);

        let mut later = repo(42, "rust-lang");
        later.stargazers_count = 1000;
        assert!(dash.saved_repos.contains(later.id));
        assert_eq!(dash.saved_repos.toggle(&later).unwrap(), Toggle::Removed);
    }

    #[test]
    fn test_clear_all_needs_confirmation() {
        let mut dash = dashboard(Arc::new(FakeFetcher::new()), None);
        dash.saved_repos.toggle(&repo(1, "o")).unwrap();
        assert!(!dash.saved_repos.clear_all(Confirmation::Declined).unwrap());
        assert_eq!(dash.saved_repos.len(), 1);
        assert!(dash.saved_repos.clear_all(Confirmation::Confirmed).unwrap());
        assert!(dash.saved_repos.is_empty());
    }
}
