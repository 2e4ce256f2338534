use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::app::error::{DashError, Result};
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::parallel::ParallelFetcher;
use crate::fetcher::Fetcher;
use crate::provider::{DevToProvider, GitHubProvider, StackOverflowProvider};
use crate::store::SqliteStore;

/// Shared services for the CLI commands and the TUI.
pub struct AppContext {
    pub config: Arc<Config>,
    pub store: Arc<SqliteStore>,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub github: Arc<GitHubProvider>,
    pub stackoverflow: Arc<StackOverflowProvider>,
    pub devto: Arc<DevToProvider>,
}

impl AppContext {
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };
        let store = Arc::new(SqliteStore::new(&db_path)?);
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new()?);
        Ok(Self::with_services(config, store, fetcher))
    }

    /// Build the providers over an existing store and fetcher.
    pub fn with_services(
        config: Config,
        store: Arc<SqliteStore>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
    ) -> Self {
        let feeds = &config.feeds;
        let token = config.github_token();
        debug!(
            "GitHub token {}",
            if token.is_some() { "configured" } else { "not configured" }
        );

        let parallel = ParallelFetcher::with_workers(fetcher.clone(), feeds.enrich_concurrency);
        let github = Arc::new(GitHubProvider::new(
            fetcher.clone(),
            parallel,
            feeds.repos_per_page,
            token,
        ));
        let stackoverflow = Arc::new(StackOverflowProvider::new(
            fetcher.clone(),
            feeds.questions_per_page,
        ));
        let devto = Arc::new(DevToProvider::new(fetcher.clone(), feeds.articles_per_page));

        Self {
            config: Arc::new(config),
            store,
            fetcher,
            github,
            stackoverflow,
            devto,
        }
    }

    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| DashError::Config("Could not find data directory".into()))?;
        let dir = data_dir.join("devdash");
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn default_db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("devdash.db"))
    }
}
