use serde::{Deserialize, Serialize};

use super::item::{FeedItem, SortKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoOwner {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
}

/// A repository as returned by the GitHub search and starred endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repo {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub full_name: String,
    pub owner: RepoOwner,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    /// Open pull requests, filled in after the search response arrives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_requests: Option<u64>,
}

impl Repo {
    /// Same repository by id and owner, ignoring login case.
    pub fn same_repo(&self, other: &Repo) -> bool {
        self.id == other.id && self.owner.login.eq_ignore_ascii_case(&other.owner.login)
    }

    pub fn fork_url(&self) -> String {
        format!("https://github.com/{}/{}/fork", self.owner.login, self.name)
    }
}

impl FeedItem for Repo {
    fn item_id(&self) -> i64 {
        self.id
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn link(&self) -> &str {
        &self.html_url
    }

    fn byline(&self) -> &str {
        &self.owner.login
    }

    fn stats_line(&self) -> String {
        let mut line = format!("★ {}  ⑂ {}", self.stargazers_count, self.forks_count);
        if let Some(prs) = self.pull_requests {
            line.push_str(&format!("  PRs {}", prs));
        }
        line
    }

    fn details(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(description) = &self.description {
            lines.push(description.clone());
            lines.push(String::new());
        }
        if let Some(language) = &self.language {
            lines.push(format!("Language: {}", language));
        }
        lines.push(format!("Stars: {}", self.stargazers_count));
        lines.push(format!("Forks: {}", self.forks_count));
        if let Some(prs) = self.pull_requests {
            lines.push(format!("Open pull requests: {}", prs));
        }
        lines.push(format!("Fork: {}", self.fork_url()));
        lines
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoSort {
    BestMatch,
    Stars,
    Forks,
}

impl RepoSort {
    /// Value of the search API `sort` parameter; best match omits it.
    pub fn query_param(self) -> Option<&'static str> {
        match self {
            RepoSort::BestMatch => None,
            RepoSort::Stars => Some("stars"),
            RepoSort::Forks => Some("forks"),
        }
    }
}

impl SortKey for RepoSort {
    fn all() -> &'static [Self] {
        &[RepoSort::BestMatch, RepoSort::Stars, RepoSort::Forks]
    }

    fn label(self) -> &'static str {
        match self {
            RepoSort::BestMatch => "Best Match",
            RepoSort::Stars => "Most Stars",
            RepoSort::Forks => "Most Forks",
        }
    }

    fn name(self) -> &'static str {
        match self {
            RepoSort::BestMatch => "best-match",
            RepoSort::Stars => "stars",
            RepoSort::Forks => "forks",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(id: i64, login: &str) -> Repo {
        Repo {
            id,
            name: "ratatui".into(),
            full_name: format!("{}/ratatui", login),
            owner: RepoOwner {
                login: login.into(),
                avatar_url: String::new(),
            },
            html_url: "https://github.com/ratatui/ratatui".into(),
            description: Some("Rust TUI library".into()),
            stargazers_count: 10,
            forks_count: 2,
            language: Some("Rust".into()),
            pull_requests: None,
        }
    }

    #[test]
    fn test_deserialize_search_item() {
        let json = r#"{
            "id": 42,
            "name": "react",
            "full_name": "facebook/react",
            "owner": {"login": "facebook", "avatar_url": "https://a/1"},
            "html_url": "https://github.com/facebook/react",
            "description": null,
            "stargazers_count": 220000,
            "forks_count": 45000,
            "topics": ["ui"]
        }"#;
        let repo: Repo = serde_json::from_str(json).unwrap();
        assert_eq!(repo.id, 42);
        assert_eq!(repo.owner.login, "facebook");
        assert_eq!(repo.description, None);
        assert_eq!(repo.pull_requests, None);
    }

    #[test]
    fn test_same_repo_ignores_login_case() {
        assert!(repo(1, "Ratatui").same_repo(&repo(1, "ratatui")));
        assert!(!repo(1, "ratatui").same_repo(&repo(2, "ratatui")));
        assert!(!repo(1, "ratatui").same_repo(&repo(1, "someone")));
    }

    #[test]
    fn test_stats_line_includes_pull_requests_when_known() {
        let mut r = repo(1, "ratatui");
        assert_eq!(r.stats_line(), "★ 10  ⑂ 2");
        r.pull_requests = Some(3);
        assert_eq!(r.stats_line(), "★ 10  ⑂ 2  PRs 3");
    }

    #[test]
    fn test_best_match_has_no_query_param() {
        assert_eq!(RepoSort::BestMatch.query_param(), None);
        assert_eq!(RepoSort::Forks.query_param(), Some("forks"));
        assert_eq!(RepoSort::parse("most stars"), Some(RepoSort::Stars));
    }
}
