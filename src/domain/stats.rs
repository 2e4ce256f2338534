use serde::Deserialize;

/// Summary of the authenticated GitHub user, built from the GraphQL
/// `viewer` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerStats {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub followers: u64,
    pub public_repos: u64,
    pub total_stars: u64,
    pub merged_pull_requests: u64,
    pub closed_issues: u64,
    pub open_pull_requests: u64,
    pub open_issues: u64,
    pub total_contributions: u64,
}

pub const VIEWER_STATS_QUERY: &str = r#"
query {
  viewer {
    name
    login
    avatarUrl
    followers { totalCount }
    contributionsCollection {
      contributionCalendar { totalContributions }
    }
    repositories(first: 100, privacy: PUBLIC, isFork: false) {
      totalCount
      nodes { stargazerCount }
    }
    pullRequests(first: 100, states: MERGED) { totalCount }
    issues(first: 100, states: CLOSED) { totalCount }
    openPullRequests: pullRequests(first: 100, states: OPEN) { totalCount }
    openIssues: issues(first: 100, states: OPEN) { totalCount }
  }
}
"#;

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse {
    pub data: Option<ViewerData>,
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ViewerData {
    pub viewer: RawViewer,
}

#[derive(Debug, Deserialize)]
struct Count {
    #[serde(rename = "totalCount")]
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct StarNode {
    #[serde(rename = "stargazerCount")]
    stargazer_count: u64,
}

#[derive(Debug, Deserialize)]
struct Repositories {
    #[serde(rename = "totalCount")]
    total_count: u64,
    #[serde(default)]
    nodes: Vec<StarNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Calendar {
    total_contributions: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Contributions {
    contribution_calendar: Calendar,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawViewer {
    name: Option<String>,
    login: String,
    #[serde(default)]
    avatar_url: String,
    followers: Count,
    contributions_collection: Contributions,
    repositories: Repositories,
    pull_requests: Count,
    issues: Count,
    open_pull_requests: Count,
    open_issues: Count,
}

impl From<RawViewer> for ViewerStats {
    fn from(raw: RawViewer) -> Self {
        Self {
            login: raw.login,
            name: raw.name,
            avatar_url: raw.avatar_url,
            followers: raw.followers.total_count,
            public_repos: raw.repositories.total_count,
            total_stars: raw
                .repositories
                .nodes
                .iter()
                .map(|n| n.stargazer_count)
                .sum(),
            merged_pull_requests: raw.pull_requests.total_count,
            closed_issues: raw.issues.total_count,
            open_pull_requests: raw.open_pull_requests.total_count,
            open_issues: raw.open_issues.total_count,
            total_contributions: raw
                .contributions_collection
                .contribution_calendar
                .total_contributions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_stats_from_graphql() {
        let json = r#"{"data": {"viewer": {
            "name": "Octo Cat",
            "login": "octocat",
            "avatarUrl": "https://avatars/1",
            "followers": {"totalCount": 12},
            "contributionsCollection": {"contributionCalendar": {"totalContributions": 345}},
            "repositories": {"totalCount": 3, "nodes": [
                {"stargazerCount": 10}, {"stargazerCount": 5}, {"stargazerCount": 0}
            ]},
            "pullRequests": {"totalCount": 7},
            "issues": {"totalCount": 4},
            "openPullRequests": {"totalCount": 1},
            "openIssues": {"totalCount": 2}
        }}}"#;
        let response: GraphQlResponse = serde_json::from_str(json).unwrap();
        let stats = ViewerStats::from(response.data.unwrap().viewer);
        assert_eq!(stats.login, "octocat");
        assert_eq!(stats.total_stars, 15);
        assert_eq!(stats.public_repos, 3);
        assert_eq!(stats.merged_pull_requests, 7);
        assert_eq!(stats.total_contributions, 345);
    }
}
