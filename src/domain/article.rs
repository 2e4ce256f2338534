use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::{time_ago, FeedItem, SortKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleAuthor {
    pub name: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// A dev.to article listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub positive_reactions_count: u64,
    #[serde(default)]
    pub comments_count: u64,
    #[serde(default)]
    pub tag_list: Vec<String>,
    #[serde(default)]
    pub reading_time_minutes: u32,
    pub user: ArticleAuthor,
}

impl FeedItem for Article {
    fn item_id(&self) -> i64 {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn link(&self) -> &str {
        &self.url
    }

    fn byline(&self) -> &str {
        &self.user.name
    }

    fn stats_line(&self) -> String {
        format!(
            "♥ {}  💬 {}  {} min",
            self.positive_reactions_count, self.comments_count, self.reading_time_minutes
        )
    }

    fn details(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Published: {}", time_ago(self.published_at, Utc::now())),
            format!("Reactions: {}", self.positive_reactions_count),
            format!("Comments: {}", self.comments_count),
            format!("Reading time: {} min", self.reading_time_minutes),
        ];
        if !self.tag_list.is_empty() {
            let tags: Vec<String> = self.tag_list.iter().map(|t| format!("#{}", t)).collect();
            lines.push(format!("Tags: {}", tags.join(" ")));
        }
        lines
    }
}

/// dev.to has no server-side sort, so these order the fetched page only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleSort {
    Reactions,
    Newest,
    Comments,
}

impl ArticleSort {
    /// Descending comparator for a stable sort.
    pub fn compare(self, a: &Article, b: &Article) -> Ordering {
        match self {
            ArticleSort::Reactions => b.positive_reactions_count.cmp(&a.positive_reactions_count),
            ArticleSort::Newest => b.published_at.cmp(&a.published_at),
            ArticleSort::Comments => b.comments_count.cmp(&a.comments_count),
        }
    }
}

impl SortKey for ArticleSort {
    fn all() -> &'static [Self] {
        &[ArticleSort::Reactions, ArticleSort::Newest, ArticleSort::Comments]
    }

    fn label(self) -> &'static str {
        match self {
            ArticleSort::Reactions => "Reactions",
            ArticleSort::Newest => "Newest",
            ArticleSort::Comments => "Comments",
        }
    }

    fn name(self) -> &'static str {
        match self {
            ArticleSort::Reactions => "reactions",
            ArticleSort::Newest => "published_at",
            ArticleSort::Comments => "comments_count",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_listing_entry() {
        let json = r#"{
            "type_of": "article",
            "id": 1001,
            "title": "Async Rust in practice",
            "url": "https://dev.to/someone/async-rust",
            "cover_image": null,
            "published_at": "2024-05-01T10:00:00Z",
            "positive_reactions_count": 120,
            "comments_count": 8,
            "tag_list": ["rust", "async"],
            "reading_time_minutes": 7,
            "user": {"name": "Someone", "profile_image": "https://img/1"}
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.item_id(), 1001);
        assert_eq!(article.byline(), "Someone");
        assert_eq!(article.tag_list, vec!["rust", "async"]);
    }

    #[test]
    fn test_sort_names() {
        assert_eq!(ArticleSort::parse("newest"), Some(ArticleSort::Newest));
        assert_eq!(ArticleSort::parse("comments_count"), Some(ArticleSort::Comments));
    }
}
