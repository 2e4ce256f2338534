use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item::{time_ago, FeedItem, SortKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOwner {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// A Stack Overflow question from the Stack Exchange `questions` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: i64,
    pub title: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub answer_count: u64,
    #[serde(default)]
    pub view_count: u64,
    pub link: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Unix seconds.
    #[serde(default)]
    pub creation_date: i64,
    #[serde(default)]
    pub is_answered: bool,
    pub owner: QuestionOwner,
}

impl Question {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.creation_date, 0)
    }

    /// Stack Exchange returns titles with HTML entities escaped.
    pub fn decode_entities(mut self) -> Self {
        self.title = html_escape::decode_html_entities(&self.title).into_owned();
        self.owner.display_name =
            html_escape::decode_html_entities(&self.owner.display_name).into_owned();
        self
    }
}

impl FeedItem for Question {
    fn item_id(&self) -> i64 {
        self.question_id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn link(&self) -> &str {
        &self.link
    }

    fn byline(&self) -> &str {
        &self.owner.display_name
    }

    fn stats_line(&self) -> String {
        format!(
            "{} votes  {} answers  {} views",
            self.score, self.answer_count, self.view_count
        )
    }

    fn details(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Votes: {}", self.score),
            format!(
                "Answers: {}{}",
                self.answer_count,
                if self.is_answered { " (answered)" } else { "" }
            ),
            format!("Views: {}", self.view_count),
        ];
        if let Some(created) = self.created_at() {
            lines.push(format!("Asked: {}", time_ago(created, Utc::now())));
        }
        if !self.tags.is_empty() {
            let tags: Vec<String> = self.tags.iter().map(|t| format!("#{}", t)).collect();
            lines.push(format!("Tags: {}", tags.join(" ")));
        }
        lines
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSort {
    Votes,
    Answers,
    Views,
}

impl QuestionSort {
    pub fn query_param(self) -> &'static str {
        match self {
            QuestionSort::Votes => "votes",
            QuestionSort::Answers => "answer_count",
            QuestionSort::Views => "view_count",
        }
    }
}

impl SortKey for QuestionSort {
    fn all() -> &'static [Self] {
        &[QuestionSort::Votes, QuestionSort::Answers, QuestionSort::Views]
    }

    fn label(self) -> &'static str {
        match self {
            QuestionSort::Votes => "Votes",
            QuestionSort::Answers => "Answers",
            QuestionSort::Views => "Views",
        }
    }

    fn name(self) -> &'static str {
        self.query_param()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_and_decode() {
        let json = r#"{
            "question_id": 11227809,
            "title": "Why is processing a sorted array faster than an unsorted array?",
            "score": 27000,
            "answer_count": 26,
            "view_count": 1900000,
            "link": "https://stackoverflow.com/questions/11227809",
            "tags": ["java", "c&#43;&#43;"],
            "creation_date": 1340805096,
            "is_answered": true,
            "owner": {"display_name": "GManNickG &amp; co", "profile_image": null}
        }"#;
        let question: Question = serde_json::from_str::<Question>(json).unwrap().decode_entities();
        assert_eq!(question.item_id(), 11227809);
        assert_eq!(question.owner.display_name, "GManNickG & co");
        assert!(question.created_at().is_some());
    }

    #[test]
    fn test_title_entities_decoded() {
        let question = Question {
            question_id: 1,
            title: "What does &quot;use strict&quot; do?".into(),
            score: 0,
            answer_count: 0,
            view_count: 0,
            link: String::new(),
            tags: vec![],
            creation_date: 0,
            is_answered: false,
            owner: QuestionOwner {
                display_name: "x".into(),
                profile_image: None,
            },
        }
        .decode_entities();
        assert_eq!(question.title, "What does \"use strict\" do?");
    }

    #[test]
    fn test_sort_names_match_api() {
        assert_eq!(QuestionSort::parse("answer_count"), Some(QuestionSort::Answers));
        assert_eq!(QuestionSort::parse("views"), Some(QuestionSort::Views));
        assert_eq!(QuestionSort::Votes.query_param(), "votes");
    }
}
