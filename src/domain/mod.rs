pub mod article;
pub mod item;
pub mod question;
pub mod repo;
pub mod stats;

pub use article::{Article, ArticleAuthor, ArticleSort};
pub use item::{time_ago, FeedItem, Mode, SortKey};
pub use question::{Question, QuestionOwner, QuestionSort};
pub use repo::{Repo, RepoOwner, RepoSort};
pub use stats::ViewerStats;
