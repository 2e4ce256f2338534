pub mod saved;
pub mod sqlite;

use crate::app::Result;

pub use saved::{Confirmation, SavedItems, Toggle};
pub use sqlite::SqliteStore;

pub const SAVED_REPOS_KEY: &str = "savedRepos";
pub const SAVED_QUESTIONS_KEY: &str = "savedQuestions";
pub const SAVED_ARTICLES_KEY: &str = "savedDevToArticles";

/// Durable string key-value storage.
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}
