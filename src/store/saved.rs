//! Locally saved ("favorited") items, one set per feed.
//!
//! A set is read from its store key once, when it is created, and written back
//! in full after every mutation. Membership is decided by item id only.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::app::{DashError, Result};
use crate::domain::FeedItem;
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Answer to the "remove everything?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

pub struct SavedItems<T> {
    key: &'static str,
    noun: &'static str,
    capacity: Option<usize>,
    items: Vec<T>,
    store: Arc<dyn Store + Send + Sync>,
}

impl<T: FeedItem> SavedItems<T> {
    /// Load the set stored under `key`, or start empty.
    ///
    /// `noun` is the plural used in user-facing notices ("repositories").
    pub fn hydrate(
        store: Arc<dyn Store + Send + Sync>,
        key: &'static str,
        noun: &'static str,
        capacity: Option<usize>,
    ) -> Result<Self> {
        let items = match store.get(key)? {
            Some(raw) => match serde_json::from_str::<Vec<T>>(&raw) {
                Ok(items) => items,
                Err(e) => {
                    warn!("Ignoring unreadable saved set {}: {}", key, e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        debug!("Hydrated {} with {} items", key, items.len());

        Ok(Self {
            key,
            noun,
            capacity,
            items,
            store,
        })
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn noun(&self) -> &'static str {
        self.noun
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn contains(&self, id: i64) -> bool {
        self.items.iter().any(|i| i.item_id() == id)
    }

    /// Remove `item` if an item with its id is saved, otherwise append it.
    ///
    /// Appending to a full set fails with [`DashError::CapacityExceeded`] and
    /// leaves the set untouched.
    pub fn toggle(&mut self, item: &T) -> Result<Toggle> {
        let id = item.item_id();

        if self.contains(id) {
            let updated: Vec<T> = self
                .items
                .iter()
                .filter(|i| i.item_id() != id)
                .cloned()
                .collect();
            self.persist(&updated)?;
            self.items = updated;
            return Ok(Toggle::Removed);
        }

        if let Some(limit) = self.capacity {
            if self.items.len() >= limit {
                return Err(DashError::CapacityExceeded {
                    limit,
                    noun: self.noun,
                });
            }
        }

        let mut updated = self.items.clone();
        updated.push(item.clone());
        self.persist(&updated)?;
        self.items = updated;
        Ok(Toggle::Added)
    }

    /// Empty the set and its stored copy. Returns whether anything was done.
    pub fn clear_all(&mut self, confirmation: Confirmation) -> Result<bool> {
        if confirmation != Confirmation::Confirmed {
            return Ok(false);
        }
        self.store.delete(self.key)?;
        self.items.clear();
        Ok(true)
    }

    fn persist(&self, items: &[T]) -> Result<()> {
        let raw = serde_json::to_string(items)?;
        self.store.put(self.key, &raw)
    }
}
