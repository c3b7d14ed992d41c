//! The map of changes the user has applied.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use log::trace;

use super::observable::{Subscribers, Subscription};
use crate::change::{apply_changes, Change};
use crate::error::Result;

/// Notification sent to `AppliedEdits` subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditEvent {
    /// A change was stored under `key`, replacing `previous` if any.
    Inserted {
        key: String,
        change: Change,
        previous: Option<Change>,
    },
    /// The change stored under `key` was removed.
    Removed { key: String, change: Change },
    /// All changes were removed.
    Cleared,
}

/// Changes applied by the user, keyed by an identifier chosen by the view
/// (typically a [`DiffNodeHandle`](crate::DiffNodeHandle) string).
///
/// Keys are unique; inserting an existing key overwrites its change.
/// Iteration order is unspecified.
pub struct AppliedEdits {
    edits: RefCell<HashMap<String, Change>>,
    subscribers: Subscribers<EditEvent>,
}

impl AppliedEdits {
    pub fn new() -> Self {
        AppliedEdits {
            edits: RefCell::new(HashMap::new()),
            subscribers: Subscribers::new(),
        }
    }

    /// Stores `change` under `key` and returns the change it replaced.
    pub fn insert(&self, key: impl Into<String>, change: Change) -> Option<Change> {
        let key = key.into();
        let previous = self.edits.borrow_mut().insert(key.clone(), change);
        trace!("applied edit {} (replaced: {})", key, previous.is_some());
        self.subscribers.notify(&EditEvent::Inserted {
            key,
            change,
            previous,
        });
        previous
    }

    /// Removes and returns the change stored under `key`.
    pub fn remove(&self, key: &str) -> Option<Change> {
        let removed = self.edits.borrow_mut().remove(key);
        if let Some(change) = removed {
            trace!("removed edit {}", key);
            self.subscribers.notify(&EditEvent::Removed {
                key: key.to_string(),
                change,
            });
        }
        removed
    }

    pub fn get(&self, key: &str) -> Option<Change> {
        self.edits.borrow().get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.edits.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.edits.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.borrow().is_empty()
    }

    /// Removes every change. Subscribers are notified even if the map was
    /// already empty.
    pub fn clear(&self) {
        self.edits.borrow_mut().clear();
        trace!("cleared applied edits");
        self.subscribers.notify(&EditEvent::Cleared);
    }

    /// Returns a snapshot of all (key, change) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (String, Change)> {
        let snapshot: Vec<(String, Change)> = self
            .edits
            .borrow()
            .iter()
            .map(|(key, change)| (key.clone(), *change))
            .collect();
        snapshot.into_iter()
    }

    /// Returns all stored changes, ordered by key.
    pub fn changes(&self) -> Vec<Change> {
        let edits = self.edits.borrow();
        let mut entries: Vec<(&String, &Change)> = edits.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, change)| *change).collect()
    }

    /// Applies every stored change to `text1`, taking new content from
    /// `text2`.
    pub fn apply(&self, text1: &str, text2: &str) -> Result<String> {
        apply_changes(text1, text2, &self.changes())
    }

    pub fn subscribe(&self, callback: impl Fn(&EditEvent) + 'static) -> Subscription {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.subscribers.unsubscribe(subscription)
    }
}

impl Default for AppliedEdits {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AppliedEdits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppliedEdits")
            .field("edits", &self.edits.borrow())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
