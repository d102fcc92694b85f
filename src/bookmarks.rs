//! Bookmark index
//!
//! Per-workspace set of item ids the user has starred. The index lives
//! outside the tree, so it must be reconciled against the removed-id set
//! returned by `delete_subtree`; otherwise it would keep referencing ids
//! that no longer exist.

use crate::types::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Ordered set of bookmarked item ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookmarkIndex {
    ids: BTreeSet<ItemId>,
}

impl BookmarkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bookmark. Returns false if the id was already bookmarked.
    pub fn add(&mut self, id: impl Into<ItemId>) -> bool {
        self.ids.insert(id.into())
    }

    /// Remove a bookmark. Returns false if the id was not bookmarked.
    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.ids.iter()
    }

    /// Drop every bookmark whose id was removed from the tree. Returns the
    /// number of bookmarks pruned.
    pub fn reconcile(&mut self, removed: &HashSet<ItemId>) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| !removed.contains(id));
        let pruned = before - self.ids.len();
        if pruned > 0 {
            debug!(pruned, "pruned bookmarks for deleted items");
        }
        pruned
    }
}
