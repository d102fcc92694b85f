//! Mutation serialization for the shared drive tree.
//!
//! Every write goes through one lock, so `delete_subtree`'s
//! compute-set-then-remove protocol never interleaves with a concurrent
//! insert adding a child mid-traversal. Reads take the same lock briefly and
//! return owned snapshots, valid until the next mutation.

use crate::error::{IntegrityError, ValidationError};
use crate::tree::{DriveItem, DriveTree};
use crate::types::ItemId;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

/// Shared handle owning the drive tree behind a read-write lock.
#[derive(Clone)]
pub struct SharedDriveTree {
    inner: Arc<RwLock<DriveTree>>,
}

impl SharedDriveTree {
    pub fn new(tree: DriveTree) -> Self {
        SharedDriveTree {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<DriveItem> {
        self.inner.read().get(id).cloned()
    }

    /// Cloned children of a folder, insertion order.
    pub fn list_children(&self, folder: Option<&str>) -> Vec<DriveItem> {
        self.inner
            .read()
            .list_children(folder)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Cloned ancestor path, root → immediate parent.
    pub fn resolve_ancestor_path(&self, id: &str) -> Result<Vec<DriveItem>, IntegrityError> {
        Ok(self
            .inner
            .read()
            .resolve_ancestor_path(id)?
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn insert(&self, item: DriveItem) -> Result<(), ValidationError> {
        self.inner.write().insert(item)
    }

    pub fn delete_subtree(&self, id: &str) -> Result<HashSet<ItemId>, IntegrityError> {
        self.inner.write().delete_subtree(id)
    }

    /// Flat snapshot taken under the lock, for persistence.
    pub fn snapshot(&self) -> Vec<DriveItem> {
        self.inner.read().to_snapshot()
    }
}
