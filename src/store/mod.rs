//! Snapshot Store
//!
//! Persistence port for the drive tree and the bookmark index, keyed by
//! workspace. The flat item list is the serialized source of truth; the tree
//! rebuilds its adjacency index from it on load. Callers persist after every
//! successful mutation and load on session start — the model itself never
//! touches storage.

pub mod persistence;

pub use persistence::{MemorySnapshotStore, SledSnapshotStore};

use crate::bookmarks::BookmarkIndex;
use crate::error::StorageError;
use crate::tree::DriveItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable form of a workspace's drive tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveSnapshot {
    pub items: Vec<DriveItem>,
    pub saved_at: DateTime<Utc>,
}

impl DriveSnapshot {
    pub fn new(items: Vec<DriveItem>) -> Self {
        DriveSnapshot {
            items,
            saved_at: Utc::now(),
        }
    }
}

/// Snapshot store interface.
pub trait SnapshotStore: Send + Sync {
    fn load(&self, workspace: &str) -> Result<Option<DriveSnapshot>, StorageError>;
    fn save(&self, workspace: &str, snapshot: &DriveSnapshot) -> Result<(), StorageError>;
    fn load_bookmarks(&self, workspace: &str) -> Result<Option<BookmarkIndex>, StorageError>;
    fn save_bookmarks(&self, workspace: &str, index: &BookmarkIndex) -> Result<(), StorageError>;
}
