//! Snapshot store adapters.
//!
//! `SledSnapshotStore` is the durable adapter: one sled database with a tree
//! per concern, keyed by workspace. Snapshots are stored as JSON (the same
//! flat-list shape the catalog interchange format uses); the bookmark index
//! is small and fixed-shape, so it is stored bincode-encoded.
//! `MemorySnapshotStore` backs tests.

use crate::bookmarks::BookmarkIndex;
use crate::error::StorageError;
use crate::store::{DriveSnapshot, SnapshotStore};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

const SNAPSHOT_TREE: &str = "snapshots";
const BOOKMARK_TREE: &str = "bookmarks";

/// Sled-backed snapshot store.
pub struct SledSnapshotStore {
    snapshots: sled::Tree,
    bookmarks: sled::Tree,
}

impl SledSnapshotStore {
    /// Open (creating if needed) the store at the given path.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        let snapshots = db.open_tree(SNAPSHOT_TREE)?;
        let bookmarks = db.open_tree(BOOKMARK_TREE)?;
        info!(path = %path.display(), "opened snapshot store");
        Ok(SledSnapshotStore {
            snapshots,
            bookmarks,
        })
    }
}

impl SnapshotStore for SledSnapshotStore {
    fn load(&self, workspace: &str) -> Result<Option<DriveSnapshot>, StorageError> {
        match self.snapshots.get(workspace.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn save(&self, workspace: &str, snapshot: &DriveSnapshot) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(snapshot)?;
        self.snapshots.insert(workspace.as_bytes(), bytes)?;
        self.snapshots.flush()?;
        Ok(())
    }

    fn load_bookmarks(&self, workspace: &str) -> Result<Option<BookmarkIndex>, StorageError> {
        match self.bookmarks.get(workspace.as_bytes())? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn save_bookmarks(&self, workspace: &str, index: &BookmarkIndex) -> Result<(), StorageError> {
        let bytes = bincode::serialize(index)?;
        self.bookmarks.insert(workspace.as_bytes(), bytes)?;
        self.bookmarks.flush()?;
        Ok(())
    }
}

/// In-memory snapshot store for tests.
#[derive(Default)]
pub struct MemorySnapshotStore {
    snapshots: RwLock<HashMap<String, DriveSnapshot>>,
    bookmarks: RwLock<HashMap<String, BookmarkIndex>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, workspace: &str) -> Result<Option<DriveSnapshot>, StorageError> {
        Ok(self.snapshots.read().get(workspace).cloned())
    }

    fn save(&self, workspace: &str, snapshot: &DriveSnapshot) -> Result<(), StorageError> {
        self.snapshots
            .write()
            .insert(workspace.to_string(), snapshot.clone());
        Ok(())
    }

    fn load_bookmarks(&self, workspace: &str) -> Result<Option<BookmarkIndex>, StorageError> {
        Ok(self.bookmarks.read().get(workspace).cloned())
    }

    fn save_bookmarks(&self, workspace: &str, index: &BookmarkIndex) -> Result<(), StorageError> {
        self.bookmarks
            .write()
            .insert(workspace.to_string(), index.clone());
        Ok(())
    }
}
