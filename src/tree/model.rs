//! Drive tree model
//!
//! Owns the flat item collection and a parent→children adjacency index kept
//! in sync on every mutation. The flat list (in insertion order) is the source
//! of truth for serialization; the index turns child lookups into O(1) and
//! subtree deletion into O(subtree size).
//!
//! Soft-failure policy: unknown folder ids list as empty and deleting a
//! missing id is a no-op. The only hard errors are insert precondition
//! violations ([`ValidationError`]) and corrupted-collection detection during
//! traversal ([`IntegrityError`]).

use crate::error::{IntegrityError, ValidationError};
use crate::tree::DriveItem;
use crate::types::ItemId;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, warn};

/// Flat collection of drive items with an incremental adjacency index.
#[derive(Debug, Clone, Default)]
pub struct DriveTree {
    /// Item storage, keyed by id.
    items: HashMap<ItemId, DriveItem>,
    /// Item ids in insertion order; drives iteration and serialization.
    order: Vec<ItemId>,
    /// Direct children of each folder, in insertion order.
    children: HashMap<ItemId, Vec<ItemId>>,
    /// Direct children of the root, in insertion order.
    root_children: Vec<ItemId>,
}

impl DriveTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a tree from a flat snapshot, validating collection invariants.
    ///
    /// Items must appear with parents before children (the order mutations
    /// produce). Duplicate ids, references to missing parents, and file-typed
    /// parents are integrity violations, not validation errors: a snapshot is
    /// external state and corruption in it is a defect, not a bad request.
    pub fn from_snapshot(items: Vec<DriveItem>) -> Result<Self, IntegrityError> {
        let mut tree = DriveTree::new();
        for item in items {
            if tree.items.contains_key(&item.id) {
                return Err(IntegrityError::DuplicateId(item.id));
            }
            if let Some(parent_id) = &item.parent_id {
                match tree.items.get(parent_id) {
                    None => {
                        return Err(IntegrityError::DanglingParent {
                            item: item.id.clone(),
                            parent: parent_id.clone(),
                        })
                    }
                    Some(parent) if !parent.is_folder() => {
                        return Err(IntegrityError::DanglingParent {
                            item: item.id.clone(),
                            parent: parent_id.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
            tree.link(item);
        }
        debug!(items = tree.len(), "rebuilt drive tree from snapshot");
        Ok(tree)
    }

    /// Flatten the collection back into its serialized form, insertion order.
    pub fn to_snapshot(&self) -> Vec<DriveItem> {
        self.order
            .iter()
            .filter_map(|id| self.items.get(id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&DriveItem> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Iterate all items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &DriveItem> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Direct children of a folder (`None` = root), in insertion order.
    ///
    /// An unknown folder id yields an empty sequence; "folder not found shows
    /// as empty" is the expected state in a file browser, not a failure.
    pub fn list_children(&self, folder: Option<&str>) -> Vec<&DriveItem> {
        let child_ids = match folder {
            None => &self.root_children,
            Some(id) => match self.children.get(id) {
                Some(ids) => ids,
                None => return Vec::new(),
            },
        };
        child_ids
            .iter()
            .filter_map(|id| self.items.get(id))
            .collect()
    }

    /// Ancestor folders of an item, ordered root → immediate parent. The
    /// item itself is not included; an unknown id yields an empty path.
    ///
    /// The walk is bounded by the collection size so a corrupted parent cycle
    /// surfaces as [`IntegrityError::CycleDetected`] instead of spinning.
    pub fn resolve_ancestor_path(&self, id: &str) -> Result<Vec<&DriveItem>, IntegrityError> {
        let start = match self.items.get(id) {
            Some(item) => item,
            None => return Ok(Vec::new()),
        };

        let mut path = VecDeque::new();
        let mut cursor = start.parent_id.as_deref();
        let mut steps = 0usize;
        while let Some(parent_id) = cursor {
            if steps >= self.items.len() {
                warn!(start = %id, "parent walk exceeded collection size");
                return Err(IntegrityError::CycleDetected {
                    start: id.to_string(),
                });
            }
            let parent = self
                .items
                .get(parent_id)
                .ok_or_else(|| IntegrityError::DanglingParent {
                    item: id.to_string(),
                    parent: parent_id.to_string(),
                })?;
            path.push_front(parent);
            cursor = parent.parent_id.as_deref();
            steps += 1;
        }
        Ok(path.into())
    }

    /// Add a new item to the collection.
    ///
    /// Preconditions: fresh id, non-empty name, and — for non-root items — an
    /// existing folder as parent. Violations are reported as
    /// [`ValidationError`] and leave the collection untouched; constructing a
    /// valid id and parent context is the caller's job.
    pub fn insert(&mut self, item: DriveItem) -> Result<(), ValidationError> {
        if item.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.items.contains_key(&item.id) {
            return Err(ValidationError::DuplicateId(item.id));
        }
        if let Some(parent_id) = &item.parent_id {
            match self.items.get(parent_id) {
                None => return Err(ValidationError::ParentNotFound(parent_id.clone())),
                Some(parent) if !parent.is_folder() => {
                    return Err(ValidationError::ParentNotAFolder(parent_id.clone()))
                }
                Some(_) => {}
            }
        }
        debug!(id = %item.id, name = %item.name, folder = item.is_folder(), "insert item");
        self.link(item);
        Ok(())
    }

    /// Remove an item and, for a folder, every transitive descendant.
    ///
    /// The full removal set is computed with a worklist before any mutation,
    /// then applied as a single batch, so callers never observe a partially
    /// deleted subtree. Missing ids are a no-op returning the empty set.
    pub fn delete_subtree(&mut self, id: &str) -> Result<HashSet<ItemId>, IntegrityError> {
        let target = match self.items.get(id) {
            Some(item) => item,
            None => return Ok(HashSet::new()),
        };
        let target_parent = target.parent_id.clone();

        // Phase 1: collect the subtree, bounded by the collection size.
        let mut removed: HashSet<ItemId> = HashSet::new();
        let mut worklist: VecDeque<ItemId> = VecDeque::new();
        removed.insert(id.to_string());
        worklist.push_back(id.to_string());
        while let Some(current) = worklist.pop_front() {
            if let Some(child_ids) = self.children.get(&current) {
                for child_id in child_ids {
                    if !removed.insert(child_id.clone()) {
                        warn!(start = %id, child = %child_id, "child reached twice during delete");
                        return Err(IntegrityError::CycleDetected {
                            start: id.to_string(),
                        });
                    }
                    worklist.push_back(child_id.clone());
                }
            }
        }

        // Phase 2: apply the batch.
        for removed_id in &removed {
            self.items.remove(removed_id);
            self.children.remove(removed_id);
        }
        self.order.retain(|item_id| !removed.contains(item_id));
        match &target_parent {
            None => self.root_children.retain(|child| child != id),
            Some(parent_id) => {
                if let Some(siblings) = self.children.get_mut(parent_id) {
                    siblings.retain(|child| child != id);
                }
            }
        }

        debug!(id = %id, removed = removed.len(), "deleted subtree");
        Ok(removed)
    }

    /// Append an item to storage, order, and the adjacency index. The caller
    /// has already validated preconditions.
    fn link(&mut self, item: DriveItem) {
        match &item.parent_id {
            None => self.root_children.push(item.id.clone()),
            Some(parent_id) => self
                .children
                .entry(parent_id.clone())
                .or_default()
                .push(item.id.clone()),
        }
        self.order.push(item.id.clone());
        self.items.insert(item.id.clone(), item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{FileKind, FilePayload, SourceOrigin};

    fn folder(id: &str, parent: Option<&str>) -> DriveItem {
        DriveItem::folder(id, format!("folder {}", id), parent.map(String::from))
    }

    fn pdf(id: &str, parent: Option<&str>) -> DriveItem {
        DriveItem::file(
            id,
            format!("file {}", id),
            parent.map(String::from),
            FilePayload {
                file_kind: FileKind::Pdf,
                source: format!("https://store.example/{}", id),
                source_origin: SourceOrigin::ObjectStorage,
                cover_image: None,
            },
        )
    }

    #[test]
    fn insert_then_list_children_returns_exact_sibling_set() {
        let mut tree = DriveTree::new();
        tree.insert(folder("a", None)).unwrap();
        tree.insert(folder("b", Some("a"))).unwrap();
        tree.insert(pdf("c", Some("a"))).unwrap();
        tree.insert(pdf("d", None)).unwrap();

        let under_a: Vec<&str> = tree
            .list_children(Some("a"))
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(under_a, vec!["b", "c"]);

        let at_root: Vec<&str> = tree
            .list_children(None)
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(at_root, vec!["a", "d"]);
    }

    #[test]
    fn list_children_of_unknown_folder_is_empty() {
        let tree = DriveTree::new();
        assert!(tree.list_children(Some("missing")).is_empty());
    }

    #[test]
    fn ancestor_path_is_root_to_immediate_parent() {
        let mut tree = DriveTree::new();
        tree.insert(folder("f1", None)).unwrap();
        tree.insert(folder("f2", Some("f1"))).unwrap();
        tree.insert(folder("f3", Some("f2"))).unwrap();

        let path: Vec<&str> = tree
            .resolve_ancestor_path("f3")
            .unwrap()
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(path, vec!["f1", "f2"]);

        assert!(tree.resolve_ancestor_path("f1").unwrap().is_empty());
        assert!(tree.resolve_ancestor_path("missing").unwrap().is_empty());
    }

    #[test]
    fn delete_subtree_removes_all_descendants_atomically() {
        let mut tree = DriveTree::new();
        tree.insert(folder("root", None)).unwrap();
        tree.insert(folder("sub", Some("root"))).unwrap();
        tree.insert(pdf("doc1", Some("root"))).unwrap();
        tree.insert(pdf("doc2", Some("sub"))).unwrap();
        tree.insert(folder("other", None)).unwrap();

        let removed = tree.delete_subtree("root").unwrap();
        assert_eq!(removed.len(), 4);
        for id in ["root", "sub", "doc1", "doc2"] {
            assert!(removed.contains(id));
            assert!(!tree.contains(id));
        }
        assert!(tree.list_children(Some("root")).is_empty());
        assert_eq!(tree.list_children(None).len(), 1);
        assert!(tree.contains("other"));
    }

    #[test]
    fn delete_is_idempotent() {
        let mut tree = DriveTree::new();
        tree.insert(folder("a", None)).unwrap();

        let first = tree.delete_subtree("a").unwrap();
        assert_eq!(first.len(), 1);
        let second = tree.delete_subtree("a").unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn delete_of_single_file_removes_exactly_that_node() {
        let mut tree = DriveTree::new();
        tree.insert(folder("a", None)).unwrap();
        tree.insert(pdf("c", Some("a"))).unwrap();

        let removed = tree.delete_subtree("c").unwrap();
        assert_eq!(removed.len(), 1);
        assert!(tree.contains("a"));
        assert!(tree.list_children(Some("a")).is_empty());
    }

    #[test]
    fn insert_rejects_file_typed_parent_without_mutating() {
        let mut tree = DriveTree::new();
        tree.insert(folder("a", None)).unwrap();
        tree.insert(pdf("c", Some("a"))).unwrap();

        let err = tree.insert(folder("d", Some("c"))).unwrap_err();
        assert!(matches!(err, ValidationError::ParentNotAFolder(_)));
        assert_eq!(tree.len(), 2);
        assert!(!tree.contains("d"));
    }

    #[test]
    fn insert_rejects_duplicate_id_and_missing_parent() {
        let mut tree = DriveTree::new();
        tree.insert(folder("a", None)).unwrap();

        assert!(matches!(
            tree.insert(folder("a", None)).unwrap_err(),
            ValidationError::DuplicateId(_)
        ));
        assert!(matches!(
            tree.insert(folder("b", Some("nope"))).unwrap_err(),
            ValidationError::ParentNotFound(_)
        ));
        assert!(matches!(
            tree.insert(DriveItem::folder("e", "  ", None)).unwrap_err(),
            ValidationError::EmptyName
        ));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn concrete_catalog_scenario() {
        // Folder a → folder b → file c, then cascade-delete a.
        let mut tree = DriveTree::new();
        tree.insert(folder("a", None)).unwrap();
        tree.insert(folder("b", Some("a"))).unwrap();
        tree.insert(pdf("c", Some("b"))).unwrap();

        let path: Vec<&str> = tree
            .resolve_ancestor_path("b")
            .unwrap()
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(path, vec!["a"]);

        let under_b: Vec<&str> = tree
            .list_children(Some("b"))
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(under_b, vec!["c"]);

        let removed = tree.delete_subtree("a").unwrap();
        let expected: HashSet<ItemId> =
            ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(removed, expected);
        assert!(tree.list_children(Some("a")).is_empty());
        assert!(tree.list_children(None).is_empty());
    }

    #[test]
    fn snapshot_round_trip_preserves_order() {
        let mut tree = DriveTree::new();
        tree.insert(folder("a", None)).unwrap();
        tree.insert(pdf("c", Some("a"))).unwrap();
        tree.insert(folder("b", Some("a"))).unwrap();

        let snapshot = tree.to_snapshot();
        let rebuilt = DriveTree::from_snapshot(snapshot.clone()).unwrap();
        assert_eq!(rebuilt.to_snapshot(), snapshot);

        let under_a: Vec<&str> = rebuilt
            .list_children(Some("a"))
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(under_a, vec!["c", "b"]);
    }

    #[test]
    fn snapshot_with_dangling_parent_is_an_integrity_error() {
        let orphan = folder("child", Some("gone"));
        let err = DriveTree::from_snapshot(vec![orphan]).unwrap_err();
        assert!(matches!(err, IntegrityError::DanglingParent { .. }));
    }

    #[test]
    fn snapshot_with_duplicate_id_is_an_integrity_error() {
        let err = DriveTree::from_snapshot(vec![folder("a", None), folder("a", None)]).unwrap_err();
        assert!(matches!(err, IntegrityError::DuplicateId(_)));
    }

    #[test]
    fn corrupted_parent_cycle_terminates_with_integrity_error() {
        // A cycle cannot be built through the validated API; forge one by
        // rewiring parent pointers behind the index's back.
        let mut tree = DriveTree::new();
        tree.insert(folder("a", None)).unwrap();
        tree.insert(folder("b", Some("a"))).unwrap();
        tree.items.get_mut("a").unwrap().parent_id = Some("b".to_string());

        let err = tree.resolve_ancestor_path("b").unwrap_err();
        assert!(matches!(err, IntegrityError::CycleDetected { .. }));
    }
}
