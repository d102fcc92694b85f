//! Core types for the drive-item hierarchy.

/// ItemId: Opaque unique identifier of a drive item, assigned at creation and never reused
pub type ItemId = String;

/// ParentRef: Owning folder reference; `None` is the root sentinel ("top-level")
pub type ParentRef = Option<ItemId>;

/// WorkspaceKey: Identifier a persisted snapshot is keyed by (user or workspace)
pub type WorkspaceKey = String;
