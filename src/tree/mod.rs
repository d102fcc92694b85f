//! Drive item types
//!
//! A drive item is a folder or a file in the materials hierarchy. Items form a
//! flat collection linked by parent references; [`model::DriveTree`] owns the
//! collection and its adjacency index.

pub mod ids;
pub mod model;

pub use ids::IdGenerator;
pub use model::DriveTree;

use crate::types::{ItemId, ParentRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of file content kinds in the materials catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Video,
    Pdf,
    Infographic,
    Text,
    Image,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileKind::Video => "video",
            FileKind::Pdf => "pdf",
            FileKind::Infographic => "infographic",
            FileKind::Text => "text",
            FileKind::Image => "image",
        };
        f.write_str(s)
    }
}

impl FromStr for FileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(FileKind::Video),
            "pdf" => Ok(FileKind::Pdf),
            "infographic" => Ok(FileKind::Infographic),
            "text" => Ok(FileKind::Text),
            "image" => Ok(FileKind::Image),
            other => Err(format!("unknown file kind '{}'", other)),
        }
    }
}

/// Where a file's `source` reference points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceOrigin {
    /// Externally hosted video platform embed
    VideoPlatform,
    /// Object-storage-backed download reference
    ObjectStorage,
    /// Generic external link
    ExternalLink,
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceOrigin::VideoPlatform => "video-platform",
            SourceOrigin::ObjectStorage => "object-storage",
            SourceOrigin::ExternalLink => "external-link",
        };
        f.write_str(s)
    }
}

impl FromStr for SourceOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video-platform" => Ok(SourceOrigin::VideoPlatform),
            "object-storage" => Ok(SourceOrigin::ObjectStorage),
            "external-link" => Ok(SourceOrigin::ExternalLink),
            other => Err(format!("unknown source origin '{}'", other)),
        }
    }
}

/// File-specific payload. `source` is opaque to the model; it is supplied by
/// the object-storage collaborator and never parsed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePayload {
    pub file_kind: FileKind,
    pub source: String,
    pub source_origin: SourceOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

/// Folder/file discriminant with the file payload attached to the file arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemKind {
    Folder,
    File(FilePayload),
}

/// A single entry in the drive hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveItem {
    pub id: ItemId,
    pub name: String,
    /// Owning folder id; `None` means top-level.
    pub parent_id: ParentRef,
    #[serde(flatten)]
    pub kind: ItemKind,
    pub created_at: DateTime<Utc>,
}

impl DriveItem {
    /// Create a folder item.
    pub fn folder(id: impl Into<ItemId>, name: impl Into<String>, parent_id: ParentRef) -> Self {
        DriveItem {
            id: id.into(),
            name: name.into(),
            parent_id,
            kind: ItemKind::Folder,
            created_at: Utc::now(),
        }
    }

    /// Create a file item with its payload.
    pub fn file(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        parent_id: ParentRef,
        payload: FilePayload,
    ) -> Self {
        DriveItem {
            id: id.into(),
            name: name.into(),
            parent_id,
            kind: ItemKind::File(payload),
            created_at: Utc::now(),
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, ItemKind::Folder)
    }

    pub fn file_payload(&self) -> Option<&FilePayload> {
        match &self.kind {
            ItemKind::Folder => None,
            ItemKind::File(payload) => Some(payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_json_shape_matches_catalog_contract() {
        let item = DriveItem::file(
            "file-1",
            "Anatomy Intro",
            Some("folder-1".to_string()),
            FilePayload {
                file_kind: FileKind::Pdf,
                source: "https://example.com/anatomy.pdf".to_string(),
                source_origin: SourceOrigin::ExternalLink,
                cover_image: None,
            },
        );

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "file");
        assert_eq!(value["file_kind"], "pdf");
        assert_eq!(value["source_origin"], "external-link");
        assert_eq!(value["parent_id"], "folder-1");
        assert!(value.get("cover_image").is_none());
    }

    #[test]
    fn folder_json_has_no_file_fields() {
        let folder = DriveItem::folder("folder-1", "Neurology", None);
        let value = serde_json::to_value(&folder).unwrap();
        assert_eq!(value["type"], "folder");
        assert!(value.get("file_kind").is_none());
        assert!(value["parent_id"].is_null());
    }

    #[test]
    fn kind_and_origin_round_trip_from_str() {
        for kind in ["video", "pdf", "infographic", "text", "image"] {
            assert_eq!(kind.parse::<FileKind>().unwrap().to_string(), kind);
        }
        for origin in ["video-platform", "object-storage", "external-link"] {
            assert_eq!(origin.parse::<SourceOrigin>().unwrap().to_string(), origin);
        }
        assert!("docx".parse::<FileKind>().is_err());
    }
}
