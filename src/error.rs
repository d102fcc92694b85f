//! Error types for the drive-item model and its storage adapters.
//!
//! Two model-level error kinds exist: [`ValidationError`] for caller-correctable
//! precondition violations on insert, and [`IntegrityError`] for corrupted
//! collection state detected during traversal. Everything soft ("folder not
//! found", "nothing here", deleting a missing id) is an empty result, not an
//! error.

use thiserror::Error;

/// Precondition violation on `insert`. Always caller-correctable; never
/// retried automatically.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("item id '{0}' already exists in the collection")]
    DuplicateId(String),

    #[error("parent folder '{0}' does not exist")]
    ParentNotFound(String),

    #[error("parent '{0}' is a file, not a folder")]
    ParentNotAFolder(String),

    #[error("item name cannot be empty")]
    EmptyName,
}

/// Collection invariant broken by some external mutation path. Fatal to the
/// operation; the model never attempts automatic repair.
#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("parent cycle detected while walking from item '{start}'")]
    CycleDetected { start: String },

    #[error("item '{item}' references missing parent '{parent}'")]
    DanglingParent { item: String, parent: String },

    #[error("snapshot contains duplicate item id '{0}'")]
    DuplicateId(String),
}

/// Storage adapter failure (sled, encoding, filesystem).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Unified error type surfaced by the library API and the CLI.
#[derive(Debug, Error)]
pub enum DriveError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("item '{0}' not found")]
    ItemNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<serde_json::Error> for DriveError {
    fn from(e: serde_json::Error) -> Self {
        DriveError::Storage(StorageError::Json(e))
    }
}

impl From<config::ConfigError> for DriveError {
    fn from(e: config::ConfigError) -> Self {
        DriveError::ConfigError(e.to_string())
    }
}
