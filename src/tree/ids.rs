//! Fresh item id assignment.
//!
//! Ids are opaque and never reused. Each token hashes the workspace key, the
//! item name, a monotonic counter, and the wall clock, so concurrent callers
//! in the same process cannot collide and restarts are separated by time.

use blake3::Hasher;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Number of hash bytes kept in the hex token.
const TOKEN_BYTES: usize = 8;

/// Generator for `folder-`/`file-` prefixed id tokens.
#[derive(Debug)]
pub struct IdGenerator {
    workspace: String,
    counter: AtomicU64,
}

impl IdGenerator {
    pub fn new(workspace: impl Into<String>) -> Self {
        IdGenerator {
            workspace: workspace.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Fresh id for a folder item.
    pub fn next_folder_id(&self, name: &str) -> String {
        format!("folder-{}", self.token(name))
    }

    /// Fresh id for a file item.
    pub fn next_file_id(&self, name: &str) -> String {
        format!("file-{}", self.token(name))
    }

    fn token(&self, name: &str) -> String {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Hasher::new();
        hasher.update(self.workspace.as_bytes());
        hasher.update(name.as_bytes());
        hasher.update(&seq.to_le_bytes());
        hasher.update(&Utc::now().timestamp_micros().to_le_bytes());
        let hash = hasher.finalize();
        hex::encode(&hash.as_bytes()[..TOKEN_BYTES])
    }
}
