//! Storage trait definitions

use crate::graph::Graph;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// What a `save` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The document was written
    Written,
    /// The store is read-only; nothing was written
    Skipped,
}

impl SaveOutcome {
    pub fn persisted(&self) -> bool {
        matches!(self, SaveOutcome::Written)
    }
}

/// Trait for whole-document graph storage
///
/// There is no locking: concurrent writers race and the last save wins.
pub trait GraphStore: Send + Sync {
    /// Load the document, or an empty skeleton if nothing was persisted yet
    fn load(&self) -> StorageResult<Graph>;

    /// Overwrite the whole document.
    ///
    /// A read-only store returns `Ok(SaveOutcome::Skipped)` and leaves the
    /// persisted document untouched.
    fn save(&self, graph: &Graph) -> StorageResult<SaveOutcome>;

    /// Whether writes are disabled
    fn is_read_only(&self) -> bool;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: GraphStore + Sized {
    /// Open a store backed by the file at `path`
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Open a store whose `save` is a silent no-op
    fn open_read_only(path: impl AsRef<Path>) -> StorageResult<Self>;
}
