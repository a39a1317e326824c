//! Storage backends for the correlation graph
//!
//! The graph is persisted as one whole document through the `GraphStore`
//! trait. The primary implementation is `JsonFileStore`, a pretty-printed
//! JSON snapshot on disk.

mod json;
mod memory;
mod traits;

pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::{GraphStore, OpenStore, SaveOutcome, StorageError, StorageResult};
