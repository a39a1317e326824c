//! In-process backend

use super::traits::{GraphStore, SaveOutcome, StorageResult};
use crate::graph::Graph;
use std::sync::Mutex;

/// Store that keeps the last saved document in memory.
///
/// Useful for tests and for embedding the engine without a data directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Option<Graph>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with `graph`
    pub fn with_graph(graph: Graph) -> Self {
        Self {
            document: Mutex::new(Some(graph)),
            read_only: false,
        }
    }

    /// Make this store refuse writes silently
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

impl GraphStore for MemoryStore {
    fn load(&self) -> StorageResult<Graph> {
        let doc = self.document.lock().unwrap_or_else(|e| e.into_inner());
        Ok(doc.clone().unwrap_or_default())
    }

    fn save(&self, graph: &Graph) -> StorageResult<SaveOutcome> {
        if self.read_only {
            return Ok(SaveOutcome::Skipped);
        }
        let mut doc = self.document.lock().unwrap_or_else(|e| e.into_inner());
        *doc = Some(graph.clone());
        Ok(SaveOutcome::Written)
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}
