//! JSON snapshot backend

use super::traits::{GraphStore, OpenStore, SaveOutcome, StorageResult};
use crate::graph::Graph;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File-backed store holding the graph as one pretty-printed JSON document.
///
/// Writes go to a sibling temp file which is then renamed over the
/// snapshot, so a crash mid-write never leaves a truncated document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    read_only: bool,
}

impl JsonFileStore {
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl GraphStore for JsonFileStore {
    fn load(&self) -> StorageResult<Graph> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No snapshot yet, starting from an empty graph");
            return Ok(Graph::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Graph::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, graph: &Graph) -> StorageResult<SaveOutcome> {
        if self.read_only {
            warn!(path = %self.path.display(), "Read-only deployment, graph save ignored");
            return Ok(SaveOutcome::Skipped);
        }

        let json = serde_json::to_string_pretty(graph)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!(
            path = %self.path.display(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Graph saved"
        );
        Ok(SaveOutcome::Written)
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}

impl OpenStore for JsonFileStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            read_only: false,
        })
    }

    fn open_read_only(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            read_only: true,
        })
    }
}
