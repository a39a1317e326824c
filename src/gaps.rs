//! Gap analysis
//!
//! Cross-references graph nodes of one kind against reference datasets of
//! known names. Each node is annotated mapped or unmapped, and the report
//! lists both groups by connection degree, busiest first.

use crate::graph::{normalize, Graph, MapStatus, NodeDetails, NodeKey, NodeKind};
use crate::source::TempoDataset;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io;
use std::path::Path;

/// Normalized names known to the reference datasets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceSet {
    names: HashSet<String>,
}

#[derive(Deserialize)]
struct ReferenceRecord {
    artist: String,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str) {
        let name = normalize(name);
        if !name.is_empty() {
            self.names.insert(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Every artist in the tempo dataset
    pub fn add_tempo_dataset(&mut self, dataset: &TempoDataset) {
        for artist in dataset.artists() {
            self.insert(artist);
        }
    }

    /// Every `artist` in a JSON array of records. A missing file adds nothing.
    pub fn add_json_file(&mut self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(());
        }
        let raw = std::fs::read_to_string(path)?;
        let records: Vec<ReferenceRecord> = serde_json::from_str(&raw)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        for record in records {
            self.insert(&record.artist);
        }
        Ok(())
    }
}

impl<'a> FromIterator<&'a str> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapEntry {
    pub key: NodeKey,
    pub name: String,
    pub is_landmark: bool,
    pub connections: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<u64>,
    pub status: MapStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapReport {
    pub kind: NodeKind,
    pub total: usize,
    pub mapped_count: usize,
    pub unmapped_count: usize,
    /// Unmapped nodes, highest degree first
    pub gaps: Vec<GapEntry>,
    /// Mapped nodes, highest degree first
    pub mapped: Vec<GapEntry>,
}

/// Annotate every node of `kind` with its coverage status and partition
/// them. Nodes with a blank name are left alone.
pub fn analyze(graph: &mut Graph, kind: NodeKind, reference: &ReferenceSet) -> GapReport {
    let mut gaps = Vec::new();
    let mut mapped = Vec::new();

    for (key, node) in graph.nodes.iter_mut() {
        if node.kind() != kind || node.name.trim().is_empty() {
            continue;
        }
        let status = if reference.contains(&node.name) {
            MapStatus::Mapped
        } else {
            MapStatus::Unmapped
        };
        node.map_status = Some(status);

        let catalog_id = match &node.details {
            NodeDetails::Artist(a) => a.catalog_id,
            NodeDetails::Track(t) => t.catalog_id,
            NodeDetails::Album(a) => a.catalog_id,
            _ => None,
        };
        let entry = GapEntry {
            key: key.clone(),
            name: node.name.clone(),
            is_landmark: node.is_landmark,
            connections: node.connections,
            catalog_id,
            status,
        };
        match status {
            MapStatus::Mapped => mapped.push(entry),
            MapStatus::Unmapped => gaps.push(entry),
        }
    }

    // Stable: equal degrees keep key order
    gaps.sort_by(|a, b| b.connections.cmp(&a.connections));
    mapped.sort_by(|a, b| b.connections.cmp(&a.connections));

    GapReport {
        kind,
        total: gaps.len() + mapped.len(),
        mapped_count: mapped.len(),
        unmapped_count: gaps.len(),
        gaps,
        mapped,
    }
}
