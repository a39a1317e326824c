//! Graph: the whole correlation document
//!
//! Landmarks, nodes and edges are loaded and saved together. The graph is
//! append-only: nodes are merged on rediscovery, edge weights only rise,
//! and nothing is ever removed.

use super::edge::{Axis, Edge, Provenance};
use super::key::{normalize, NodeKey};
use super::node::{Node, NodeKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Errors raised by graph mutations
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Edge endpoint not found: {0}")]
    MissingEndpoint(NodeKey),

    #[error("Edge would connect {0} to itself")]
    SelfLoop(NodeKey),

    #[error("Edge weight {0} is outside [0, 1]")]
    InvalidWeight(f64),
}

/// Result type for graph mutations
pub type GraphResult<T> = Result<T, GraphError>;

/// A seed entity chosen as an exploration root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Landmark {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub added_at: DateTime<Utc>,
}

/// What `upsert_node` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeUpsert {
    Created,
    Merged,
}

/// What `upsert_edge` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeUpsert {
    /// A new edge was stored and both endpoint degrees incremented
    Created,
    /// An existing edge took the higher weight
    Strengthened,
    /// An existing edge already had an equal or higher weight
    Unchanged,
}

impl EdgeUpsert {
    pub fn is_created(&self) -> bool {
        matches!(self, EdgeUpsert::Created)
    }
}

/// Aggregate counts over the graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub landmarks: usize,
    pub nodes: usize,
    pub edges: usize,
    pub edges_by_axis: BTreeMap<Axis, usize>,
    pub node_types: BTreeMap<NodeKind, usize>,
}

/// A node together with every edge touching it and the nodes at the other end
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Neighborhood {
    pub center: NodeKey,
    pub nodes: BTreeMap<NodeKey, Node>,
    pub edges: Vec<Edge>,
}

/// The correlation graph document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
    #[serde(default)]
    pub nodes: BTreeMap<NodeKey, Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    /// An empty skeleton
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the node if absent, otherwise merge its fields.
    ///
    /// A new node always starts at zero connections; a merge never
    /// changes the stored count.
    pub fn upsert_node(&mut self, key: NodeKey, mut node: Node) -> NodeUpsert {
        match self.nodes.get_mut(&key) {
            Some(existing) => {
                existing.merge(node);
                NodeUpsert::Merged
            }
            None => {
                node.connections = 0;
                self.nodes.insert(key, node);
                NodeUpsert::Created
            }
        }
    }

    /// Store an edge, deduplicating on the unordered pair plus axis.
    ///
    /// A duplicate keeps `max(old, new)` weight and its original metadata.
    /// Only a genuine creation increments the endpoint degrees.
    pub fn upsert_edge(&mut self, edge: Edge) -> GraphResult<EdgeUpsert> {
        if !(0.0..=1.0).contains(&edge.weight) {
            return Err(GraphError::InvalidWeight(edge.weight));
        }
        if edge.from == edge.to {
            return Err(GraphError::SelfLoop(edge.from));
        }
        for endpoint in [&edge.from, &edge.to] {
            if !self.nodes.contains_key(endpoint) {
                return Err(GraphError::MissingEndpoint(endpoint.clone()));
            }
        }

        if let Some(existing) = self
            .edges
            .iter_mut()
            .find(|e| e.same_identity(&edge.from, &edge.to, edge.axis))
        {
            if edge.weight > existing.weight {
                existing.weight = edge.weight;
                return Ok(EdgeUpsert::Strengthened);
            }
            return Ok(EdgeUpsert::Unchanged);
        }

        for endpoint in [&edge.from, &edge.to] {
            if let Some(node) = self.nodes.get_mut(endpoint) {
                node.connections += 1;
            }
        }
        self.edges.push(edge);
        Ok(EdgeUpsert::Created)
    }

    /// Convenience over [`upsert_edge`](Self::upsert_edge).
    pub fn link(
        &mut self,
        from: &NodeKey,
        to: &NodeKey,
        axis: Axis,
        weight: f64,
        meta: Provenance,
    ) -> GraphResult<EdgeUpsert> {
        self.upsert_edge(Edge::new(from.clone(), to.clone(), axis, weight).with_meta(meta))
    }

    /// Mark `key` as a landmark node and append a landmark entry unless one
    /// with the same name (case-insensitive) already exists.
    ///
    /// Returns whether a new entry was appended.
    pub fn register_landmark(
        &mut self,
        key: &NodeKey,
        name: &str,
        kind: NodeKind,
    ) -> GraphResult<bool> {
        let node = self
            .nodes
            .get_mut(key)
            .ok_or_else(|| GraphError::MissingEndpoint(key.clone()))?;
        node.is_landmark = true;

        if self.has_landmark(name) {
            return Ok(false);
        }
        self.landmarks.push(Landmark {
            name: name.to_string(),
            kind,
            added_at: Utc::now(),
        });
        Ok(true)
    }

    pub fn has_landmark(&self, name: &str) -> bool {
        let wanted = normalize(name);
        self.landmarks.iter().any(|l| normalize(&l.name) == wanted)
    }

    pub fn get_node(&self, key: &NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn contains(&self, key: &NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges on one axis
    pub fn edges_on(&self, axis: Axis) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.axis == axis)
    }

    /// Find the stored edge for `(a, b, axis)` in either direction
    pub fn find_edge(&self, a: &NodeKey, b: &NodeKey, axis: Axis) -> Option<&Edge> {
        self.edges.iter().find(|e| e.same_identity(a, b, axis))
    }

    /// Count of stored edges touching `key`, recomputed from the edge list.
    pub fn degree(&self, key: &NodeKey) -> usize {
        self.edges.iter().filter(|e| e.touches(key)).count()
    }

    pub fn stats(&self) -> GraphStats {
        let mut edges_by_axis = BTreeMap::new();
        for edge in &self.edges {
            *edges_by_axis.entry(edge.axis).or_insert(0) += 1;
        }
        let mut node_types = BTreeMap::new();
        for node in self.nodes.values() {
            *node_types.entry(node.kind()).or_insert(0) += 1;
        }
        GraphStats {
            landmarks: self.landmarks.len(),
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            edges_by_axis,
            node_types,
        }
    }

    /// The node at `key`, its edges and its direct neighbors.
    pub fn neighborhood(&self, key: &NodeKey) -> Option<Neighborhood> {
        let center = self.nodes.get(key)?;
        let edges: Vec<Edge> = self.edges.iter().filter(|e| e.touches(key)).cloned().collect();
        let neighbor_keys: BTreeSet<&NodeKey> =
            edges.iter().filter_map(|e| e.other_end(key)).collect();

        let mut nodes = BTreeMap::new();
        nodes.insert(key.clone(), center.clone());
        for k in neighbor_keys {
            if let Some(n) = self.nodes.get(k) {
                nodes.insert(k.clone(), n.clone());
            }
        }

        Some(Neighborhood {
            center: key.clone(),
            nodes,
            edges,
        })
    }
}
