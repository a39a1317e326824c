//! Axis trait: the contract every correlation strategy implements
//!
//! An axis takes the resolved anchor of an exploration, reads whatever
//! sources it needs, and writes nodes and edges straight into the graph.
//! It reports how much it added; the orchestrator owns sequencing,
//! failure isolation and persistence.

use crate::graph::{EdgeUpsert, Graph, GraphError, NodeKey, NodeKind, NodeUpsert};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Selectable axis names
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Tempo,
    Related,
    Albums,
    Members,
    Era,
    Heuristic,
    Portfolio,
    Peers,
}

impl AxisKind {
    /// Default axis set for artist landmarks, in execution order
    pub const MUSIC: [AxisKind; 5] = [
        AxisKind::Tempo,
        AxisKind::Related,
        AxisKind::Albums,
        AxisKind::Members,
        AxisKind::Era,
    ];

    /// Default axis set for organizational landmarks, in execution order
    pub const ORGANIZATION: [AxisKind; 3] =
        [AxisKind::Heuristic, AxisKind::Portfolio, AxisKind::Peers];

    pub fn as_str(&self) -> &'static str {
        match self {
            AxisKind::Tempo => "tempo",
            AxisKind::Related => "related",
            AxisKind::Albums => "albums",
            AxisKind::Members => "members",
            AxisKind::Era => "era",
            AxisKind::Heuristic => "heuristic",
            AxisKind::Portfolio => "portfolio",
            AxisKind::Peers => "peers",
        }
    }
}

impl std::fmt::Display for AxisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AxisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tempo" | "bpm" => Ok(AxisKind::Tempo),
            "related" => Ok(AxisKind::Related),
            "albums" | "discography" => Ok(AxisKind::Albums),
            "members" | "member" => Ok(AxisKind::Members),
            "era" => Ok(AxisKind::Era),
            "heuristic" | "founders" => Ok(AxisKind::Heuristic),
            "portfolio" | "projects" => Ok(AxisKind::Portfolio),
            "peers" | "similar" => Ok(AxisKind::Peers),
            other => Err(format!("unknown axis: {}", other)),
        }
    }
}

/// Errors that abort a single axis run
#[derive(Debug, Error)]
pub enum AxisError {
    #[error("graph rejected a mutation: {0}")]
    Graph(#[from] GraphError),

    #[error("axis error: {0}")]
    Internal(String),
}

/// The resolved identity an exploration fans out from
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    /// Display name as resolved by the source
    pub name: String,
    /// Key of the landmark entity (artist or organization)
    pub key: NodeKey,
    /// Catalog identifier, when the landmark was resolved through the catalog
    pub catalog_id: Option<u64>,
    /// Key of a resolved sub-entity (a specific track), if one was requested
    pub focus: Option<NodeKey>,
    pub tempo: Option<f64>,
    pub year: Option<i32>,
}

impl Anchor {
    pub fn new(name: impl Into<String>, key: NodeKey) -> Self {
        Self {
            name: name.into(),
            key,
            catalog_id: None,
            focus: None,
            tempo: None,
            year: None,
        }
    }

    /// The sub-entity when there is one, otherwise the landmark itself.
    ///
    /// Tempo and era edges hang off this key.
    pub fn focus_key(&self) -> &NodeKey {
        self.focus.as_ref().unwrap_or(&self.key)
    }

    /// Whether the landmark key is of `kind`
    pub fn is_kind(&self, kind: NodeKind) -> bool {
        self.key.kind_prefix() == Some(kind.as_str())
    }
}

/// What one axis run contributed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisReport {
    pub nodes_added: usize,
    pub edges_added: usize,
    /// A source returned nothing usable and the axis carried on without it
    pub degraded: bool,
}

impl AxisReport {
    pub fn node(&mut self, outcome: NodeUpsert) {
        if outcome == NodeUpsert::Created {
            self.nodes_added += 1;
        }
    }

    pub fn edge(&mut self, outcome: EdgeUpsert) {
        if outcome.is_created() {
            self.edges_added += 1;
        }
    }

    pub fn source_unavailable(&mut self) {
        self.degraded = true;
    }
}

/// A correlation strategy.
///
/// Implementations must skip self-links (an edge from the anchor to
/// itself is rejected by the graph) and treat a `None` from any source as
/// "unavailable": mark the report degraded and keep going.
#[async_trait]
pub trait AxisEngine: Send + Sync {
    fn kind(&self) -> AxisKind;

    /// Whether the anchor carries what this axis needs (a tempo, a year,
    /// a catalog id). Axes that do not apply are skipped, not failed.
    fn applies_to(&self, _anchor: &Anchor) -> bool {
        true
    }

    async fn run(&self, anchor: &Anchor, graph: &mut Graph) -> Result<AxisReport, AxisError>;
}
