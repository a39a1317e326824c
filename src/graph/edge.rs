//! Edge representation with monotone weight

use super::key::NodeKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Correlation category of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Axis {
    /// Tempo-compatible tracks
    Tempo,
    /// Catalog "related artist" links
    Related,
    /// Artist → album → track ownership
    Discography,
    /// Shared membership and group affiliation
    Member,
    /// Release years within a window
    Era,
    /// Best-effort links guessed from free text
    TextHeuristic,
    /// Fixture-table projects of an organization
    Portfolio,
    /// Similar organizations
    Peer,
}

impl Axis {
    pub const ALL: [Axis; 8] = [
        Axis::Tempo,
        Axis::Related,
        Axis::Discography,
        Axis::Member,
        Axis::Era,
        Axis::TextHeuristic,
        Axis::Portfolio,
        Axis::Peer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Tempo => "tempo",
            Axis::Related => "related",
            Axis::Discography => "discography",
            Axis::Member => "member",
            Axis::Era => "era",
            Axis::TextHeuristic => "text-heuristic",
            Axis::Portfolio => "portfolio",
            Axis::Peer => "peer",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form record of how and why an edge was created
pub type Provenance = BTreeMap<String, Value>;

/// Build a provenance map from key/value pairs.
pub fn provenance<I, K, V>(pairs: I) -> Provenance
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// An edge between two nodes.
///
/// Stored with a direction, but identity for deduplication is the unordered
/// endpoint pair plus the axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub from: NodeKey,
    pub to: NodeKey,
    pub axis: Axis,
    /// Strength in [0, 1]. Only ever revised upward.
    pub weight: f64,
    #[serde(default)]
    pub meta: Provenance,
    pub created_at: DateTime<Utc>,
}

impl Edge {
    pub fn new(from: NodeKey, to: NodeKey, axis: Axis, weight: f64) -> Self {
        Self {
            from,
            to,
            axis,
            weight,
            meta: Provenance::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_meta(mut self, meta: Provenance) -> Self {
        self.meta = meta;
        self
    }

    /// Whether this edge has the same identity as `(a, b, axis)`, in either direction.
    pub fn same_identity(&self, a: &NodeKey, b: &NodeKey, axis: Axis) -> bool {
        self.axis == axis
            && ((self.from == *a && self.to == *b) || (self.from == *b && self.to == *a))
    }

    pub fn touches(&self, key: &NodeKey) -> bool {
        self.from == *key || self.to == *key
    }

    /// The endpoint opposite `key`, if `key` is an endpoint.
    pub fn other_end(&self, key: &NodeKey) -> Option<&NodeKey> {
        if self.from == *key {
            Some(&self.to)
        } else if self.to == *key {
            Some(&self.from)
        } else {
            None
        }
    }
}
