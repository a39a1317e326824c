//! Canonical node keys
//!
//! A key is `<kind>::<part>[::<part>...]` with every part lowercased and
//! trimmed, so rediscovering an entity under different casing or padding
//! lands on the same node.

use super::node::NodeKind;
use serde::{Deserialize, Serialize};

/// Canonical, type-qualified identity of a node.
///
/// Serializes as a plain string (e.g. `"track::deftones::my own summer"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(String);

impl NodeKey {
    /// Wrap an already-canonical key string (e.g. one read back from a snapshot).
    pub fn from_string(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The kind prefix of this key, if it carries one.
    pub fn kind_prefix(&self) -> Option<&str> {
        self.0.split_once("::").map(|(kind, _)| kind)
    }
}

impl std::fmt::Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Lowercase + trim. The only normalization applied to names.
pub fn normalize(part: &str) -> String {
    part.trim().to_lowercase()
}

/// Derive the canonical key for an entity.
///
/// `parts` is the name followed by any discriminators; composite identities
/// such as a track pass `[artist, title]`.
pub fn canonical_key(kind: NodeKind, parts: &[&str]) -> NodeKey {
    let mut key = kind.as_str().to_string();
    for part in parts {
        key.push_str("::");
        key.push_str(&normalize(part));
    }
    NodeKey(key)
}
