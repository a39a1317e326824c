//! Data-driven fixture table
//!
//! Curated seed landmarks, project portfolios and peer lists for
//! organizations, loaded from YAML at startup. Entries are matched by
//! alias (case-insensitive); a `default_portfolio` template with a
//! `{name}` placeholder and a `default_peers` list cover everything else.

use crate::config::ConfigError;
use crate::graph::{normalize, Axis, NodeKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUNDLED: &str = include_str!("../../fixtures/organizations.yaml");

fn default_weight() -> f64 {
    1.0
}

fn default_relationship() -> String {
    "partner".to_string()
}

fn default_seed_kind() -> NodeKind {
    NodeKind::Agency
}

/// A landmark created on an empty graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedFixture {
    pub name: String,
    #[serde(rename = "type", default = "default_seed_kind")]
    pub kind: NodeKind,
    #[serde(default)]
    pub links: Vec<SeedLink>,
}

/// An edge from a seed to another (possibly new) node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedLink {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub axis: Axis,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub relationship: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFixture {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub notable: bool,
    #[serde(default)]
    pub viral: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioFixture {
    /// Names (organizations or people) this portfolio belongs to
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default = "default_relationship")]
    pub relationship: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    pub projects: Vec<ProjectFixture>,
}

impl PortfolioFixture {
    fn matches(&self, name: &str) -> bool {
        let wanted = normalize(name);
        self.aliases.iter().any(|a| normalize(a) == wanted)
    }

    /// Copy with every `{name}` in project names replaced.
    fn expanded_for(&self, name: &str) -> Self {
        let mut portfolio = self.clone();
        for project in &mut portfolio.projects {
            project.name = project.name.replace("{name}", name);
        }
        portfolio
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerFixture {
    pub aliases: Vec<String>,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureTable {
    pub seeds: Vec<SeedFixture>,
    pub portfolios: Vec<PortfolioFixture>,
    pub default_portfolio: Option<PortfolioFixture>,
    pub peers: Vec<PeerFixture>,
    pub default_peers: Vec<String>,
}

impl FixtureTable {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// The table shipped with the crate
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_yaml(BUNDLED)
    }

    /// Load a fixture file. A missing file is an empty table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    /// Portfolio for a named entity: the first alias match, else the
    /// default template expanded for `name`.
    pub fn portfolio_for(&self, name: &str) -> Option<PortfolioFixture> {
        self.portfolios
            .iter()
            .find(|p| p.matches(name))
            .cloned()
            .or_else(|| self.default_portfolio.as_ref().map(|p| p.expanded_for(name)))
    }

    /// Peer names for a named entity: the first alias group containing it,
    /// else the default list.
    pub fn peers_for(&self, name: &str) -> &[String] {
        let wanted = normalize(name);
        self.peers
            .iter()
            .find(|p| p.aliases.iter().any(|a| normalize(a) == wanted))
            .map(|p| p.names.as_slice())
            .unwrap_or(&self.default_peers)
    }
}
