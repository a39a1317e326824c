//! Portfolio and peer axes, both driven by the fixture table
//!
//! `Portfolio` links an organization (or person) to its curated projects.
//! `PeerDiscovery` links an organization to similar ones that are not yet
//! in the graph, tagging them unmapped so they surface as exploration gaps.

use super::fixtures::FixtureTable;
use super::traits::{Anchor, AxisEngine, AxisError, AxisKind, AxisReport};
use crate::graph::{
    canonical_key, provenance, Axis, Graph, MapStatus, Node, NodeDetails, NodeKind, ProjectDetails,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

const FIXTURE_SOURCE: &str = "fixture";

pub struct Portfolio {
    fixtures: Arc<FixtureTable>,
}

impl Portfolio {
    pub fn new(fixtures: Arc<FixtureTable>) -> Self {
        Self { fixtures }
    }
}

#[async_trait]
impl AxisEngine for Portfolio {
    fn kind(&self) -> AxisKind {
        AxisKind::Portfolio
    }

    async fn run(&self, anchor: &Anchor, graph: &mut Graph) -> Result<AxisReport, AxisError> {
        let mut report = AxisReport::default();
        let Some(portfolio) = self.fixtures.portfolio_for(&anchor.name) else {
            debug!(name = %anchor.name, "No portfolio fixture");
            return Ok(report);
        };

        for project in portfolio.projects {
            let key = canonical_key(NodeKind::Project, &[&project.name]);
            let node = Node::new(
                project.name,
                NodeDetails::Project(ProjectDetails {
                    url: project.url,
                    notable: Some(project.notable),
                    viral: Some(project.viral),
                }),
            )
            .with_source(FIXTURE_SOURCE);
            report.node(graph.upsert_node(key.clone(), node));

            let meta = provenance([("relationship", portfolio.relationship.as_str())]);
            report.edge(graph.link(&anchor.key, &key, Axis::Portfolio, portfolio.weight, meta)?);
        }

        info!(name = %anchor.name, projects = report.edges_added, "Portfolio linked");
        Ok(report)
    }
}

pub struct PeerDiscovery {
    fixtures: Arc<FixtureTable>,
    weight: f64,
}

impl PeerDiscovery {
    pub fn new(fixtures: Arc<FixtureTable>, weight: f64) -> Self {
        Self { fixtures, weight }
    }
}

#[async_trait]
impl AxisEngine for PeerDiscovery {
    fn kind(&self) -> AxisKind {
        AxisKind::Peers
    }

    /// Peer tables are keyed by organization
    fn applies_to(&self, anchor: &Anchor) -> bool {
        anchor.is_kind(NodeKind::Agency)
    }

    async fn run(&self, anchor: &Anchor, graph: &mut Graph) -> Result<AxisReport, AxisError> {
        let mut report = AxisReport::default();

        for peer in self.fixtures.peers_for(&anchor.name) {
            let key = canonical_key(NodeKind::Agency, &[peer]);
            // Only organizations the graph does not know yet
            if graph.contains(&key) {
                continue;
            }
            let node = Node::of_kind(NodeKind::Agency, peer.clone())
                .with_map_status(MapStatus::Unmapped)
                .with_source(FIXTURE_SOURCE);
            report.node(graph.upsert_node(key.clone(), node));

            let meta = provenance([("description", "similar-organization")]);
            report.edge(graph.link(&anchor.key, &key, Axis::Peer, self.weight, meta)?);
        }

        info!(name = %anchor.name, peers = report.edges_added, "Similar organizations discovered");
        Ok(report)
    }
}
