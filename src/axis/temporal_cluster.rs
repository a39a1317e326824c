//! TemporalCluster: era correlation over nodes already in the graph
//!
//! The only axis that consults no external source: it scans every stored
//! node carrying a year and links those within `window` years of the
//! anchor's. Cost grows with the graph, not with a provider.

use super::traits::{Anchor, AxisEngine, AxisError, AxisKind, AxisReport};
use crate::graph::{provenance, Axis, Graph, NodeKey};
use async_trait::async_trait;
use tracing::debug;

pub struct TemporalCluster {
    window: u32,
    weight: f64,
}

impl TemporalCluster {
    /// A negative window matches the anchor's own year only.
    pub fn new(window: i32, weight: f64) -> Self {
        Self {
            window: window.max(0).unsigned_abs(),
            weight,
        }
    }
}

#[async_trait]
impl AxisEngine for TemporalCluster {
    fn kind(&self) -> AxisKind {
        AxisKind::Era
    }

    fn applies_to(&self, anchor: &Anchor) -> bool {
        anchor.year.is_some()
    }

    async fn run(&self, anchor: &Anchor, graph: &mut Graph) -> Result<AxisReport, AxisError> {
        let mut report = AxisReport::default();
        let Some(year) = anchor.year else {
            return Ok(report);
        };
        let from = anchor.focus_key();

        let matches: Vec<(NodeKey, i32)> = graph
            .nodes
            .iter()
            .filter(|(key, _)| *key != from)
            .filter_map(|(key, node)| {
                let other = node.year()?;
                (other.abs_diff(year) <= self.window).then(|| (key.clone(), other))
            })
            .collect();

        for (key, match_year) in matches {
            let meta = provenance([("landmarkYear", year), ("matchYear", match_year)]);
            report.edge(graph.link(from, &key, Axis::Era, self.weight, meta)?);
        }

        debug!(anchor = %from, year, edges = report.edges_added, "Era neighbours linked");
        Ok(report)
    }
}
