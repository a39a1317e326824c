//! TempoProximity: tracks whose tempo sits within a window of the anchor's
//!
//! Scans the offline tempo dataset, ranks matches by distance and links the
//! closest ones. Closer tempo means a heavier edge: distance 0 weighs 1.0
//! and distance `window` weighs `1 / (window + 1)`.

use super::traits::{Anchor, AxisEngine, AxisError, AxisKind, AxisReport};
use crate::graph::{canonical_key, provenance, Axis, Graph, Node, NodeDetails, NodeKind, TrackDetails};
use crate::source::TempoDataset;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Edge weight for a tempo distance inside a window
pub fn tempo_weight(distance: f64, window: f64) -> f64 {
    1.0 - distance / (window + 1.0)
}

pub struct TempoProximity {
    dataset: Arc<TempoDataset>,
    window: f64,
    limit: usize,
}

impl TempoProximity {
    pub fn new(dataset: Arc<TempoDataset>, window: f64, limit: usize) -> Self {
        Self {
            dataset,
            window,
            limit,
        }
    }
}

#[async_trait]
impl AxisEngine for TempoProximity {
    fn kind(&self) -> AxisKind {
        AxisKind::Tempo
    }

    fn applies_to(&self, anchor: &Anchor) -> bool {
        anchor.tempo.is_some_and(|t| t > 0.0)
    }

    async fn run(&self, anchor: &Anchor, graph: &mut Graph) -> Result<AxisReport, AxisError> {
        let mut report = AxisReport::default();
        let Some(tempo) = anchor.tempo else {
            return Ok(report);
        };
        let from = anchor.focus_key();

        let mut matches: Vec<_> = self
            .dataset
            .within(tempo, self.window)
            .map(|(entry, distance)| {
                let key = canonical_key(NodeKind::Track, &[&entry.artist, &entry.title]);
                (key, entry, distance)
            })
            .filter(|(key, _, _)| key != from)
            .collect();
        // Stable: equal distances keep dataset order
        matches.sort_by(|a, b| a.2.total_cmp(&b.2));
        matches.truncate(self.limit);

        debug!(anchor = %from, tempo, candidates = matches.len(), "Linking tempo neighbours");

        for (key, entry, distance) in matches {
            let node = Node::new(
                entry.title.clone(),
                NodeDetails::Track(TrackDetails {
                    artist: Some(entry.artist.clone()),
                    tempo: Some(entry.tempo),
                    external_id: entry.id.clone(),
                    ..Default::default()
                }),
            )
            .with_source("tempo-dataset");
            report.node(graph.upsert_node(key.clone(), node));

            let meta = provenance([("landmarkTempo", tempo), ("matchTempo", entry.tempo)]);
            let outcome = graph.link(from, &key, Axis::Tempo, tempo_weight(distance, self.window), meta)?;
            report.edge(outcome);
        }

        Ok(report)
    }
}
