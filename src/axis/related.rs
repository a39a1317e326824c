//! RelatedArtists: the catalog's own "related to X" list

use super::traits::{Anchor, AxisEngine, AxisError, AxisKind, AxisReport};
use crate::graph::{canonical_key, provenance, ArtistDetails, Axis, Graph, Node, NodeDetails, NodeKind};
use crate::source::CatalogSource;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct RelatedArtists {
    catalog: Arc<dyn CatalogSource>,
    limit: usize,
    weight: f64,
}

impl RelatedArtists {
    pub fn new(catalog: Arc<dyn CatalogSource>, limit: usize, weight: f64) -> Self {
        Self {
            catalog,
            limit,
            weight,
        }
    }
}

#[async_trait]
impl AxisEngine for RelatedArtists {
    fn kind(&self) -> AxisKind {
        AxisKind::Related
    }

    fn applies_to(&self, anchor: &Anchor) -> bool {
        anchor.catalog_id.is_some()
    }

    async fn run(&self, anchor: &Anchor, graph: &mut Graph) -> Result<AxisReport, AxisError> {
        let mut report = AxisReport::default();
        let Some(catalog_id) = anchor.catalog_id else {
            return Ok(report);
        };

        let Some(related) = self.catalog.related_to(catalog_id, self.limit).await else {
            warn!(artist = %anchor.name, "Related artists unavailable");
            report.source_unavailable();
            return Ok(report);
        };

        for artist in related.into_iter().take(self.limit) {
            let key = canonical_key(NodeKind::Artist, &[&artist.name]);
            if key == anchor.key {
                continue;
            }
            let node = Node::new(
                artist.name,
                NodeDetails::Artist(ArtistDetails {
                    catalog_id: Some(artist.id),
                    picture: artist.picture,
                    ..Default::default()
                }),
            )
            .with_source("catalog-related");
            report.node(graph.upsert_node(key.clone(), node));

            let meta = provenance([("source", "catalog-related")]);
            report.edge(graph.link(&anchor.key, &key, Axis::Related, self.weight, meta)?);
        }

        debug!(artist = %anchor.name, edges = report.edges_added, "Related artists linked");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKey;
    use crate::source::{CatalogAlbum, CatalogArtist, CatalogTrack};

    struct CannedRelated(Option<Vec<CatalogArtist>>);

    #[async_trait]
    impl CatalogSource for CannedRelated {
        async fn search_artist(&self, _query: &str) -> Option<CatalogArtist> {
            None
        }

        async fn search_track(&self, _query: &str) -> Option<CatalogTrack> {
            None
        }

        async fn related_to(&self, _id: u64, _limit: usize) -> Option<Vec<CatalogArtist>> {
            self.0.clone()
        }

        async fn albums_of(&self, _id: u64, _limit: usize) -> Option<Vec<CatalogAlbum>> {
            None
        }

        async fn tracks_of(&self, _id: u64, _limit: usize) -> Option<Vec<CatalogTrack>> {
            None
        }
    }

    fn artist(id: u64, name: &str) -> CatalogArtist {
        CatalogArtist {
            id,
            name: name.to_string(),
            picture: None,
        }
    }

    fn anchor(graph: &mut Graph) -> Anchor {
        let key = canonical_key(NodeKind::Artist, &["Deftones"]);
        graph.upsert_node(key.clone(), Node::of_kind(NodeKind::Artist, "Deftones"));
        let mut anchor = Anchor::new("Deftones", key);
        anchor.catalog_id = Some(1);
        anchor
    }

    #[tokio::test]
    async fn links_at_fixed_weight_and_skips_self() {
        let related = vec![artist(1, "Deftones"), artist(2, "Hum"), artist(3, "Failure"), artist(4, "Quicksand")];
        let engine = RelatedArtists::new(Arc::new(CannedRelated(Some(related))), 2, 0.7);
        let mut graph = Graph::new();
        let anchor = anchor(&mut graph);

        let report = engine.run(&anchor, &mut graph).await.unwrap();

        // Limit applies before the self entry is dropped
        assert_eq!(report.edges_added, 1);
        let edge = graph
            .find_edge(&anchor.key, &NodeKey::from("artist::hum"), Axis::Related)
            .unwrap();
        assert_eq!(edge.weight, 0.7);
        assert!(!graph.contains(&NodeKey::from("artist::failure")));
    }

    #[tokio::test]
    async fn outage_marks_degraded() {
        let engine = RelatedArtists::new(Arc::new(CannedRelated(None)), 10, 0.7);
        let mut graph = Graph::new();
        let anchor = anchor(&mut graph);

        let report = engine.run(&anchor, &mut graph).await.unwrap();
        assert!(report.degraded);
        assert_eq!(graph.edge_count(), 0);
    }
}
