//! CatalogTraversal: full discography walk
//!
//! Artist → albums (up to a page cap) → tracks of each album (up to a page
//! cap). One polite pause follows every album fetched.

use super::traits::{Anchor, AxisEngine, AxisError, AxisKind, AxisReport};
use crate::graph::{
    canonical_key, provenance, AlbumDetails, Axis, Graph, Node, NodeDetails, NodeKind, Provenance,
    TrackDetails,
};
use crate::source::{CatalogAlbum, CatalogSource};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const ALBUM_WEIGHT: f64 = 0.9;
const TRACK_WEIGHT: f64 = 0.8;

pub struct CatalogTraversal {
    catalog: Arc<dyn CatalogSource>,
    album_limit: usize,
    track_limit: usize,
    pacing: Duration,
}

impl CatalogTraversal {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        album_limit: usize,
        track_limit: usize,
        pacing: Duration,
    ) -> Self {
        Self {
            catalog,
            album_limit,
            track_limit,
            pacing,
        }
    }

    async fn walk_album(
        &self,
        anchor: &Anchor,
        album: CatalogAlbum,
        graph: &mut Graph,
        report: &mut AxisReport,
    ) -> Result<(), AxisError> {
        let album_key = canonical_key(NodeKind::Album, &[&album.title, &album.id.to_string()]);
        let year = album.year();
        let node = Node::new(
            album.title.clone(),
            NodeDetails::Album(AlbumDetails {
                artist: Some(anchor.key.to_string()),
                year,
                catalog_id: Some(album.id),
                cover: album.cover.clone(),
            }),
        )
        .with_source("catalog");
        report.node(graph.upsert_node(album_key.clone(), node));

        let meta: Provenance = provenance([("year", year.map(Value::from).unwrap_or(Value::Null))]);
        report.edge(graph.link(&anchor.key, &album_key, Axis::Discography, ALBUM_WEIGHT, meta)?);

        let Some(tracks) = self.catalog.tracks_of(album.id, self.track_limit).await else {
            warn!(album = %album.title, "Album tracklist unavailable");
            report.source_unavailable();
            return Ok(());
        };

        for track in tracks.into_iter().take(self.track_limit) {
            let artist = match track.artist_name() {
                "" => anchor.name.clone(),
                name => name.to_string(),
            };
            let track_key = canonical_key(NodeKind::Track, &[&artist, &track.title]);
            let node = Node::new(
                track.title,
                NodeDetails::Track(TrackDetails {
                    artist: Some(artist),
                    album: Some(album.title.clone()),
                    year,
                    duration: track.duration,
                    catalog_id: Some(track.id),
                    ..Default::default()
                }),
            )
            .with_source("catalog");
            report.node(graph.upsert_node(track_key.clone(), node));
            report.edge(graph.link(
                &album_key,
                &track_key,
                Axis::Discography,
                TRACK_WEIGHT,
                Provenance::new(),
            )?);
        }
        Ok(())
    }
}

#[async_trait]
impl AxisEngine for CatalogTraversal {
    fn kind(&self) -> AxisKind {
        AxisKind::Albums
    }

    fn applies_to(&self, anchor: &Anchor) -> bool {
        anchor.catalog_id.is_some()
    }

    async fn run(&self, anchor: &Anchor, graph: &mut Graph) -> Result<AxisReport, AxisError> {
        let mut report = AxisReport::default();
        let Some(catalog_id) = anchor.catalog_id else {
            return Ok(report);
        };

        let Some(albums) = self.catalog.albums_of(catalog_id, self.album_limit).await else {
            warn!(artist = %anchor.name, "Discography unavailable");
            report.source_unavailable();
            return Ok(report);
        };

        for album in albums.into_iter().take(self.album_limit) {
            self.walk_album(anchor, album, graph, &mut report).await?;
            if !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        debug!(
            artist = %anchor.name,
            nodes = report.nodes_added,
            edges = report.edges_added,
            "Discography mapped"
        );
        Ok(report)
    }
}
