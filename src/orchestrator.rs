//! Orchestrator: one exploration, start to finish
//!
//! Loads the graph, resolves the landmark, runs the requested axes one
//! after another, saves once and reports totals. Axes never run
//! concurrently: provider pacing stays predictable and graph mutation
//! stays single-threaded.
//!
//! Failures are contained per axis. A source outage degrades the axis, an
//! axis error is logged and recorded, and the run carries on with the
//! next axis. Only an unresolvable landmark or an unreadable store stops
//! an exploration, and the former never touches the graph.

use crate::axis::{
    Anchor, AxisEngine, AxisKind, AxisReport, CatalogTraversal, FixtureTable, MemberGraph,
    PeerDiscovery, Portfolio, ProfileTitleExtractor, RelatedArtists, TempoProximity,
    TemporalCluster, TextHeuristic,
};
use crate::config::AxisSettings;
use crate::graph::{
    canonical_key, provenance, ArtistDetails, Axis, Graph, GraphError, Node, NodeDetails, NodeKey,
    NodeKind, OrgDetails, TrackDetails,
};
use crate::source::{CatalogSource, CreditSource, TempoDataset, WebSearch};
use crate::storage::{GraphStore, StorageError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Node kinds an organizational exploration can anchor on, in lookup order
const ORGANIZATION_KINDS: [NodeKind; 3] =
    [NodeKind::Agency, NodeKind::Person, NodeKind::TraditionalStudio];

/// Why an orchestration call could not produce a result at all
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

/// The external collaborators the axes draw on
#[derive(Clone)]
pub struct Sources {
    pub tempo: Arc<TempoDataset>,
    pub catalog: Arc<dyn CatalogSource>,
    pub credits: Arc<dyn CreditSource>,
    pub web: Arc<dyn WebSearch>,
}

/// An axis that returned an error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisFailure {
    pub axis: AxisKind,
    pub error: String,
}

/// Aggregate result of one exploration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreStats {
    /// Resolved landmark name
    pub landmark: String,
    pub anchor: NodeKey,
    pub total_nodes: usize,
    pub total_edges: usize,
    pub total_landmarks: usize,
    pub nodes_added: usize,
    pub edges_added: usize,
    /// Axes that ran to completion, in execution order
    pub axes_run: Vec<AxisKind>,
    /// Requested axes that did not apply to this landmark
    pub axes_skipped: Vec<AxisKind>,
    pub axes_failed: Vec<AxisFailure>,
    /// Axes that ran but lost at least one source along the way
    pub axes_degraded: Vec<AxisKind>,
    /// Whether the graph was written back
    pub persisted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ExploreOutcome {
    Explored(ExploreStats),
    /// The landmark could not be resolved; the graph was not touched
    NotFound { query: String },
}

impl ExploreOutcome {
    pub fn stats(&self) -> Option<&ExploreStats> {
        match self {
            ExploreOutcome::Explored(stats) => Some(stats),
            ExploreOutcome::NotFound { .. } => None,
        }
    }
}

/// Result of registering an organization landmark
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyRegistration {
    pub key: NodeKey,
    pub name: String,
    /// Whether a new landmark entry was appended
    pub created: bool,
    pub persisted: bool,
}

/// Result of seeding an empty graph
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub landmarks_added: usize,
    pub edges_added: usize,
    pub persisted: bool,
}

#[derive(Default)]
struct AxisTally {
    nodes_added: usize,
    edges_added: usize,
    run: Vec<AxisKind>,
    skipped: Vec<AxisKind>,
    failed: Vec<AxisFailure>,
    degraded: Vec<AxisKind>,
}

impl AxisTally {
    fn record(&mut self, kind: AxisKind, report: AxisReport) {
        self.nodes_added += report.nodes_added;
        self.edges_added += report.edges_added;
        self.run.push(kind);
        if report.degraded {
            self.degraded.push(kind);
        }
    }
}

pub struct Orchestrator {
    store: Arc<dyn GraphStore>,
    catalog: Arc<dyn CatalogSource>,
    tempo: Arc<TempoDataset>,
    fixtures: Arc<FixtureTable>,
    engines: Vec<Arc<dyn AxisEngine>>,
}

impl Orchestrator {
    /// Wire the full axis set over the given sources.
    pub fn new(
        store: Arc<dyn GraphStore>,
        sources: Sources,
        fixtures: Arc<FixtureTable>,
        settings: &AxisSettings,
    ) -> Self {
        let engines: Vec<Arc<dyn AxisEngine>> = vec![
            Arc::new(TempoProximity::new(
                sources.tempo.clone(),
                settings.tempo_window,
                settings.tempo_limit,
            )),
            Arc::new(RelatedArtists::new(
                sources.catalog.clone(),
                settings.related_limit,
                settings.related_weight,
            )),
            Arc::new(CatalogTraversal::new(
                sources.catalog.clone(),
                settings.album_limit,
                settings.track_limit,
                settings.album_pacing(),
            )),
            Arc::new(MemberGraph::new(
                sources.credits.clone(),
                settings.member_limit,
                settings.member_group_limit,
                settings.solo_group_limit,
            )),
            Arc::new(TemporalCluster::new(settings.era_window, settings.era_weight)),
            Arc::new(TextHeuristic::new(
                sources.web.clone(),
                Box::new(ProfileTitleExtractor::new()),
            )),
            Arc::new(Portfolio::new(fixtures.clone())),
            Arc::new(PeerDiscovery::new(fixtures.clone(), settings.peer_weight)),
        ];

        Self {
            store,
            catalog: sources.catalog,
            tempo: sources.tempo,
            fixtures,
            engines,
        }
    }

    /// Replace the engine registered for the same axis kind.
    pub fn with_engine(mut self, engine: Arc<dyn AxisEngine>) -> Self {
        let kind = engine.kind();
        self.engines.retain(|e| e.kind() != kind);
        self.engines.push(engine);
        self
    }

    pub fn store(&self) -> &Arc<dyn GraphStore> {
        &self.store
    }

    fn engine(&self, kind: AxisKind) -> Option<&Arc<dyn AxisEngine>> {
        self.engines.iter().find(|e| e.kind() == kind)
    }

    /// Explore an artist landmark, optionally focused on one of its tracks.
    ///
    /// An empty `axes` runs the full music set.
    pub async fn explore(
        &self,
        artist: &str,
        track: Option<&str>,
        axes: &[AxisKind],
    ) -> OrchestratorResult<ExploreOutcome> {
        let axes: &[AxisKind] = if axes.is_empty() { &AxisKind::MUSIC } else { axes };
        info!(artist, track, axes = ?axes, "Exploring landmark");

        let mut graph = self.store.load()?;

        let Some(resolved) = self.catalog.search_artist(artist).await else {
            warn!(artist, "Landmark not found in catalog");
            return Ok(ExploreOutcome::NotFound {
                query: artist.to_string(),
            });
        };

        let artist_key = canonical_key(NodeKind::Artist, &[&resolved.name]);
        let node = Node::new(
            resolved.name.clone(),
            NodeDetails::Artist(ArtistDetails {
                catalog_id: Some(resolved.id),
                picture: resolved.picture.clone(),
                ..Default::default()
            }),
        )
        .with_source("catalog")
        .as_landmark();
        graph.upsert_node(artist_key.clone(), node);

        let mut anchor = Anchor::new(resolved.name.clone(), artist_key.clone());
        anchor.catalog_id = Some(resolved.id);

        if let Some(title) = track {
            self.resolve_track(&mut graph, &mut anchor, artist, title).await?;
        }

        let landmark_kind = if track.is_some() {
            NodeKind::Track
        } else {
            NodeKind::Artist
        };
        graph.register_landmark(&artist_key, &resolved.name, landmark_kind)?;

        let tally = self.run_axes(&anchor, &mut graph, axes).await;
        let persisted = self.persist(&graph);
        Ok(ExploreOutcome::Explored(summarize(&anchor, &graph, tally, persisted)))
    }

    /// Resolve the track through the catalog and make it the focus of the
    /// exploration. An unresolved track leaves the artist as the focus.
    async fn resolve_track(
        &self,
        graph: &mut Graph,
        anchor: &mut Anchor,
        artist_query: &str,
        title: &str,
    ) -> OrchestratorResult<()> {
        let query = format!("{} {}", title, artist_query);
        let Some(found) = self.catalog.search_track(&query).await else {
            warn!(title, artist = artist_query, "Track not found, exploring artist only");
            return Ok(());
        };

        let tempo = self.tempo.lookup(artist_query, title).map(|e| e.tempo);
        let year = found.year();
        let track_key = canonical_key(NodeKind::Track, &[&anchor.name, &found.title]);
        let album = found.album.as_ref();
        let node = Node::new(
            found.title.clone(),
            NodeDetails::Track(TrackDetails {
                artist: Some(anchor.name.clone()),
                album: album.map(|a| a.title.clone()),
                tempo,
                year,
                duration: found.duration,
                catalog_id: Some(found.id),
                cover: album.and_then(|a| a.cover.clone()),
                ..Default::default()
            }),
        )
        .with_source("catalog")
        .as_landmark();
        graph.upsert_node(track_key.clone(), node);
        graph.link(&anchor.key, &track_key, Axis::Discography, 1.0, provenance([("role", "landmark-track")]))?;

        debug!(track = %track_key, ?tempo, ?year, "Resolved landmark track");
        anchor.focus = Some(track_key);
        anchor.tempo = tempo;
        anchor.year = year;
        Ok(())
    }

    /// Register an organization as a landmark.
    pub fn add_agency(&self, name: &str) -> OrchestratorResult<AgencyRegistration> {
        let name = name.trim();
        let mut graph = self.store.load()?;
        let key = canonical_key(NodeKind::Agency, &[name]);
        graph.upsert_node(
            key.clone(),
            Node::new(name, NodeDetails::Agency(OrgDetails::default())).as_landmark(),
        );
        let created = graph.register_landmark(&key, name, NodeKind::Agency)?;
        let persisted = self.persist(&graph);
        info!(agency = name, created, "Organization landmark registered");

        Ok(AgencyRegistration {
            key,
            name: name.to_string(),
            created,
            persisted,
        })
    }

    /// Explore an organization, or a person or studio tied to one, already
    /// in the graph.
    ///
    /// The name is looked up as an agency first, then as a person, then as
    /// a studio. Axes that only make sense for agencies are skipped for the
    /// other kinds. An empty `axes` runs the full organizational set.
    pub async fn explore_agency(
        &self,
        name: &str,
        axes: &[AxisKind],
    ) -> OrchestratorResult<ExploreOutcome> {
        let axes: &[AxisKind] = if axes.is_empty() {
            &AxisKind::ORGANIZATION
        } else {
            axes
        };
        let mut graph = self.store.load()?;
        let found = ORGANIZATION_KINDS
            .iter()
            .map(|kind| canonical_key(*kind, &[name]))
            .find_map(|key| graph.get_node(&key).map(|node| (key, node.name.clone())));
        let Some((key, resolved)) = found else {
            warn!(agency = name, "Organization not in graph; add it first");
            return Ok(ExploreOutcome::NotFound {
                query: name.to_string(),
            });
        };
        let anchor = Anchor::new(resolved, key);
        info!(agency = %anchor.name, axes = ?axes, "Exploring organization");

        let tally = self.run_axes(&anchor, &mut graph, axes).await;
        let persisted = self.persist(&graph);
        Ok(ExploreOutcome::Explored(summarize(&anchor, &graph, tally, persisted)))
    }

    /// Seed an empty graph from the fixture table. A graph that already
    /// has landmarks is left untouched.
    pub fn initialize(&self) -> OrchestratorResult<SeedSummary> {
        let mut graph = self.store.load()?;
        if !graph.landmarks.is_empty() || self.fixtures.seeds.is_empty() {
            return Ok(SeedSummary {
                landmarks_added: 0,
                edges_added: 0,
                persisted: false,
            });
        }

        let mut landmarks_added = 0;
        let mut edges_added = 0;
        for seed in &self.fixtures.seeds {
            let key = canonical_key(seed.kind, &[&seed.name]);
            graph.upsert_node(key.clone(), Node::of_kind(seed.kind, seed.name.as_str()).as_landmark());
            if graph.register_landmark(&key, &seed.name, seed.kind)? {
                landmarks_added += 1;
            }

            for link in &seed.links {
                let other = canonical_key(link.kind, &[&link.name]);
                graph.upsert_node(
                    other.clone(),
                    Node::of_kind(link.kind, link.name.as_str()).with_source("fixture"),
                );
                let mut meta = provenance([("source", "fixture")]);
                if let Some(relationship) = &link.relationship {
                    meta.insert("relationship".into(), relationship.as_str().into());
                }
                if graph.link(&key, &other, link.axis, link.weight, meta)?.is_created() {
                    edges_added += 1;
                }
            }
        }

        let persisted = self.persist(&graph);
        info!(landmarks_added, edges_added, "Seeded empty graph");
        Ok(SeedSummary {
            landmarks_added,
            edges_added,
            persisted,
        })
    }

    async fn run_axes(&self, anchor: &Anchor, graph: &mut Graph, axes: &[AxisKind]) -> AxisTally {
        let mut tally = AxisTally::default();
        let mut seen = Vec::with_capacity(axes.len());

        for &kind in axes {
            if seen.contains(&kind) {
                continue;
            }
            seen.push(kind);

            let Some(engine) = self.engine(kind) else {
                warn!(axis = %kind, "No engine registered for axis");
                tally.skipped.push(kind);
                continue;
            };
            if !engine.applies_to(anchor) {
                debug!(axis = %kind, anchor = %anchor.key, "Axis does not apply, skipping");
                tally.skipped.push(kind);
                continue;
            }

            match engine.run(anchor, graph).await {
                Ok(report) => {
                    info!(
                        axis = %kind,
                        nodes = report.nodes_added,
                        edges = report.edges_added,
                        degraded = report.degraded,
                        "Axis complete"
                    );
                    tally.record(kind, report);
                }
                Err(e) => {
                    error!(axis = %kind, error = %e, "Axis failed, continuing");
                    tally.failed.push(AxisFailure {
                        axis: kind,
                        error: e.to_string(),
                    });
                }
            }
        }
        tally
    }

    /// Save once. A write failure is logged and reported as not persisted.
    fn persist(&self, graph: &Graph) -> bool {
        match self.store.save(graph) {
            Ok(outcome) => outcome.persisted(),
            Err(e) => {
                error!(error = %e, "Failed to save graph");
                false
            }
        }
    }
}

fn summarize(anchor: &Anchor, graph: &Graph, tally: AxisTally, persisted: bool) -> ExploreStats {
    ExploreStats {
        landmark: anchor.name.clone(),
        anchor: anchor.focus_key().clone(),
        total_nodes: graph.node_count(),
        total_edges: graph.edge_count(),
        total_landmarks: graph.landmarks.len(),
        nodes_added: tally.nodes_added,
        edges_added: tally.edges_added,
        axes_run: tally.run,
        axes_skipped: tally.skipped,
        axes_failed: tally.failed,
        axes_degraded: tally.degraded,
        persisted,
    }
}
