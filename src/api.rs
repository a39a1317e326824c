//! Transport-independent API layer.
//!
//! `MapperApi` is the single entry point for consumer-facing operations.
//! Front ends (the CLI today, an HTTP controller tomorrow) call `MapperApi`
//! methods; they never reach into the orchestrator, the store or the
//! source clients directly.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::axis::{AxisKind, FixtureTable};
use crate::config::{ConfigError, MapperConfig};
use crate::gaps::{self, GapReport, ReferenceSet};
use crate::graph::{canonical_key, Graph, GraphStats, Landmark, Neighborhood, NodeKind};
use crate::orchestrator::{
    AgencyRegistration, ExploreOutcome, Orchestrator, OrchestratorResult, SeedSummary, Sources,
};
use crate::source::{
    CatalogClient, CreditClient, SourceError, TempoDataset, WebSearchClient,
};
use crate::storage::{GraphStore, JsonFileStore, OpenStore, StorageError, StorageResult};

/// Errors raised while wiring the API from configuration
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Source client error: {0}")]
    Source(#[from] SourceError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] std::io::Error),
}

/// Result of a gap analysis together with the persistence flag
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapAnalysis {
    #[serde(flatten)]
    pub report: GapReport,
    pub persisted: bool,
}

/// Single entry point for all consumer-facing operations.
#[derive(Clone)]
pub struct MapperApi {
    orchestrator: Arc<Orchestrator>,
    store: Arc<dyn GraphStore>,
    reference: Arc<ReferenceSet>,
}

impl MapperApi {
    pub fn new(orchestrator: Arc<Orchestrator>, reference: ReferenceSet) -> Self {
        let store = orchestrator.store().clone();
        Self {
            orchestrator,
            store,
            reference: Arc::new(reference),
        }
    }

    /// Build the store, the source clients, the datasets and the
    /// orchestrator described by `config`.
    pub fn from_config(config: &MapperConfig) -> Result<Self, ApiError> {
        let graph_path = config.graph_path();
        let store: Arc<dyn GraphStore> = if config.read_only {
            Arc::new(JsonFileStore::open_read_only(&graph_path)?)
        } else {
            Arc::new(JsonFileStore::open(&graph_path)?)
        };

        let tempo = Arc::new(TempoDataset::load(config.tempo_dataset_path())?);
        if tempo.is_empty() {
            warn!(path = %config.tempo_dataset_path().display(), "Tempo dataset is empty; tempo axis will find nothing");
        }

        let fixtures_path = config.fixtures_path();
        let fixtures = if fixtures_path.exists() {
            FixtureTable::load(&fixtures_path)?
        } else {
            FixtureTable::bundled()?
        };

        let mut reference = ReferenceSet::new();
        reference.add_tempo_dataset(&tempo);
        for path in config.reference_paths() {
            reference.add_json_file(&path)?;
        }

        let sources = Sources {
            tempo,
            catalog: Arc::new(CatalogClient::new(
                config.catalog.base_url.clone(),
                config.catalog.policy(),
            )?),
            credits: Arc::new(CreditClient::new(config.credits.options())?),
            web: Arc::new(WebSearchClient::new(
                config.web.search_url.clone(),
                &config.web.user_agent,
                config.web.policy(),
            )?),
        };

        info!(
            graph = %graph_path.display(),
            read_only = config.read_only,
            reference_names = reference.len(),
            "Mapper ready"
        );

        let orchestrator = Orchestrator::new(store, sources, Arc::new(fixtures), &config.axes);
        Ok(Self::new(Arc::new(orchestrator), reference))
    }

    // --- Read ---

    pub fn graph(&self) -> StorageResult<Graph> {
        self.store.load()
    }

    pub fn stats(&self) -> StorageResult<GraphStats> {
        Ok(self.store.load()?.stats())
    }

    pub fn landmarks(&self) -> StorageResult<Vec<Landmark>> {
        Ok(self.store.load()?.landmarks)
    }

    /// An artist, every edge touching it and its direct neighbors.
    pub fn constellation(&self, artist: &str) -> StorageResult<Option<Neighborhood>> {
        let graph = self.store.load()?;
        Ok(graph.neighborhood(&canonical_key(NodeKind::Artist, &[artist])))
    }

    pub fn is_read_only(&self) -> bool {
        self.store.is_read_only()
    }

    // --- Write ---

    pub async fn explore(
        &self,
        artist: &str,
        track: Option<&str>,
        axes: &[AxisKind],
    ) -> OrchestratorResult<ExploreOutcome> {
        self.orchestrator.explore(artist, track, axes).await
    }

    pub fn add_agency(&self, name: &str) -> OrchestratorResult<AgencyRegistration> {
        self.orchestrator.add_agency(name)
    }

    pub async fn explore_agency(
        &self,
        name: &str,
        axes: &[AxisKind],
    ) -> OrchestratorResult<ExploreOutcome> {
        self.orchestrator.explore_agency(name, axes).await
    }

    pub fn initialize(&self) -> OrchestratorResult<SeedSummary> {
        self.orchestrator.initialize()
    }

    /// Annotate nodes of `kind` with their coverage status, persist the
    /// annotation and return the partition.
    pub fn analyze_gaps(&self, kind: NodeKind) -> StorageResult<GapAnalysis> {
        let mut graph = self.store.load()?;
        let report = gaps::analyze(&mut graph, kind, &self.reference);
        let persisted = self.store.save(&graph)?.persisted();
        info!(
            kind = %kind,
            mapped = report.mapped_count,
            unmapped = report.unmapped_count,
            persisted,
            "Gap analysis complete"
        );
        Ok(GapAnalysis { report, persisted })
    }
}
