//! Meridian: Weighted Typed Correlation Graph Engine
//!
//! Builds an append-only graph of entities (artists, tracks, albums,
//! people, organizations) around landmarks, by running independent
//! correlation strategies ("axes") against local datasets and external
//! services.
//!
//! # Core Concepts
//!
//! - **Nodes**: typed entities identified by a canonical, normalized key
//! - **Edges**: weighted, axis-tagged links deduplicated on the unordered
//!   pair; weights only ever rise
//! - **Landmarks**: the seeds an exploration fans out from
//! - **Axes**: failure-isolated strategies run one after another
//!
//! # Example
//!
//! ```
//! use meridian::{canonical_key, Graph, Node, NodeKind};
//!
//! let mut graph = Graph::new();
//! let key = canonical_key(NodeKind::Artist, &[" Deftones "]);
//! graph.upsert_node(key.clone(), Node::of_kind(NodeKind::Artist, "Deftones"));
//! assert_eq!(key.as_str(), "artist::deftones");
//! ```

pub mod api;
pub mod axis;
pub mod config;
pub mod gaps;
pub mod graph;
pub mod orchestrator;
pub mod source;
pub mod storage;

pub use api::{ApiError, GapAnalysis, MapperApi};
pub use axis::{Anchor, AxisEngine, AxisError, AxisKind, AxisReport, FixtureTable};
pub use config::{ConfigError, MapperConfig};
pub use gaps::{GapEntry, GapReport, ReferenceSet};
pub use graph::{
    canonical_key, Axis, Edge, Graph, GraphError, GraphResult, GraphStats, Landmark, MapStatus,
    Neighborhood, Node, NodeDetails, NodeKey, NodeKind,
};
pub use orchestrator::{
    AgencyRegistration, AxisFailure, ExploreOutcome, ExploreStats, Orchestrator,
    OrchestratorError, OrchestratorResult, SeedSummary, Sources,
};
pub use storage::{GraphStore, JsonFileStore, MemoryStore, OpenStore, StorageError, StorageResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
