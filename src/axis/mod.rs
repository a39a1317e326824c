//! Axis engines
//!
//! Independent correlation strategies. Each one consumes a resolved
//! [`Anchor`], the graph and whatever sources it needs, and writes nodes
//! and edges straight into the graph.

mod catalog_traversal;
pub mod fixtures;
mod heuristic;
mod member_graph;
mod portfolio;
mod related;
mod tempo_proximity;
mod temporal_cluster;
mod text_heuristic;
mod traits;

pub use catalog_traversal::CatalogTraversal;
pub use fixtures::FixtureTable;
pub use heuristic::{Extraction, Extractor, ProfileTitleExtractor};
pub use member_graph::MemberGraph;
pub use portfolio::{PeerDiscovery, Portfolio};
pub use related::RelatedArtists;
pub use tempo_proximity::{tempo_weight, TempoProximity};
pub use temporal_cluster::TemporalCluster;
pub use text_heuristic::{founder_query, TextHeuristic};
pub use traits::{Anchor, AxisEngine, AxisError, AxisKind, AxisReport};
