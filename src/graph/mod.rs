//! Core graph data structures

mod document;
mod edge;
mod key;
mod node;


pub use document::{
    EdgeUpsert, Graph, GraphError, GraphResult, GraphStats, Landmark, Neighborhood, NodeUpsert,
};
pub use edge::{provenance, Axis, Edge, Provenance};
pub use key::{canonical_key, normalize, NodeKey};
pub use node::{
    AlbumDetails, ArtistDetails, MapStatus, Node, NodeDetails, NodeKind, OrgDetails,
    PersonDetails, ProjectDetails, TrackDetails,
};
