//! Node representation in the correlation graph

use serde::{Deserialize, Serialize};

/// Node type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Artist,
    Track,
    Album,
    Person,
    Agency,
    Project,
    /// A legacy/traditional studio a person previously worked at
    #[serde(rename = "traditional")]
    TraditionalStudio,
}

impl NodeKind {
    pub const ALL: [NodeKind; 7] = [
        NodeKind::Artist,
        NodeKind::Track,
        NodeKind::Album,
        NodeKind::Person,
        NodeKind::Agency,
        NodeKind::Project,
        NodeKind::TraditionalStudio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Artist => "artist",
            NodeKind::Track => "track",
            NodeKind::Album => "album",
            NodeKind::Person => "person",
            NodeKind::Agency => "agency",
            NodeKind::Project => "project",
            NodeKind::TraditionalStudio => "traditional",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        NodeKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted || (wanted == "traditional-studio" && *k == NodeKind::TraditionalStudio))
            .ok_or_else(|| format!("unknown node type: {}", s))
    }
}

/// Coverage status assigned by the gap analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapStatus {
    Mapped,
    Unmapped,
}

/// Copy every `Some` field of `other` over `self`, leaving the rest alone.
macro_rules! absorb_fields {
    ($ty:ident { $($field:ident),* $(,)? }) => {
        impl $ty {
            fn absorb(&mut self, other: $ty) {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field;
                    }
                )*
            }
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}
absorb_fields!(ArtistDetails { catalog_id, credit_id, picture });

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Beats per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<u64>,
    /// Identifier carried by the tempo dataset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}
absorb_fields!(TrackDetails { artist, album, tempo, year, duration, catalog_id, external_id, cover });

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumDetails {
    /// Key of the owning artist node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}
absorb_fields!(AlbumDetails { artist, year, catalog_id, cover });

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}
absorb_fields!(PersonDetails { credit_id, active });

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viral: Option<bool>,
}
absorb_fields!(ProjectDetails { url, notable, viral });

/// Fields shared by organizational nodes (agencies, studios)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}
absorb_fields!(OrgDetails { website });

/// Type-specific payload. The `type` tag doubles as the node's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeDetails {
    Artist(ArtistDetails),
    Track(TrackDetails),
    Album(AlbumDetails),
    Person(PersonDetails),
    Agency(OrgDetails),
    Project(ProjectDetails),
    #[serde(rename = "traditional")]
    TraditionalStudio(OrgDetails),
}

impl NodeDetails {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeDetails::Artist(_) => NodeKind::Artist,
            NodeDetails::Track(_) => NodeKind::Track,
            NodeDetails::Album(_) => NodeKind::Album,
            NodeDetails::Person(_) => NodeKind::Person,
            NodeDetails::Agency(_) => NodeKind::Agency,
            NodeDetails::Project(_) => NodeKind::Project,
            NodeDetails::TraditionalStudio(_) => NodeKind::TraditionalStudio,
        }
    }

    /// Empty payload for a kind.
    pub fn empty(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Artist => NodeDetails::Artist(ArtistDetails::default()),
            NodeKind::Track => NodeDetails::Track(TrackDetails::default()),
            NodeKind::Album => NodeDetails::Album(AlbumDetails::default()),
            NodeKind::Person => NodeDetails::Person(PersonDetails::default()),
            NodeKind::Agency => NodeDetails::Agency(OrgDetails::default()),
            NodeKind::Project => NodeDetails::Project(ProjectDetails::default()),
            NodeKind::TraditionalStudio => NodeDetails::TraditionalStudio(OrgDetails::default()),
        }
    }

    /// Field-wise merge. A payload of a different kind replaces this one.
    fn absorb(&mut self, other: NodeDetails) {
        match (self, other) {
            (NodeDetails::Artist(a), NodeDetails::Artist(b)) => a.absorb(b),
            (NodeDetails::Track(a), NodeDetails::Track(b)) => a.absorb(b),
            (NodeDetails::Album(a), NodeDetails::Album(b)) => a.absorb(b),
            (NodeDetails::Person(a), NodeDetails::Person(b)) => a.absorb(b),
            (NodeDetails::Agency(a), NodeDetails::Agency(b)) => a.absorb(b),
            (NodeDetails::Project(a), NodeDetails::Project(b)) => a.absorb(b),
            (NodeDetails::TraditionalStudio(a), NodeDetails::TraditionalStudio(b)) => a.absorb(b),
            (this, other) => *this = other,
        }
    }
}

/// A node in the correlation graph.
///
/// The canonical key is not stored here; it is the node's slot in
/// [`Graph::nodes`](super::Graph).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Display name as first (or most recently) reported by a source
    pub name: String,
    #[serde(flatten)]
    pub details: NodeDetails,
    /// Number of distinct edges touching this node. Owned by the graph.
    #[serde(default)]
    pub connections: u32,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_landmark: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_status: Option<MapStatus>,
    /// Which source or strategy discovered this node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Node {
    /// Create a node with the given name and payload
    pub fn new(name: impl Into<String>, details: NodeDetails) -> Self {
        Self {
            name: name.into(),
            details,
            connections: 0,
            is_landmark: false,
            map_status: None,
            source: None,
        }
    }

    /// Create a node with an empty payload of the given kind
    pub fn of_kind(kind: NodeKind, name: impl Into<String>) -> Self {
        Self::new(name, NodeDetails::empty(kind))
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn as_landmark(mut self) -> Self {
        self.is_landmark = true;
        self
    }

    pub fn with_map_status(mut self, status: MapStatus) -> Self {
        self.map_status = Some(status);
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.details.kind()
    }

    /// Release year, for kinds that carry one.
    pub fn year(&self) -> Option<i32> {
        match &self.details {
            NodeDetails::Track(t) => t.year,
            NodeDetails::Album(a) => a.year,
            _ => None,
        }
    }

    pub fn tempo(&self) -> Option<f64> {
        match &self.details {
            NodeDetails::Track(t) => t.tempo,
            _ => None,
        }
    }

    /// Merge a rediscovered version of this node.
    ///
    /// Set fields of `incoming` win; unset fields keep their value.
    /// `connections` is never touched and the landmark flag is sticky.
    pub(crate) fn merge(&mut self, incoming: Node) {
        if !incoming.name.trim().is_empty() {
            self.name = incoming.name;
        }
        self.details.absorb(incoming.details);
        self.is_landmark |= incoming.is_landmark;
        if incoming.map_status.is_some() {
            self.map_status = incoming.map_status;
        }
        if incoming.source.is_some() {
            self.source = incoming.source;
        }
    }
}
