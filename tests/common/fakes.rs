//! In-memory source fakes
//!
//! Deterministic stand-ins for the catalog, credit and web clients. Each
//! one can be switched "offline" to behave like a client that exhausted
//! its retries.

use async_trait::async_trait;
use meridian::graph::Graph;
use meridian::source::{
    CatalogAlbum, CatalogArtist, CatalogSource, CatalogTrack, CreditHit, CreditProfile, CreditRef,
    CreditSource, SearchSnippet, TrackAlbumRef, TrackArtistRef, WebSearch,
};
use meridian::{Anchor, AxisEngine, AxisError, AxisKind, AxisReport};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct FakeCatalog {
    pub artists: Vec<CatalogArtist>,
    pub tracks: Vec<CatalogTrack>,
    pub related: HashMap<u64, Vec<CatalogArtist>>,
    pub albums: HashMap<u64, Vec<CatalogAlbum>>,
    pub album_tracks: HashMap<u64, Vec<CatalogTrack>>,
    pub offline: bool,
}

impl FakeCatalog {
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Default::default()
        }
    }

    pub fn with_artist(mut self, id: u64, name: &str) -> Self {
        self.artists.push(CatalogArtist {
            id,
            name: name.to_string(),
            picture: None,
        });
        self
    }

    pub fn with_track(mut self, id: u64, artist: &str, title: &str, album: &str, released: &str) -> Self {
        self.tracks.push(track(id, artist, title, album, released));
        self
    }

    pub fn with_related(mut self, artist_id: u64, related: &[(u64, &str)]) -> Self {
        self.related.insert(
            artist_id,
            related
                .iter()
                .map(|(id, name)| CatalogArtist {
                    id: *id,
                    name: name.to_string(),
                    picture: None,
                })
                .collect(),
        );
        self
    }
}

pub fn track(id: u64, artist: &str, title: &str, album: &str, released: &str) -> CatalogTrack {
    CatalogTrack {
        id,
        title: title.to_string(),
        duration: Some(240),
        artist: Some(TrackArtistRef {
            name: artist.to_string(),
        }),
        album: Some(TrackAlbumRef {
            title: album.to_string(),
            release_date: Some(released.to_string()),
            cover: None,
        }),
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn search_artist(&self, query: &str) -> Option<CatalogArtist> {
        if self.offline {
            return None;
        }
        let query = query.trim().to_lowercase();
        self.artists
            .iter()
            .find(|a| a.name.to_lowercase() == query)
            .cloned()
    }

    async fn search_track(&self, query: &str) -> Option<CatalogTrack> {
        if self.offline {
            return None;
        }
        let query = query.to_lowercase();
        self.tracks
            .iter()
            .find(|t| query.contains(&t.title.to_lowercase()))
            .cloned()
    }

    async fn related_to(&self, artist_id: u64, limit: usize) -> Option<Vec<CatalogArtist>> {
        if self.offline {
            return None;
        }
        let related = self.related.get(&artist_id).cloned().unwrap_or_default();
        Some(related.into_iter().take(limit).collect())
    }

    async fn albums_of(&self, artist_id: u64, limit: usize) -> Option<Vec<CatalogAlbum>> {
        if self.offline {
            return None;
        }
        let albums = self.albums.get(&artist_id).cloned().unwrap_or_default();
        Some(albums.into_iter().take(limit).collect())
    }

    async fn tracks_of(&self, album_id: u64, limit: usize) -> Option<Vec<CatalogTrack>> {
        if self.offline {
            return None;
        }
        let tracks = self.album_tracks.get(&album_id).cloned().unwrap_or_default();
        Some(tracks.into_iter().take(limit).collect())
    }
}

#[derive(Default)]
pub struct FakeCredits {
    hits: HashMap<String, Vec<CreditHit>>,
    profiles: HashMap<u64, CreditProfile>,
}

fn credit_refs(refs: &[(u64, &str)]) -> Vec<CreditRef> {
    refs.iter()
        .map(|(id, name)| CreditRef {
            id: *id,
            name: name.to_string(),
            active: Some(true),
        })
        .collect()
}

impl FakeCredits {
    /// Register a searchable profile.
    pub fn with_profile(
        mut self,
        id: u64,
        name: &str,
        members: &[(u64, &str)],
        groups: &[(u64, &str)],
    ) -> Self {
        self.hits
            .entry(name.to_lowercase())
            .or_default()
            .push(CreditHit {
                id,
                name: name.to_string(),
            });
        self.profiles.insert(
            id,
            CreditProfile {
                name: name.to_string(),
                members: credit_refs(members),
                groups: credit_refs(groups),
            },
        );
        self
    }
}

#[async_trait]
impl CreditSource for FakeCredits {
    async fn search_by_name(&self, name: &str) -> Option<Vec<CreditHit>> {
        Some(self.hits.get(&name.to_lowercase()).cloned().unwrap_or_default())
    }

    async fn profile(&self, id: u64) -> Option<CreditProfile> {
        self.profiles.get(&id).cloned()
    }
}

/// A credit database that is always down
#[derive(Default)]
pub struct FailingCredits {
    pub calls: AtomicUsize,
}

impl FailingCredits {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CreditSource for FailingCredits {
    async fn search_by_name(&self, _name: &str) -> Option<Vec<CreditHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        None
    }

    async fn profile(&self, _id: u64) -> Option<CreditProfile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        None
    }
}

#[derive(Default)]
pub struct FakeWeb {
    results: Option<Vec<SearchSnippet>>,
}

impl FakeWeb {
    pub fn offline() -> Self {
        Self { results: None }
    }

    pub fn with_snippets(snippets: &[(&str, &str)]) -> Self {
        Self {
            results: Some(
                snippets
                    .iter()
                    .map(|(title, snippet)| SearchSnippet {
                        title: title.to_string(),
                        snippet: snippet.to_string(),
                        link: None,
                    })
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl WebSearch for FakeWeb {
    async fn search(&self, _query: &str) -> Option<Vec<SearchSnippet>> {
        self.results.clone()
    }
}

/// An axis whose every run fails
pub struct FailingAxis(pub AxisKind);

#[async_trait]
impl AxisEngine for FailingAxis {
    fn kind(&self) -> AxisKind {
        self.0
    }

    async fn run(&self, _anchor: &Anchor, _graph: &mut Graph) -> Result<AxisReport, AxisError> {
        Err(AxisError::Internal("exploded".into()))
    }
}
