//! Source clients
//!
//! Resilient wrappers over each external data provider. Every lookup has
//! the shape `fetch(query) -> Option<result>`: transient failures are
//! retried with backoff inside the client, and a `None` means the source
//! is unavailable. Callers continue without it.

mod catalog;
mod credits;
mod error;
mod pacing;
mod retry;
mod tempo;
mod web;

pub use catalog::{
    CatalogAlbum, CatalogArtist, CatalogClient, CatalogSource, CatalogTrack, TrackAlbumRef,
    TrackArtistRef,
};
pub use credits::{
    CreditClient, CreditClientOptions, CreditHit, CreditProfile, CreditRef, CreditSource,
};
pub use error::SourceError;
pub use pacing::Pacer;
pub use retry::{with_retry, RetryPolicy};
pub use tempo::{TempoDataset, TempoEntry};
pub use web::{extract_snippets, SearchSnippet, WebSearch, WebSearchClient};

/// Year prefix of a `YYYY-MM-DD` release date
pub(crate) fn year_of(release_date: Option<&str>) -> Option<i32> {
    release_date?.split('-').next()?.trim().parse().ok()
}
