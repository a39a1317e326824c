//! Music catalog client
//!
//! Free-text search plus related-artist, discography and tracklist lookups
//! against a Deezer-shaped JSON API (`{"data": [...]}` pages, errors as
//! `{"error": {"code": ..}}` bodies).

use super::error::SourceError;
use super::retry::{with_retry, RetryPolicy};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("meridian/", env!("CARGO_PKG_VERSION"));

/// Provider error code signalling that the request quota is exhausted
const QUOTA_ERROR_CODE: i64 = 4;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogArtist {
    pub id: u64,
    pub name: String,
    #[serde(default, rename = "picture_medium")]
    pub picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogAlbum {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default, rename = "cover_medium")]
    pub cover: Option<String>,
}

impl CatalogAlbum {
    pub fn year(&self) -> Option<i32> {
        super::year_of(self.release_date.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackAlbumRef {
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default, rename = "cover_medium")]
    pub cover: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogTrack {
    pub id: u64,
    pub title: String,
    /// Seconds
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub artist: Option<TrackArtistRef>,
    #[serde(default)]
    pub album: Option<TrackAlbumRef>,
}

impl CatalogTrack {
    pub fn artist_name(&self) -> &str {
        self.artist.as_ref().map(|a| a.name.as_str()).unwrap_or("")
    }

    pub fn year(&self) -> Option<i32> {
        super::year_of(self.album.as_ref().and_then(|a| a.release_date.as_deref()))
    }
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

/// Catalog lookups used by the orchestrator and the catalog axes.
///
/// `None` means the catalog is unavailable; an empty list means it
/// answered with nothing.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Best artist match for a free-text query (the first hit)
    async fn search_artist(&self, query: &str) -> Option<CatalogArtist>;

    /// Best track match for a free-text query (the first hit)
    async fn search_track(&self, query: &str) -> Option<CatalogTrack>;

    async fn related_to(&self, artist_id: u64, limit: usize) -> Option<Vec<CatalogArtist>>;

    async fn albums_of(&self, artist_id: u64, limit: usize) -> Option<Vec<CatalogAlbum>>;

    async fn tracks_of(&self, album_id: u64, limit: usize) -> Option<Vec<CatalogTrack>>;
}

/// HTTP catalog client with retry and quota backoff
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    policy: RetryPolicy,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>, policy: RetryPolicy) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            policy,
        })
    }

    async fn request(&self, path: &str, query: &[(&str, String)]) -> Result<Value, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Querying catalog");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::from_status(status, response.headers(), None));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;
        check_provider_error(&body)?;
        Ok(body)
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Option<Vec<T>> {
        let body = with_retry("catalog", &self.policy, || self.request(path, query)).await?;
        match serde_json::from_value::<Page<T>>(body) {
            Ok(page) => Some(page.data),
            Err(e) => {
                warn!(path, error = %e, "Unexpected catalog response shape");
                None
            }
        }
    }
}

/// Map an in-body provider error to a `SourceError`.
fn check_provider_error(body: &Value) -> Result<(), SourceError> {
    let Some(error) = body.get("error") else {
        return Ok(());
    };
    let code = error.get("code").and_then(Value::as_i64).unwrap_or(-1);
    if code == QUOTA_ERROR_CODE {
        return Err(SourceError::Quota(code));
    }
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Err(SourceError::Provider { code, message })
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn search_artist(&self, query: &str) -> Option<CatalogArtist> {
        let params = [("q", query.to_string()), ("limit", "1".to_string())];
        let hits: Vec<CatalogArtist> = self.fetch_page("/search/artist", &params).await?;
        hits.into_iter().next()
    }

    async fn search_track(&self, query: &str) -> Option<CatalogTrack> {
        let params = [("q", query.to_string()), ("limit", "1".to_string())];
        let hits: Vec<CatalogTrack> = self.fetch_page("/search/track", &params).await?;
        hits.into_iter().next()
    }

    async fn related_to(&self, artist_id: u64, limit: usize) -> Option<Vec<CatalogArtist>> {
        let params = [("limit", limit.to_string())];
        self.fetch_page(&format!("/artist/{}/related", artist_id), &params)
            .await
    }

    async fn albums_of(&self, artist_id: u64, limit: usize) -> Option<Vec<CatalogAlbum>> {
        let params = [("limit", limit.to_string())];
        self.fetch_page(&format!("/artist/{}/albums", artist_id), &params)
            .await
    }

    async fn tracks_of(&self, album_id: u64, limit: usize) -> Option<Vec<CatalogTrack>> {
        let params = [("limit", limit.to_string())];
        self.fetch_page(&format!("/album/{}/tracks", album_id), &params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn quota_error_is_distinct_from_other_provider_errors() {
        let quota = json!({"error": {"type": "Exception", "message": "Quota limit exceeded", "code": 4}});
        assert_eq!(check_provider_error(&quota), Err(SourceError::Quota(4)));

        let missing = json!({"error": {"message": "no data", "code": 800}});
        assert_eq!(
            check_provider_error(&missing),
            Err(SourceError::Provider { code: 800, message: "no data".into() })
        );

        assert!(check_provider_error(&json!({"data": []})).is_ok());
    }

    #[test]
    fn track_page_parses_nested_refs() {
        let body = json!({
            "data": [{
                "id": 3135556,
                "title": "My Own Summer (Shove It)",
                "duration": 215,
                "artist": {"id": 1190, "name": "Deftones"},
                "album": {"id": 302127, "title": "Around the Fur", "release_date": "1997-10-28"}
            }],
            "total": 1
        });
        let page: Page<CatalogTrack> = serde_json::from_value(body).unwrap();
        let track = &page.data[0];
        assert_eq!(track.artist_name(), "Deftones");
        assert_eq!(track.year(), Some(1997));
        assert_eq!(track.duration, Some(215));
    }

    #[test]
    fn page_without_data_is_empty() {
        let page: Page<CatalogAlbum> = serde_json::from_value(json!({"total": 0})).unwrap();
        assert!(page.data.is_empty());
    }

    #[test]
    fn album_year() {
        let album: CatalogAlbum = serde_json::from_value(json!({
            "id": 1, "title": "White Pony", "release_date": "2000-06-20"
        }))
        .unwrap();
        assert_eq!(album.year(), Some(2000));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = CatalogClient::new("https://api.example.com/", RetryPolicy::immediate(1)).unwrap();
        assert_eq!(client.base_url, "https://api.example.com");
    }
}
