//! Credit / discography database client
//!
//! Name search plus artist profiles listing members and group
//! affiliations. Requests are paced proactively and a 429 is answered by
//! waiting out the provider's retry-after.

use super::error::SourceError;
use super::pacing::Pacer;
use super::retry::{with_retry, RetryPolicy};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// One hit of a name search
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreditHit {
    pub id: u64,
    /// The provider returns the display name under `title`
    #[serde(rename = "title")]
    pub name: String,
}

/// A member or group reference inside a profile
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreditRef {
    pub id: u64,
    pub name: String,
    /// Absent means active
    #[serde(default)]
    pub active: Option<bool>,
}

impl CreditRef {
    pub fn is_active(&self) -> bool {
        self.active != Some(false)
    }
}

/// An artist or person profile
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreditProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub members: Vec<CreditRef>,
    #[serde(default)]
    pub groups: Vec<CreditRef>,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default)]
    results: Vec<CreditHit>,
}

#[async_trait]
pub trait CreditSource: Send + Sync {
    /// Search hits in provider order. Callers bind to the first one.
    async fn search_by_name(&self, name: &str) -> Option<Vec<CreditHit>>;

    async fn profile(&self, id: u64) -> Option<CreditProfile>;
}

/// Settings for [`CreditClient`]
#[derive(Debug, Clone)]
pub struct CreditClientOptions {
    pub base_url: String,
    pub token: Option<String>,
    pub user_agent: String,
    pub policy: RetryPolicy,
    /// Wait applied to a 429 that carries no usable retry-after header
    pub default_retry_after: Duration,
    /// Minimum spacing between any two requests
    pub pacing: Duration,
}

impl Default for CreditClientOptions {
    fn default() -> Self {
        Self {
            base_url: "https://api.discogs.com".to_string(),
            token: None,
            user_agent: concat!("meridian/", env!("CARGO_PKG_VERSION")).to_string(),
            policy: RetryPolicy::new(2, Duration::from_secs(2)),
            default_retry_after: Duration::from_secs(3),
            pacing: Duration::from_millis(1200),
        }
    }
}

pub struct CreditClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    policy: RetryPolicy,
    default_retry_after: Duration,
    pacer: Pacer,
}

impl CreditClient {
    pub fn new(options: CreditClientOptions) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(options.user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            token: options.token.filter(|t| !t.trim().is_empty()),
            policy: options.policy,
            default_retry_after: options.default_retry_after,
            pacer: Pacer::new(options.pacing),
        })
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        self.pacer.wait().await;

        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Querying credit database");

        let mut request = self.http.get(&url).query(query);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Discogs token={}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::from_status(
                status,
                response.headers(),
                Some(self.default_retry_after),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl CreditSource for CreditClient {
    async fn search_by_name(&self, name: &str) -> Option<Vec<CreditHit>> {
        let params = [
            ("q", name.to_string()),
            ("type", "artist".to_string()),
            ("per_page", "3".to_string()),
        ];
        let results: SearchResults = with_retry("credits", &self.policy, || {
            self.request("/database/search", &params)
        })
        .await?;
        Some(results.results)
    }

    async fn profile(&self, id: u64) -> Option<CreditProfile> {
        let path = format!("/artists/{}", id);
        with_retry("credits", &self.policy, || self.request(&path, &[])).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_parses_members_and_groups() {
        let profile: CreditProfile = serde_json::from_value(json!({
            "id": 252122,
            "name": "Deftones",
            "members": [
                {"id": 1, "name": "Chino Moreno", "active": true},
                {"id": 2, "name": "Chi Cheng", "active": false},
                {"id": 3, "name": "Abe Cunningham"}
            ]
        }))
        .unwrap();

        assert_eq!(profile.members.len(), 3);
        assert!(profile.groups.is_empty());
        assert!(profile.members[0].is_active());
        assert!(!profile.members[1].is_active());
        assert!(profile.members[2].is_active());
    }

    #[test]
    fn search_hit_reads_title_as_name() {
        let results: SearchResults = serde_json::from_value(json!({
            "pagination": {"items": 1},
            "results": [{"id": 252122, "title": "Deftones", "type": "artist"}]
        }))
        .unwrap();
        assert_eq!(results.results[0].name, "Deftones");
    }

    #[test]
    fn blank_token_is_dropped() {
        let client = CreditClient::new(CreditClientOptions {
            token: Some("  ".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(client.token.is_none());
        assert_eq!(client.pacer.min_interval(), Duration::from_millis(1200));
    }
}
