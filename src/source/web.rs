//! Web search scraping
//!
//! Fetches a search-results page and pulls out `(title, snippet, link)`
//! triples. Result markup changes often, so each field is looked up
//! through a list of selectors and the first one that matches wins. No
//! match anywhere is an empty result, not an error.

use super::error::SourceError;
use super::retry::{with_retry, RetryPolicy};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Candidate selectors for one result block, most specific first
const RESULT_SELECTORS: &[&str] = &["div.g", ".g", "div.result", "li.b_algo", "article"];
const TITLE_SELECTORS: &[&str] = &["h3", "h2", ".result__title"];
const SNIPPET_SELECTORS: &[&str] = &[".VwiC3b", ".result__snippet", ".b_caption p", "p"];
const LINK_SELECTORS: &[&str] = &["a[href]"];

/// One extracted search result
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchSnippet {
    pub title: String,
    pub snippet: String,
    pub link: Option<String>,
}

#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Results in page order. `None` when the search endpoint is unavailable.
    async fn search(&self, query: &str) -> Option<Vec<SearchSnippet>>;
}

pub struct WebSearchClient {
    http: reqwest::Client,
    search_url: String,
    policy: RetryPolicy,
}

impl WebSearchClient {
    pub fn new(
        search_url: impl Into<String>,
        user_agent: &str,
        policy: RetryPolicy,
    ) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(Self {
            http,
            search_url: search_url.into(),
            policy,
        })
    }

    async fn fetch_html(&self, query: &str) -> Result<String, SourceError> {
        debug!(url = %self.search_url, query, "Fetching search results");
        let response = self
            .http
            .get(&self.search_url)
            .query(&[("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::from_status(status, response.headers(), None));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl WebSearch for WebSearchClient {
    async fn search(&self, query: &str) -> Option<Vec<SearchSnippet>> {
        let html = with_retry("web", &self.policy, || self.fetch_html(query)).await?;
        let snippets = extract_snippets(&html);
        debug!(query, results = snippets.len(), "Extracted search snippets");
        Some(snippets)
    }
}

/// Parse every selector in the list, skipping any that fail to parse.
fn parse_all(candidates: &[&str]) -> Vec<Selector> {
    candidates
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect()
}

/// Trimmed, whitespace-collapsed text of the first element matching any
/// of `selectors` inside `scope`.
fn first_text(scope: ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        let element = scope.select(selector).next()?;
        let text = element.text().collect::<Vec<_>>().join(" ");
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        (!text.is_empty()).then_some(text)
    })
}

/// Extract search results from a results page.
///
/// Result blocks come from the first selector in the fallback list that
/// matches anything; blocks without a title are dropped.
pub fn extract_snippets(html: &str) -> Vec<SearchSnippet> {
    let document = Html::parse_document(html);
    let titles = parse_all(TITLE_SELECTORS);
    let snippets = parse_all(SNIPPET_SELECTORS);
    let links = parse_all(LINK_SELECTORS);

    let Some(blocks) = parse_all(RESULT_SELECTORS)
        .into_iter()
        .map(|selector| document.select(&selector).collect::<Vec<_>>())
        .find(|blocks| !blocks.is_empty())
    else {
        return Vec::new();
    };

    blocks
        .into_iter()
        .filter_map(|block| {
            let title = first_text(block, &titles)?;
            let snippet = first_text(block, &snippets).unwrap_or_default();
            let link = links
                .iter()
                .find_map(|s| block.select(s).next())
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string);
            Some(SearchSnippet { title, snippet, link })
        })
        .collect()
}
