//! Source client errors

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Why a single request to a provider failed
///
/// These never escape a client: they drive the retry loop and end up in
/// the log. Callers only ever see `None`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Provider quota exceeded (code {0})")]
    Quota(i64),

    #[error("Rate limited")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Provider error {code}: {message}")]
    Provider { code: i64, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl SourceError {
    /// Server errors, network errors and explicit throttling signals are
    /// worth retrying. Everything else fails immediately.
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Network(_) | SourceError::Quota(_) | SourceError::RateLimited { .. } => true,
            SourceError::Status(code) => *code == 429 || *code >= 500,
            SourceError::Provider { .. } | SourceError::Malformed(_) => false,
        }
    }

    /// Error for a non-success response.
    ///
    /// A 429 becomes `RateLimited`, carrying the `Retry-After` header or
    /// `fallback` when the header is missing or unparseable.
    pub(crate) fn from_status(
        status: StatusCode,
        headers: &HeaderMap,
        fallback: Option<Duration>,
    ) -> Self {
        if status == StatusCode::TOO_MANY_REQUESTS {
            SourceError::RateLimited {
                retry_after: retry_after(headers).or(fallback),
            }
        } else {
            SourceError::Status(status.as_u16())
        }
    }
}

/// Seconds from a `Retry-After` header
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let secs: u64 = headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()?;
    Some(Duration::from_secs(secs))
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SourceError::Malformed(e.to_string())
        } else if let Some(status) = e.status() {
            SourceError::Status(status.as_u16())
        } else {
            SourceError::Network(e.to_string())
        }
    }
}
