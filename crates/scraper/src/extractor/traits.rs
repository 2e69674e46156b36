//! The Extractor contract (§4.4): polymorphic over listing candidate links
//! and fetching a single article, without ever touching the network
//! directly outside the Orchestrator's compliance-gated fetch primitive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A link discovered on a Source's listing pages, awaiting `evaluate_fetch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateLink {
    pub url: String,
}

/// One successfully fetched and parsed article, not yet persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub url: String,
    pub title: String,
    pub summary: String,
    pub content: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub author: Option<String>,
    pub language: String,
    pub content_hash: String,
    pub word_count: i32,
}

/// Reasons an extraction attempt produced nothing usable (§4.4). The
/// Orchestrator, not the Extractor, decides whether a kind is retryable.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum ExtractionFailure {
    #[error("no matching selector for article body")]
    SelectorNotFound,
    #[error("page requires client-side rendering")]
    JavascriptRequired,
    #[error("article discarded: no medical keyword match")]
    NonMedical,
    #[error("malformed HTML: {0}")]
    MalformedHtml(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}")]
    Http {
        status: u16,
        /// Seconds from a `Retry-After` header on a 429/503 response, if any.
        retry_after_seconds: Option<u64>,
    },
}

impl ExtractionFailure {
    /// Transient failures the Orchestrator's retry policy (§4.5) applies to;
    /// everything else is a non-transient skip.
    pub fn is_transient(&self) -> bool {
        match self {
            ExtractionFailure::Network(_) => true,
            ExtractionFailure::Http { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }

    /// The `Retry-After` delay to honor instead of the default exponential
    /// backoff, when the failed response carried one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ExtractionFailure::Http { retry_after_seconds: Some(s), .. } => Some(Duration::from_secs(*s)),
            _ => None,
        }
    }
}

pub type ExtractResult<T> = Result<T, ExtractionFailure>;

/// One concrete per-domain (or generic fallback) extraction strategy. Both
/// methods are synchronous — they operate on HTML already fetched through
/// the Orchestrator's compliance-gated primitive, never reaching the network
/// themselves.
pub trait Extractor: Send + Sync {
    /// True if this extractor knows how to handle pages at `base_url`.
    fn can_handle(&self, base_url: &str) -> bool;

    /// Lists candidate article links from the source's listing pages, given
    /// already-fetched listing HTML (fetching itself goes through the
    /// Orchestrator's compliance-gated primitive, never direct from here).
    fn list_articles(&self, listing_html: &str, base_url: &str) -> ExtractResult<Vec<CandidateLink>>;

    /// Parses one article page's HTML into an `ArticleRecord`, applying the
    /// medical-relevance content filter (§4.4) before returning.
    fn parse_article(&self, html: &str, url: &str) -> ExtractResult<ArticleRecord>;
}
