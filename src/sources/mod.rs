//! Upstream source fetchers and the strategy contract the orchestrator runs.
//!
//! Each fetcher follows the same pattern: one HTTP GET, body read as text,
//! extraction into normalized [`NewsRecord`](crate::models::NewsRecord)s.
//! Failed fetches surface as [`FetchError`] and are handled entirely by the
//! orchestrator; nothing here retries or panics on bad upstream data.
//!
//! # Strategies
//!
//! | Strategy | Module | Method | Notes |
//! |----------|--------|--------|-------|
//! | Structured endpoint | [`structured`] | JSON over XHR-style GET | Guards against HTML error pages served as 200 OK |
//! | Markup listing | [`markup`] | CSS-selector extraction | Zero matches is a valid empty result |
//! | Anchor text | [`markup`] | Coarse anchor-tag sweep | Ultimate fallback only, capped and length-filtered |

use crate::models::NewsRecord;
use reqwest::Client;
use thiserror::Error;

pub mod markup;
pub mod structured;

pub use markup::{AnchorSource, MarkupSource};
pub use structured::StructuredSource;

/// Why a single fetch strategy produced nothing.
///
/// An empty extraction is not represented here: a strategy that reached its
/// upstream and found no records returns `Ok(vec![])`.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network, DNS, or timeout failure from the transport layer.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered 200 OK with markup where structured data was
    /// expected, which is how these upstreams serve error pages.
    #[error("upstream returned markup where structured data was expected")]
    UpstreamShape,

    /// The body looked structured but did not parse.
    #[error("malformed structured payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

/// One step in a category's fallback chain.
///
/// The orchestrator only ever sees this uniform shape; which concrete fetcher
/// backs a step is wiring decided at startup.
pub enum SourceStrategy {
    /// JSON endpoint fetch.
    Structured(StructuredSource),
    /// Selector-driven markup extraction.
    Markup(MarkupSource),
    /// Degraded anchor-text sweep, the ultimate fallback.
    AnchorFallback(AnchorSource),
    #[cfg(test)]
    Canned(testing::CannedSource),
}

impl SourceStrategy {
    /// Short name used in per-strategy logs.
    pub fn name(&self) -> &'static str {
        match self {
            SourceStrategy::Structured(_) => "structured",
            SourceStrategy::Markup(_) => "markup",
            SourceStrategy::AnchorFallback(_) => "anchor_fallback",
            #[cfg(test)]
            SourceStrategy::Canned(_) => "canned",
        }
    }

    /// Run this strategy once. Never retries; the chain policy is the
    /// orchestrator's business.
    pub async fn attempt(&self, client: &Client) -> Result<Vec<NewsRecord>, FetchError> {
        match self {
            SourceStrategy::Structured(source) => source.attempt(client).await,
            SourceStrategy::Markup(source) => source.attempt(client).await,
            SourceStrategy::AnchorFallback(source) => source.attempt(client).await,
            #[cfg(test)]
            SourceStrategy::Canned(source) => source.attempt().await,
        }
    }
}
