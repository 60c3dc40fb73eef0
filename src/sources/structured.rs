//! Structured-data endpoint fetcher.
//!
//! These endpoints are the internal JSON feeds behind the upstream's own
//! frontend, so the request carries the headers a browser XHR would: an
//! `X-Requested-With` marker, a JSON-leaning `Accept`, and a browser-like
//! user agent. Without them some deployments answer with an HTML shell page.
//!
//! # Shape Guard
//!
//! The same deployments serve HTML error pages with a 200 status, so a
//! successful HTTP call is not trusted until the body's first non-whitespace
//! character is inspected. A leading `<` fails the strategy immediately
//! instead of feeding markup to the JSON parser.

use super::FetchError;
use crate::models::NewsRecord;
use crate::normalize;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, instrument};

/// One structured JSON upstream.
pub struct StructuredSource {
    url: String,
    user_agent: String,
}

impl StructuredSource {
    pub fn new(url: String, user_agent: String) -> Self {
        Self { url, user_agent }
    }

    /// Fetch and normalize this upstream once.
    ///
    /// # Errors
    ///
    /// * [`FetchError::Transport`] on any network-level failure
    /// * [`FetchError::UpstreamShape`] when the body opens with markup
    /// * [`FetchError::MalformedPayload`] when the body is not valid JSON
    #[instrument(level = "info", skip_all, fields(url = %self.url))]
    pub async fn attempt(&self, client: &Client) -> Result<Vec<NewsRecord>, FetchError> {
        let body = client
            .get(&self.url)
            .header("X-Requested-With", "XMLHttpRequest")
            .header("Accept", "application/json, text/javascript, */*; q=0.01")
            .header("User-Agent", &self.user_agent)
            .send()
            .await?
            .text()
            .await?;

        let records = parse_structured_body(&body)?;
        info!(count = records.len(), "Structured endpoint yielded records");
        Ok(records)
    }
}

/// Classify and normalize a structured response body.
///
/// Split out of the fetch so the guard and parse behavior are testable
/// without a network.
pub fn parse_structured_body(body: &str) -> Result<Vec<NewsRecord>, FetchError> {
    if body.trim_start().starts_with('<') {
        debug!("Body opens with markup; rejecting as an HTML error page");
        return Err(FetchError::UpstreamShape);
    }
    let payload: Value = serde_json::from_str(body)?;
    Ok(normalize::normalize_payload(&payload))
}
