//! Data models for normalized headlines and the cached result set.
//!
//! This module defines the core data structures used throughout the application:
//! - [`NewsRecord`]: One normalized headline, independent of upstream origin
//! - [`NewsCategory`]: The two news segments served by this application
//! - [`CacheSnapshot`]: The consolidated result set held by the cache store
//!
//! Every upstream, whatever its shape, is projected into [`NewsRecord`] by the
//! normalizer before any other component sees it. The `lastUpdated` field uses
//! camelCase to match the JSON shape consumed by downstream clients, hence the
//! serde rename.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single normalized news headline.
///
/// # Fields
///
/// * `date` - Display date in `DD-MM-YYYY HH:MM` format, possibly empty when
///   the upstream supplied no usable date
/// * `headline` - The headline text; guaranteed non-empty after normalization
/// * `date_raw` - The upstream's original date value, kept only for the
///   best-effort ordering step and never serialized to clients
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewsRecord {
    /// Display date, canonical format, possibly empty.
    pub date: String,
    /// The headline text.
    pub headline: String,
    /// Opaque original date value as received from the upstream.
    #[serde(skip)]
    pub date_raw: Option<String>,
}

impl NewsRecord {
    /// Build a record, returning `None` when the headline is empty after trimming.
    ///
    /// This is the single place where the non-empty-headline invariant is
    /// enforced; all fetchers construct records through it.
    pub fn new(headline: &str, date: String, date_raw: Option<String>) -> Option<Self> {
        let headline = headline.trim();
        if headline.is_empty() {
            return None;
        }
        Some(Self {
            date,
            headline: headline.to_string(),
            date_raw,
        })
    }
}

/// The news segments this application aggregates.
///
/// Each category carries its own fallback chain and its own result-count cap;
/// the categories are fetched independently so one segment's upstream trouble
/// never affects the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsCategory {
    /// General market news.
    General,
    /// Futures and options news.
    Derivative,
}

impl NewsCategory {
    /// Lowercase name used in logs and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::General => "general",
            NewsCategory::Derivative => "derivative",
        }
    }
}

impl std::fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The consolidated result set served to clients.
///
/// Owned exclusively by the cache store and replaced wholesale at the end of
/// each refresh cycle; readers always get a complete, consistent copy. The
/// initial snapshot has both lists empty and no `lastUpdated` value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CacheSnapshot {
    /// General market headlines, newest first (best effort).
    pub general: Vec<NewsRecord>,
    /// Derivatives headlines, newest first (best effort).
    pub derivative: Vec<NewsRecord>,
    /// When the snapshot was assembled; absent until the first refresh lands.
    #[serde(rename = "lastUpdated")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl CacheSnapshot {
    /// True when neither category holds any records.
    pub fn is_empty(&self) -> bool {
        self.general.is_empty() && self.derivative.is_empty()
    }
}
