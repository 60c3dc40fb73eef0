//! Per-category fallback orchestration.
//!
//! Each category owns an ordered chain of fetch strategies. The orchestrator
//! walks the chain until a strategy yields records, containing every failure
//! along the way; an exhausted chain means an empty category this cycle, never
//! an error. The two categories are fetched concurrently and are fully
//! isolated from each other.
//!
//! # Ordering
//!
//! Upstream order is assumed newest-first and preferred. When records carry a
//! raw date, the dated subset is re-sorted date-descending and the undated
//! subset is appended in native order. With mixed date availability this can
//! rank undated fresh stories below dated old ones; the original feed behaves
//! the same way and the intent for that case is ambiguous, so the re-sort
//! stays best-effort.

use crate::dates;
use crate::models::{CacheSnapshot, NewsCategory, NewsRecord};
use crate::sources::SourceStrategy;
use chrono::Utc;
use itertools::Itertools;
use reqwest::Client;
use std::cmp::Reverse;
use tracing::{debug, info, instrument, warn};

/// One category's fallback chain and result cap.
pub struct CategoryPlan {
    pub category: NewsCategory,
    pub cap: usize,
    pub chain: Vec<SourceStrategy>,
}

/// Runs both category plans against a shared HTTP client.
pub struct Orchestrator {
    client: Client,
    general: CategoryPlan,
    derivative: CategoryPlan,
}

impl Orchestrator {
    pub fn new(client: Client, general: CategoryPlan, derivative: CategoryPlan) -> Self {
        Self {
            client,
            general,
            derivative,
        }
    }

    /// Run one full refresh cycle and assemble a fresh snapshot.
    ///
    /// Never fails: each category independently degrades to an empty list
    /// when its whole chain comes up dry.
    #[instrument(level = "info", skip_all)]
    pub async fn assemble(&self) -> CacheSnapshot {
        let (general, derivative) = futures::join!(
            fetch_category(&self.client, &self.general),
            fetch_category(&self.client, &self.derivative),
        );

        info!(
            general = general.len(),
            derivative = derivative.len(),
            "Assembled refresh cycle"
        );

        CacheSnapshot {
            general,
            derivative,
            last_updated: Some(Utc::now()),
        }
    }
}

/// Walk one category's chain until a strategy yields records.
///
/// Failures and empty yields both fall through to the next strategy; only the
/// first strategy that produces records is used, and it is never retried.
#[instrument(level = "info", skip_all, fields(category = %plan.category))]
async fn fetch_category(client: &Client, plan: &CategoryPlan) -> Vec<NewsRecord> {
    for strategy in &plan.chain {
        match strategy.attempt(client).await {
            Ok(records) if records.is_empty() => {
                debug!(
                    strategy = strategy.name(),
                    "Strategy produced nothing; trying the next"
                );
            }
            Ok(records) => {
                info!(
                    strategy = strategy.name(),
                    count = records.len(),
                    "Strategy succeeded"
                );
                return order_and_cap(records, plan.cap);
            }
            Err(e) => {
                warn!(
                    strategy = strategy.name(),
                    error = %e,
                    "Strategy failed; trying the next"
                );
            }
        }
    }

    warn!("Every strategy exhausted; category is empty this cycle");
    Vec::new()
}

/// Deduplicate, order, and truncate one category's records.
///
/// Duplicate headlines keep their first (newest-position) occurrence. The
/// dated subset sorts date-descending with a stable sort, undated records
/// follow in native order, and the cap truncates the tail.
pub fn order_and_cap(records: Vec<NewsRecord>, cap: usize) -> Vec<NewsRecord> {
    let deduped: Vec<NewsRecord> = records
        .into_iter()
        .unique_by(|record| record.headline.clone())
        .collect();

    let (mut dated, undated): (Vec<_>, Vec<_>) = deduped
        .into_iter()
        .partition(|record| sort_key(record).is_some());

    dated.sort_by_key(|record| Reverse(sort_key(record)));
    dated.extend(undated);
    dated.truncate(cap);
    dated
}

fn sort_key(record: &NewsRecord) -> Option<chrono::NaiveDateTime> {
    record.date_raw.as_deref().and_then(dates::parse_flexible)
}
