//! # Market Headlines
//!
//! A fetch-normalize-cache pipeline for short-lived financial news headlines.
//! Two segments (general market news and derivatives news) are pulled from
//! upstream sources with per-category fallback chains, normalized into one
//! canonical record shape, and held in an in-memory cache that clients read
//! on demand.
//!
//! ## Features
//!
//! - Structured JSON feeds as primary sources, listing-page scraping as
//!   fallback, and a coarse anchor-text sweep as the last resort
//! - Tolerant normalization of heterogeneous upstream record shapes
//! - Serve-stale caching: a failed refresh never destroys served data
//! - Background refresh on a fixed interval, plus a TTL-gated one-shot mode
//!
//! ## Usage
//!
//! ```sh
//! market_headlines -c config.yaml -j ./public/api
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Scheduling**: Refresh immediately at startup, then on a fixed interval
//! 2. **Fetching**: Walk each category's fallback chain until a source yields
//! 3. **Normalizing**: Project untyped upstream records into canonical ones
//! 4. **Serving**: Swap the assembled snapshot into the cache; readers copy it

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cache;
mod cli;
mod config;
mod dates;
mod models;
mod normalize;
mod orchestrator;
mod outputs;
mod scheduler;
mod sources;

use cli::Cli;
use config::{AppConfig, CategoryConfig};
use models::NewsCategory;
use orchestrator::{CategoryPlan, Orchestrator};
use scheduler::{NewsHub, RefreshScheduler};
use sources::{AnchorSource, MarkupSource, SourceStrategy, StructuredSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("market_headlines starting up");

    let args = Cli::parse();
    debug!(?args.config, ?args.json_output_dir, once = args.once, "Parsed CLI arguments");

    let mut config = config::load_config(args.config.as_deref())?;
    if let Some(interval_mins) = args.interval_mins {
        config.refresh_interval_mins = interval_mins;
        config::validate(&config)?;
    }

    let hub = Arc::new(build_hub(&config)?);

    if args.once {
        let ttl = Duration::from_secs(config.query_ttl_secs);
        let snapshot = hub.fresh_snapshot(ttl).await;
        if let Some(dir) = &args.json_output_dir {
            outputs::json::write_snapshot(&snapshot, dir).await?;
        }
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let interval = Duration::from_secs(config.refresh_interval_mins * 60);
    let refresh_scheduler = RefreshScheduler::new(Arc::clone(&hub), interval, args.json_output_dir);
    info!(
        interval_mins = config.refresh_interval_mins,
        "Starting background refresh loop"
    );

    tokio::select! {
        _ = refresh_scheduler.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received; shutting down");
        }
    }

    Ok(())
}

/// Wire the fallback chains from configuration.
///
/// Both categories run structured-then-markup; a category with a configured
/// fallback URL also gets the degraded anchor sweep as its last step.
fn build_hub(config: &AppConfig) -> Result<NewsHub, Box<dyn Error>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http.timeout_secs))
        .build()?;

    let general = CategoryPlan {
        category: NewsCategory::General,
        cap: config.general.cap,
        chain: build_chain(&config.general, &config.http),
    };
    let derivative = CategoryPlan {
        category: NewsCategory::Derivative,
        cap: config.derivative.cap,
        chain: build_chain(&config.derivative, &config.http),
    };

    Ok(NewsHub::new(Orchestrator::new(client, general, derivative)))
}

fn build_chain(category: &CategoryConfig, http: &config::HttpConfig) -> Vec<SourceStrategy> {
    let mut chain = vec![
        SourceStrategy::Structured(StructuredSource::new(
            category.structured_url.clone(),
            http.browser_user_agent.clone(),
        )),
        SourceStrategy::Markup(MarkupSource::new(
            category.markup_url.clone(),
            http.plain_user_agent.clone(),
        )),
    ];
    if let Some(fallback_url) = &category.fallback_url {
        chain.push(SourceStrategy::AnchorFallback(AnchorSource::new(
            fallback_url.clone(),
            http.plain_user_agent.clone(),
        )));
    }
    chain
}
