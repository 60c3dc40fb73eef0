//! JSON output generation for the query surface.
//!
//! After each completed refresh the daemon serializes the snapshot to
//! `{json_output_dir}/headlines.json`. The file always holds the latest
//! complete snapshot, so a static file server in front of it exposes the
//! query surface with no coupling to this process.
//!
//! # Output Shape
//!
//! ```text
//! {
//!   "general":    [ { "date": "...", "headline": "..." }, ... ],
//!   "derivative": [ { "date": "...", "headline": "..." }, ... ],
//!   "lastUpdated": "2024-01-02T15:04:00Z"
//! }
//! ```

use crate::models::CacheSnapshot;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a [`CacheSnapshot`] to `headlines.json` under the given directory.
///
/// Creates the directory when missing. The write replaces the previous file
/// wholesale, mirroring how the snapshot itself is replaced.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_snapshot(
    snapshot: &CacheSnapshot,
    json_output_dir: &str,
) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string(snapshot)?;

    if let Err(e) = fs::create_dir_all(json_output_dir).await {
        error!(%json_output_dir, error = %e, "Failed to create JSON output dir");
        return Err(e.into());
    }

    let path = format!("{}/headlines.json", json_output_dir.trim_end_matches('/'));
    fs::write(&path, json).await?;
    info!(%path, records = snapshot.general.len() + snapshot.derivative.len(), "Wrote snapshot JSON");

    Ok(())
}
