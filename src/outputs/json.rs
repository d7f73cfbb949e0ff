//! JSON feed output.
//!
//! Writes a [`FeedDocument`] as pretty-printed JSON to
//! `{output_dir}/toronto_news_latest.json`:
//!
//! ```text
//! {
//!   "generated_at": "2025-01-14T09:00:03.120-05:00",
//!   "total_articles": 42,
//!   "articles": [ { "headline": ..., "image": "images/news_3f2a9c0d1b7e.png", ... } ]
//! }
//! ```

use super::FEED_STEM;
use crate::models::FeedDocument;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialize `feed` and write it into `output_dir`, returning the file path.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_feed(feed: &FeedDocument, output_dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(feed)?;

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(error = %e, "Failed to create output dir");
        return Err(e.into());
    }

    let path = output_dir.join(format!("{FEED_STEM}_latest.json"));
    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = feed.total_articles, "Wrote JSON feed");

    Ok(path)
}
