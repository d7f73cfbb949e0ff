//! CSV feed output.
//!
//! Columns follow [`EnrichedArticle`] field order. The header row is always
//! written, so an empty run still produces a parseable file.

use super::FEED_STEM;
use crate::models::EnrichedArticle;
use chrono::{DateTime, Local};
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

pub const HEADER: [&str; 7] = [
    "headline",
    "description",
    "source",
    "url",
    "image",
    "neighbourhood",
    "category",
];

/// Render `articles` as CSV bytes, header first.
pub fn to_csv(articles: &[EnrichedArticle]) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for article in articles {
        writer.serialize(article)?;
    }
    Ok(writer.into_inner()?)
}

/// Write `{output_dir}/toronto_news_latest.csv`.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_latest(articles: &[EnrichedArticle], output_dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let path = output_dir.join(format!("{FEED_STEM}_latest.csv"));
    write_to(articles, output_dir, &path).await?;
    Ok(path)
}

/// Write a timestamped copy, e.g. `toronto_news_20250114_0900.csv`.
#[instrument(level = "info", skip_all, fields(archive_dir = %archive_dir.display()))]
pub async fn write_archive(
    articles: &[EnrichedArticle],
    archive_dir: &Path,
    at: DateTime<Local>,
) -> Result<PathBuf, Box<dyn Error>> {
    let path = archive_dir.join(archive_file_name(at));
    write_to(articles, archive_dir, &path).await?;
    Ok(path)
}

pub fn archive_file_name(at: DateTime<Local>) -> String {
    format!("{FEED_STEM}_{}.csv", at.format("%Y%m%d_%H%M"))
}

async fn write_to(articles: &[EnrichedArticle], dir: &Path, path: &Path) -> Result<(), Box<dyn Error>> {
    let bytes = to_csv(articles)?;
    fs::create_dir_all(dir).await?;
    fs::write(path, bytes).await?;
    info!(path = %path.display(), rows = articles.len(), "Wrote CSV feed");
    Ok(())
}
