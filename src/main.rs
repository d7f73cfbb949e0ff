//! # Toronto News
//!
//! Scrapes the Toronto sections of four local outlets, makes sure every story
//! has a picture, tags it with a neighbourhood and a topic, and writes a
//! deduplicated feed for a static news page.
//!
//! ## Sources
//!
//! CP24, CBC Toronto, Global News and CityNews, always in that order. When the
//! same story appears on several sites, the earliest source wins.
//!
//! ## Usage
//!
//! ```sh
//! toronto_news -o ./public -i ./public/images
//! ```
//!
//! ## Architecture
//!
//! 1. **Extraction**: each site's listing page becomes up to 15 candidates
//! 2. **Enrichment**: headline filter, topic, neighbourhood, image
//!    (listing image, article page image, or a generated card)
//! 3. **Dedup**: normalized headline prefixes, first seen wins
//! 4. **Output**: `toronto_news_latest.json`, `toronto_news_latest.csv`, and
//!    an optional timestamped CSV archive

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod classify;
mod cli;
mod config;
mod dedup;
mod error;
mod http;
mod images;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use config::Settings;
use images::ImageResolver;
use images::placeholder::PlaceholderGenerator;
use images::placeholder::font::SystemFonts;
use models::FeedDocument;
use outputs::{csv_feed, json};
use pipeline::Pipeline;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
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

    let start_time = std::time::Instant::now();
    info!("toronto_news starting up");

    let args = Cli::parse();
    let settings = Settings::resolve(&args).await?;
    debug!(?settings, "Resolved settings");

    // Fail early rather than scrape for minutes and lose the results
    let mut required = vec![&settings.output_dir, &settings.images_dir];
    required.extend(settings.archive_dir.as_ref());
    for dir in required {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir.display(),
                error = %e,
                "Directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Build the pipeline ----
    let client = http::build_client()?;
    let fonts = SystemFonts::new(settings.font_paths.clone());
    let placeholder = PlaceholderGenerator::new(&settings.images_dir, &fonts);
    info!(bitmap_font = placeholder.uses_bitmap_font(), "Placeholder generator ready");

    let resolver = ImageResolver::new(
        client.clone(),
        &settings.images_dir,
        settings.image_timeout(),
        placeholder,
    );
    let pipeline = Pipeline::new(
        client,
        scrapers::default_extractors(),
        resolver,
        settings.listing_timeout(),
        settings.source_pause(),
    );

    // ---- Run ----
    let (articles, summary) = pipeline.run().await;
    let feed = FeedDocument::new(articles);

    // ---- Outputs ----
    if let Err(e) = json::write_feed(&feed, &settings.output_dir).await {
        error!(error = %e, "Failed to write JSON feed");
    }
    if let Err(e) = csv_feed::write_latest(&feed.articles, &settings.output_dir).await {
        error!(error = %e, "Failed to write CSV feed");
    }
    if let Some(archive_dir) = &settings.archive_dir {
        if let Err(e) = csv_feed::write_archive(&feed.articles, archive_dir, Local::now()).await {
            error!(error = %e, "Failed to write archive CSV");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        articles = summary.total,
        "Execution complete"
    );

    Ok(())
}
