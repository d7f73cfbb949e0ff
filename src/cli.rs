//! Command-line interface definitions for the Toronto news scraper.
//!
//! Every option is optional. Anything left unset falls back to the YAML
//! settings file (when `--config` is given) and then to built-in defaults;
//! see [`crate::config::Settings`].

use clap::Parser;
use std::path::PathBuf;

/// Scrape Toronto news sites and write the latest feed.
///
/// # Examples
///
/// ```sh
/// # Write toronto_news_latest.{json,csv} and images/ into ./public
/// toronto_news -o ./public -i ./public/images
///
/// # Keep timestamped CSV copies and use a specific font for placeholders
/// toronto_news -o ./public -a ./archive --font /usr/share/fonts/Inter-Bold.ttf
///
/// # Settings from a file, with one override
/// toronto_news -c scraper.yaml --source-pause 5
/// ```
#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory for toronto_news_latest.json and toronto_news_latest.csv
    #[arg(short, long, env = "TORONTO_NEWS_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory for downloaded and generated images
    #[arg(short, long, env = "TORONTO_NEWS_IMAGES_DIR")]
    pub images_dir: Option<PathBuf>,

    /// Also write a timestamped CSV copy into this directory
    #[arg(short, long)]
    pub archive_dir: Option<PathBuf>,

    /// Optional path to a YAML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Timeout for listing page requests, in seconds
    #[arg(long)]
    pub listing_timeout: Option<u64>,

    /// Timeout for image and article page requests, in seconds
    #[arg(long)]
    pub image_timeout: Option<u64>,

    /// Pause after each source, in seconds
    #[arg(long)]
    pub source_pause: Option<u64>,

    /// Font file to try before the system fonts (repeatable)
    #[arg(long = "font")]
    pub fonts: Vec<PathBuf>,
}
