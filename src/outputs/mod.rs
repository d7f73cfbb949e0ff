//! Feed files consumed by the static site.
//!
//! # Submodules
//!
//! - [`json`]: the feed document with generation timestamp and count
//! - [`csv_feed`]: the same articles as a flat table, plus an optional
//!   timestamped archive copy
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── toronto_news_latest.json
//! └── toronto_news_latest.csv
//!
//! archive_dir/                        # only when configured
//! ├── toronto_news_20250114_0900.csv
//! └── toronto_news_20250114_1000.csv
//! ```
//!
//! Both latest files are rewritten on every run, including runs that found
//! nothing.

pub mod csv_feed;
pub mod json;

pub const FEED_STEM: &str = "toronto_news";
