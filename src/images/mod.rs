//! Guaranteeing an image for every article.
//!
//! [`ImageResolver::resolve`] walks a fixed ladder and stops at the first rung
//! that produces a file:
//!
//! 1. the per-run [`ImageCache`]
//! 2. the listing's own image URL (`news_<key>.png`)
//! 3. an image found on the article page (`scraped_<key>.png`)
//! 4. a rendered placeholder card (`generated_<hash>.png`, or `simple_<hash>.png`)
//!
//! Every failure before the placeholder is logged and skipped.

pub mod page;
pub mod placeholder;
pub mod process;

use crate::error::PipelineError;
use crate::http::{fetch_bytes, fetch_text};
use crate::models::Category;
use crate::utils::{is_http_url, short_hash, truncate_for_log};
use placeholder::PlaceholderGenerator;
use reqwest::Client;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Content key → local image path, for the lifetime of one run.
#[derive(Debug, Default)]
pub struct ImageCache {
    entries: Mutex<HashMap<String, String>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    /// Record `path` for `key` unless another path got there first.
    /// Returns whichever path is now cached.
    pub fn commit(&self, key: &str, path: String) -> String {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(key.to_string())
            .or_insert(path)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cache key for an article: its image URL, or the article URL when the
/// listing had no image.
pub fn cache_key(image_url: &str, article_url: &str) -> String {
    if image_url.is_empty() {
        short_hash(article_url)
    } else {
        short_hash(image_url)
    }
}

pub struct ImageResolver {
    client: Client,
    cache: ImageCache,
    images_dir: PathBuf,
    timeout: Duration,
    placeholder: PlaceholderGenerator,
}

impl ImageResolver {
    pub fn new(client: Client, images_dir: impl Into<PathBuf>, timeout: Duration, placeholder: PlaceholderGenerator) -> Self {
        Self {
            client,
            cache: ImageCache::new(),
            images_dir: images_dir.into(),
            timeout,
            placeholder,
        }
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    /// Return a local image path for the article. Never empty.
    ///
    /// # Errors
    ///
    /// Only [`PipelineError::FatalIo`], when even the flat placeholder
    /// cannot be written.
    #[instrument(level = "debug", skip_all, fields(headline = %truncate_for_log(headline, 60)))]
    pub async fn resolve(
        &self,
        image_url: &str,
        article_url: &str,
        headline: &str,
        category: Category,
        source: &str,
    ) -> Result<String, PipelineError> {
        let key = cache_key(image_url, article_url);
        if let Some(path) = self.cache.get(&key) {
            debug!(%key, %path, "Image cache hit");
            return Ok(path);
        }

        if is_http_url(image_url) {
            let target = self.images_dir.join(format!("news_{key}.png"));
            match self.download_to(image_url, &target).await {
                Ok(path) => {
                    debug!(%path, "Downloaded listing image");
                    return Ok(self.cache.commit(&key, path));
                }
                Err(e) => warn!(error = %e, "Listing image unusable; trying article page"),
            }
        }

        if is_http_url(article_url) {
            let target = self.images_dir.join(format!("scraped_{key}.png"));
            match self.scrape_to(article_url, &target).await {
                Ok(path) => {
                    info!(%path, "Used image from article page");
                    return Ok(self.cache.commit(&key, path));
                }
                Err(e) => warn!(error = %e, "No usable image on article page; generating placeholder"),
            }
        }

        let path = self.placeholder.generate(headline, category, source).await?;
        Ok(self.cache.commit(&key, path))
    }

    async fn download_to(&self, url: &str, target: &Path) -> Result<String, PipelineError> {
        let bytes = fetch_bytes(&self.client, url, self.timeout).await?;
        let img = process::normalize(&bytes).map_err(|source| PipelineError::Decode {
            url: url.to_string(),
            source,
        })?;
        process::save_png(&img, target).await?;
        Ok(target.display().to_string())
    }

    async fn scrape_to(&self, article_url: &str, target: &Path) -> Result<String, PipelineError> {
        let html = fetch_text(&self.client, article_url, self.timeout).await?;
        let (candidate, strategy) = page::find_article_image(&html, article_url)
            .ok_or_else(|| PipelineError::parse("article page", "no image candidate"))?;
        debug!(?strategy, %candidate, "Article page image candidate");
        self.download_to(&candidate, target).await
    }
}
