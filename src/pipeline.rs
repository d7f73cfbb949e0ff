//! Run orchestration.
//!
//! One run visits every extractor in order, enriches each candidate
//! (filter, categorize, tag, resolve an image), removes duplicates across
//! sources and reports what it found. Sources and the articles within them
//! are handled one at a time.

use crate::classify::{categorize, tag_neighbourhood};
use crate::dedup::dedupe;
use crate::error::PipelineError;
use crate::images::ImageResolver;
use crate::models::{EnrichedArticle, RawArticle, RunSummary};
use crate::scrapers::Extractor;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

pub struct Pipeline {
    client: Client,
    extractors: Vec<Box<dyn Extractor>>,
    resolver: ImageResolver,
    listing_timeout: Duration,
    source_pause: Duration,
}

impl Pipeline {
    pub fn new(
        client: Client,
        extractors: Vec<Box<dyn Extractor>>,
        resolver: ImageResolver,
        listing_timeout: Duration,
        source_pause: Duration,
    ) -> Self {
        Self {
            client,
            extractors,
            resolver,
            listing_timeout,
            source_pause,
        }
    }

    /// Scrape all sources and return the deduplicated feed with its summary.
    ///
    /// Never fails. Per-source and per-article problems are logged and the
    /// affected items are left out.
    #[instrument(level = "info", skip_all, fields(sources = self.extractors.len()))]
    pub async fn run(&self) -> (Vec<EnrichedArticle>, RunSummary) {
        let mut enriched = Vec::new();

        for extractor in &self.extractors {
            let source = extractor.source();
            info!(%source, "Scraping source");
            let raw = extractor.extract(&self.client, self.listing_timeout).await;

            let mut kept = 0usize;
            for article in raw {
                match self.enrich(article).await {
                    Ok(Some(a)) => {
                        kept += 1;
                        enriched.push(a);
                    }
                    Ok(None) => {}
                    Err(e) if e.is_fatal() => {
                        error!(%source, error = %e, fatal = true, "Could not write any image; dropping article");
                    }
                    Err(e) => warn!(%source, error = %e, "Failed to enrich article; skipping"),
                }
            }
            info!(%source, kept, "Finished source");

            if !self.source_pause.is_zero() {
                debug!(pause = ?self.source_pause, "Pausing between sources");
                tokio::time::sleep(self.source_pause).await;
            }
        }

        let articles = dedupe(enriched);
        let summary = RunSummary::from_articles(&articles);
        info!(
            total = summary.total,
            with_images = summary.with_images,
            cached_images = self.resolver.cache().len(),
            by_source = ?summary.by_source,
            by_category = ?summary.by_category,
            "Run complete"
        );
        (articles, summary)
    }

    /// Turn one candidate into a feed entry. `Ok(None)` means the headline
    /// was filtered out.
    async fn enrich(&self, raw: RawArticle) -> Result<Option<EnrichedArticle>, PipelineError> {
        let headline = raw.title.trim();
        if !raw.source.accepts_headline(headline) {
            debug!(source = %raw.source, %headline, "Rejected headline");
            return Ok(None);
        }
        let description = match raw.description.trim() {
            "" => headline,
            d => d,
        };

        let category = categorize(headline, description);
        let neighbourhood = tag_neighbourhood(headline, description);
        let source_name = raw.source.display_name();
        let image_path = self
            .resolver
            .resolve(&raw.image_url, &raw.url, headline, category, source_name)
            .await?;

        Ok(Some(EnrichedArticle {
            headline: headline.to_string(),
            description: description.to_string(),
            source: source_name.to_string(),
            url: raw.url,
            image_path,
            neighbourhood: neighbourhood.to_string(),
            category,
        }))
    }
}
