//! CP24 listing scraper.
//!
//! Story links on [CP24](https://www.cp24.com) carry a section and a
//! publication date in the path, e.g.
//! `/local/toronto/2025/01/14/man-charged-after-robbery/`. Anything without
//! that shape (section fronts, video hubs, ads) is ignored.

use super::{Candidates, Extractor, ImageAttr, SiteUrls, description_in, enclosing_block, first_text, image_in};
use crate::models::{RawArticle, Source};
use crate::utils::absolutize_url;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

static LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static HEADINGS: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2, h3, h4").unwrap());
static STORY_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(local|news|weather)/.+/\d{4}/\d{2}/\d{2}/").unwrap());

/// Only the first this-many matching links are considered.
const MAX_LINKS: usize = 50;

pub struct Cp24 {
    urls: SiteUrls,
}

impl Cp24 {
    pub fn new() -> Self {
        Self::with_urls(SiteUrls::for_source(Source::Cp24))
    }

    pub fn with_urls(urls: SiteUrls) -> Self {
        Self { urls }
    }
}

#[async_trait]
impl Extractor for Cp24 {
    fn source(&self) -> Source {
        Source::Cp24
    }

    fn listing_url(&self) -> &str {
        &self.urls.listing
    }

    fn parse_listing(&self, html: &str) -> Vec<RawArticle> {
        let document = Html::parse_document(html);
        let mut candidates = Candidates::new(Source::Cp24);

        let story_links = document
            .select(&LINKS)
            .filter(|a| a.value().attr("href").is_some_and(|h| STORY_PATH.is_match(h)))
            .take(MAX_LINKS);

        for link in story_links {
            if candidates.is_full() {
                break;
            }
            let Some(url) = link
                .value()
                .attr("href")
                .and_then(|h| absolutize_url(&self.urls.root, h))
            else {
                continue;
            };
            if candidates.has_seen(&url) {
                continue;
            }
            // Image-only teaser links have no heading; the text link follows.
            let Some(title) = first_text(link, &HEADINGS) else {
                continue;
            };

            let block = enclosing_block(link, &["article", "div", "li"]);
            let image_url = block
                .map(|b| image_in(b, &self.urls.root, ImageAttr::SrcFirst))
                .unwrap_or_default();
            let description = block.map(|b| description_in(b, &title)).unwrap_or_default();

            candidates.offer(title, url, image_url, description);
        }

        let articles = candidates.into_articles();
        debug!(count = articles.len(), "Parsed CP24 listing");
        articles
    }
}
