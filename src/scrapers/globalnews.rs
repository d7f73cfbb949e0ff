//! Global News Toronto listing scraper.
//!
//! The [Global News](https://globalnews.ca/toronto) front page has no stable
//! link pattern, so this extractor works block-first: it walks card-like
//! elements, takes each one's first link, and keeps it if the link points at a
//! Toronto story. Images are lazy-loaded, so `data-src` is preferred.

use super::{Candidates, Extractor, ImageAttr, SiteUrls, description_in, first_text, image_in};
use crate::models::{RawArticle, Source};
use crate::utils::absolutize_url;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

static BLOCKS: Lazy<Selector> = Lazy::new(|| Selector::parse("article, li, div").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static HEADINGS: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2, h3, h4, h5").unwrap());

const MAX_BLOCKS: usize = 100;

pub struct GlobalNews {
    urls: SiteUrls,
}

impl GlobalNews {
    pub fn new() -> Self {
        Self::with_urls(SiteUrls::for_source(Source::GlobalNews))
    }

    pub fn with_urls(urls: SiteUrls) -> Self {
        Self { urls }
    }
}

fn is_story_href(href: &str) -> bool {
    href.contains("/toronto/") || href.contains("globalnews.ca/news/")
}

#[async_trait]
impl Extractor for GlobalNews {
    fn source(&self) -> Source {
        Source::GlobalNews
    }

    fn listing_url(&self) -> &str {
        &self.urls.listing
    }

    fn parse_listing(&self, html: &str) -> Vec<RawArticle> {
        let document = Html::parse_document(html);
        let mut candidates = Candidates::new(Source::GlobalNews);

        for block in document.select(&BLOCKS).take(MAX_BLOCKS) {
            if candidates.is_full() {
                break;
            }
            let Some(href) = block
                .select(&LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
            else {
                continue;
            };
            if !is_story_href(href) {
                continue;
            }
            let Some(url) = absolutize_url(&self.urls.root, href) else {
                continue;
            };
            if candidates.has_seen(&url) {
                continue;
            }
            let Some(title) = first_text(block, &HEADINGS) else {
                continue;
            };

            let image_url = image_in(block, &self.urls.root, ImageAttr::DataSrcFirst);
            let description = description_in(block, &title);
            candidates.offer(title, url, image_url, description);
        }

        let articles = candidates.into_articles();
        debug!(count = articles.len(), "Parsed Global News listing");
        articles
    }
}
