//! CBC Toronto listing scraper.
//!
//! Reads the [CBC Toronto](https://www.cbc.ca/news/canada/toronto) section
//! front. Story cards link to `/news/canada/toronto/<slug>-<id>`; the card
//! headline is usually an `h3`, sometimes only a `span`.

use super::{Candidates, Extractor, ImageAttr, SiteUrls, description_in, enclosing_block, first_text, image_in};
use crate::models::{RawArticle, Source};
use crate::utils::absolutize_url;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

static LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static HEADINGS: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2, h3, h4, span").unwrap());

const SECTION_PATH: &str = "/news/canada/toronto";
const MAX_LINKS: usize = 50;

pub struct CbcToronto {
    urls: SiteUrls,
}

impl CbcToronto {
    pub fn new() -> Self {
        Self::with_urls(SiteUrls::for_source(Source::CbcToronto))
    }

    pub fn with_urls(urls: SiteUrls) -> Self {
        Self { urls }
    }
}

/// Story links sit below the section path; the section front itself does not count.
fn is_story_href(href: &str) -> bool {
    let section_with_slash = format!("{SECTION_PATH}/");
    href.contains(&section_with_slash) && !href.trim_end_matches('/').ends_with(SECTION_PATH)
}

#[async_trait]
impl Extractor for CbcToronto {
    fn source(&self) -> Source {
        Source::CbcToronto
    }

    fn listing_url(&self) -> &str {
        &self.urls.listing
    }

    fn parse_listing(&self, html: &str) -> Vec<RawArticle> {
        let document = Html::parse_document(html);
        let mut candidates = Candidates::new(Source::CbcToronto);

        let story_links = document
            .select(&LINKS)
            .filter(|a| a.value().attr("href").is_some_and(is_story_href))
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
        debug!(count = articles.len(), "Parsed CBC Toronto listing");
        articles
    }
}
