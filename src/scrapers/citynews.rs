//! CityNews Toronto listing scraper.
//!
//! [CityNews](https://toronto.citynews.ca) story URLs are year-stamped
//! (`/2025/01/14/slug/`) and headlines are often bare link text rather than a
//! heading element, so long link text is accepted as a title.

use super::{
    Candidates, Extractor, ImageAttr, SiteUrls, description_in, element_text, enclosing_block, first_text,
    image_in,
};
use crate::models::{RawArticle, Source};
use crate::utils::absolutize_url;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

static LINKS: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static HEADINGS: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2, h3, h4").unwrap());

const MAX_LINKS: usize = 100;

/// Link text longer than this can stand in for a missing heading.
const MIN_LINK_TEXT_TITLE: usize = 20;

pub struct CityNews {
    urls: SiteUrls,
}

impl CityNews {
    pub fn new() -> Self {
        Self::with_urls(SiteUrls::for_source(Source::CityNews))
    }

    pub fn with_urls(urls: SiteUrls) -> Self {
        Self { urls }
    }
}

fn is_story_href(href: &str) -> bool {
    ["/news/", "/toronto/", "202"].iter().any(|p| href.contains(p))
}

#[async_trait]
impl Extractor for CityNews {
    fn source(&self) -> Source {
        Source::CityNews
    }

    fn listing_url(&self) -> &str {
        &self.urls.listing
    }

    fn parse_listing(&self, html: &str) -> Vec<RawArticle> {
        let document = Html::parse_document(html);
        let mut candidates = Candidates::new(Source::CityNews);

        for link in document.select(&LINKS).take(MAX_LINKS) {
            if candidates.is_full() {
                break;
            }
            let Some(href) = link.value().attr("href").filter(|h| is_story_href(h)) else {
                continue;
            };
            let Some(url) = absolutize_url(&self.urls.root, href) else {
                continue;
            };
            if candidates.has_seen(&url) {
                continue;
            }

            let title = first_text(link, &HEADINGS).or_else(|| {
                let text = element_text(link);
                (text.chars().count() > MIN_LINK_TEXT_TITLE).then_some(text)
            });
            let Some(title) = title else {
                continue;
            };

            let block = enclosing_block(link, &["article", "div"]);
            let image_url = block
                .map(|b| image_in(b, &self.urls.root, ImageAttr::SrcFirst))
                .unwrap_or_default();
            let description = block.map(|b| description_in(b, &title)).unwrap_or_default();

            candidates.offer(title, url, image_url, description);
        }

        let articles = candidates.into_articles();
        debug!(count = articles.len(), "Parsed CityNews listing");
        articles
    }
}
