//! News source extractors.
//!
//! Each submodule turns one outlet's listing page into [`RawArticle`]
//! candidates. Every extractor follows the same two-phase pattern:
//!
//! 1. **Fetching**: download the listing page (bounded timeout, shared client)
//! 2. **Parsing**: walk the markup with site-specific heuristics
//!
//! The parsing half is a pure function of the HTML, so each site's heuristics
//! can be exercised against fixture documents without touching the network.
//!
//! # Supported Sources
//!
//! | Source | Module | Listing page | Candidate links |
//! |--------|--------|--------------|-----------------|
//! | CP24 | [`cp24`] | `www.cp24.com` | date-stamped `/local/`, `/news/`, `/weather/` paths |
//! | CBC Toronto | [`cbc`] | `www.cbc.ca/news/canada/toronto` | `/news/canada/toronto/` paths |
//! | Global News | [`globalnews`] | `globalnews.ca/toronto` | first link of each card block |
//! | CityNews | [`citynews`] | `toronto.citynews.ca` | `/news/`, `/toronto/` or year-stamped paths |
//!
//! # Failure Semantics
//!
//! A failed listing fetch is logged and produces an empty list. One broken
//! source never stops the run.

use crate::http::fetch_text;
use crate::models::{RawArticle, Source};
use crate::utils::absolutize_url;
use async_trait::async_trait;
use itertools::Itertools;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Selector};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

pub mod cbc;
pub mod citynews;
pub mod cp24;
pub mod globalnews;

pub use cbc::CbcToronto;
pub use citynews::CityNews;
pub use cp24::Cp24;
pub use globalnews::GlobalNews;

/// Upper bound on candidates returned by one extractor call.
pub const MAX_ARTICLES_PER_SOURCE: usize = 15;

/// A single news source.
///
/// Implementors provide the listing URL and a pure HTML parser; the provided
/// [`Extractor::extract`] handles fetching, error recovery and the output cap.
#[async_trait]
pub trait Extractor: Send + Sync {
    fn source(&self) -> Source;

    fn listing_url(&self) -> &str;

    /// Extract candidates from a listing page's HTML.
    fn parse_listing(&self, html: &str) -> Vec<RawArticle>;

    /// Fetch the listing page and extract up to [`MAX_ARTICLES_PER_SOURCE`] candidates.
    ///
    /// Never fails: network and HTTP errors are logged and yield an empty list.
    async fn extract(&self, client: &Client, timeout: Duration) -> Vec<RawArticle> {
        let html = match fetch_text(client, self.listing_url(), timeout).await {
            Ok(html) => html,
            Err(e) => {
                warn!(source = %self.source(), error = %e, url = self.listing_url(), "Listing fetch failed; source yields nothing");
                return Vec::new();
            }
        };

        let mut articles = self.parse_listing(&html);
        articles.truncate(MAX_ARTICLES_PER_SOURCE);
        info!(source = %self.source(), count = articles.len(), "Extracted candidate articles");
        articles
    }
}

/// Every extractor in processing order.
pub fn default_extractors() -> Vec<Box<dyn Extractor>> {
    vec![
        Box::new(Cp24::new()),
        Box::new(CbcToronto::new()),
        Box::new(GlobalNews::new()),
        Box::new(CityNews::new()),
    ]
}

/// Where an extractor reads from and what it resolves relative links against.
///
/// Defaults to the real site; tests point it at a mock server.
#[derive(Debug, Clone)]
pub struct SiteUrls {
    pub listing: String,
    pub root: String,
}

impl SiteUrls {
    pub fn for_source(source: Source) -> Self {
        Self {
            listing: source.listing_url().to_string(),
            root: source.site_root().to_string(),
        }
    }
}

static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());
static P: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Which lazy-load attribute a site fills in first.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ImageAttr {
    SrcFirst,
    DataSrcFirst,
}

/// Whitespace-collapsed text content of an element.
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    el.text().flat_map(str::split_whitespace).join(" ")
}

/// Text of the first descendant of `el` matching `selector`, if non-empty.
pub(crate) fn first_text(el: ElementRef<'_>, selector: &Selector) -> Option<String> {
    el.select(selector)
        .map(element_text)
        .find(|t| !t.is_empty())
}

/// Nearest ancestor of `el` whose tag is one of `tags`.
pub(crate) fn enclosing_block<'a>(el: ElementRef<'a>, tags: &[&str]) -> Option<ElementRef<'a>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| tags.contains(&a.value().name()))
}

/// Absolute URL of the first `<img>` inside `block`, or empty.
///
/// Inline `data:` values are lazy-load stand-ins and never count.
pub(crate) fn image_in(block: ElementRef<'_>, root: &str, prefer: ImageAttr) -> String {
    let Some(img) = block.select(&IMG).next() else {
        return String::new();
    };
    let attrs = match prefer {
        ImageAttr::SrcFirst => ["src", "data-src"],
        ImageAttr::DataSrcFirst => ["data-src", "src"],
    };
    attrs
        .iter()
        .filter_map(|a| img.value().attr(a))
        .map(str::trim)
        .find(|v| !v.is_empty() && !v.to_ascii_lowercase().starts_with("data:"))
        .and_then(|v| absolutize_url(root, v))
        .unwrap_or_default()
}

/// Text of the first `<p>` inside `block`, unless it just repeats the title.
pub(crate) fn description_in(block: ElementRef<'_>, title: &str) -> String {
    match first_text(block, &P) {
        Some(text) if text != title => text,
        _ => String::new(),
    }
}

/// Accumulates candidates for one extractor call.
///
/// Applies the shared headline filter, drops repeated URLs and stops taking
/// new articles once [`MAX_ARTICLES_PER_SOURCE`] have been accepted.
pub(crate) struct Candidates {
    source: Source,
    seen: HashSet<String>,
    articles: Vec<RawArticle>,
}

impl Candidates {
    pub(crate) fn new(source: Source) -> Self {
        Self {
            source,
            seen: HashSet::new(),
            articles: Vec::new(),
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.articles.len() >= MAX_ARTICLES_PER_SOURCE
    }

    /// Whether `url` was already accepted in this call.
    pub(crate) fn has_seen(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Offer a candidate; returns whether it was kept.
    pub(crate) fn offer(&mut self, title: String, url: String, image_url: String, description: String) -> bool {
        if self.is_full() || self.seen.contains(&url) {
            return false;
        }
        if !self.source.accepts_headline(&title) {
            debug!(%title, "Rejected headline");
            return false;
        }
        self.seen.insert(url.clone());
        self.articles.push(RawArticle {
            title,
            url,
            image_url,
            description,
            source: self.source,
        });
        true
    }

    pub(crate) fn into_articles(self) -> Vec<RawArticle> {
        self.articles
    }
}
