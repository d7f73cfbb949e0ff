//! Data models for scraped and enriched articles.
//!
//! This module defines the core data structures that flow through the pipeline:
//! - [`Source`]: The news outlets the pipeline knows how to scrape
//! - [`RawArticle`]: A candidate article as found on a listing page
//! - [`Category`]: The topic assigned by the categorizer
//! - [`EnrichedArticle`]: A fully enriched article, ready for the feed
//! - [`FeedDocument`] and [`RunSummary`]: What a run hands to persistence and logging

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A news outlet scraped by the pipeline.
///
/// Variant order is the source priority used when sources are processed and
/// when duplicates are resolved ("first seen wins").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    Cp24,
    CbcToronto,
    GlobalNews,
    CityNews,
}

impl Source {
    /// Human-readable name written into the feed.
    pub fn display_name(&self) -> &'static str {
        match self {
            Source::Cp24 => "CP24",
            Source::CbcToronto => "CBC Toronto",
            Source::GlobalNews => "Global News",
            Source::CityNews => "CityNews",
        }
    }

    /// Scheme and host used to absolutize site-relative links.
    pub fn site_root(&self) -> &'static str {
        match self {
            Source::Cp24 => "https://www.cp24.com",
            Source::CbcToronto => "https://www.cbc.ca",
            Source::GlobalNews => "https://globalnews.ca",
            Source::CityNews => "https://toronto.citynews.ca",
        }
    }

    /// The listing page scraped for candidate articles.
    pub fn listing_url(&self) -> &'static str {
        match self {
            Source::Cp24 => "https://www.cp24.com",
            Source::CbcToronto => "https://www.cbc.ca/news/canada/toronto",
            Source::GlobalNews => "https://globalnews.ca/toronto",
            Source::CityNews => "https://toronto.citynews.ca",
        }
    }

    /// Lower-cased site/section banner phrases that get picked up as headlines.
    pub fn banners(&self) -> &'static [&'static str] {
        match self {
            Source::Cp24 => &["cp24", "breaking news", "latest news"],
            Source::CbcToronto => &["cbc toronto", "cbc news"],
            Source::GlobalNews => &["global news toronto", "global news"],
            Source::CityNews => &["citynews toronto", "citynews"],
        }
    }

    /// Whether `title` is a plausible headline for this source.
    ///
    /// Rejects anything under [`MIN_HEADLINE_CHARS`] characters, and short titles
    /// (under [`BANNER_MAX_CHARS`]) that contain one of the source's banner phrases.
    pub fn accepts_headline(&self, title: &str) -> bool {
        let len = title.chars().count();
        if len < MIN_HEADLINE_CHARS {
            return false;
        }
        let lower = title.to_lowercase();
        !(len < BANNER_MAX_CHARS && self.banners().iter().any(|b| lower.contains(b)))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Shortest headline accepted anywhere in the pipeline.
pub const MIN_HEADLINE_CHARS: usize = 15;

/// Titles shorter than this are checked against the banner blocklist.
pub const BANNER_MAX_CHARS: usize = 30;

/// A candidate article extracted from a listing page.
///
/// Never persisted; the orchestrator turns it into an [`EnrichedArticle`] or drops it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArticle {
    /// Headline text as found on the listing page.
    pub title: String,
    /// Absolute article URL.
    pub url: String,
    /// Absolute image URL, or empty when the listing had none.
    pub image_url: String,
    /// Teaser paragraph, or empty.
    pub description: String,
    pub source: Source,
}

/// Topic assigned to an article by the categorizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Crime,
    Fire,
    Accident,
    Weather,
    News,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Crime => "crime",
            Category::Fire => "fire",
            Category::Accident => "accident",
            Category::Weather => "weather",
            Category::News => "news",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully enriched article, as written to the feed.
///
/// Field order matches the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedArticle {
    pub headline: String,
    /// Falls back to the headline when the listing had no teaser.
    pub description: String,
    pub source: String,
    pub url: String,
    /// Local path of the resolved image. Never empty.
    #[serde(rename = "image")]
    pub image_path: String,
    pub neighbourhood: String,
    pub category: Category,
}

/// The JSON document handed to the static file server.
#[derive(Debug, Serialize, Deserialize)]
pub struct FeedDocument {
    pub generated_at: DateTime<Local>,
    pub total_articles: usize,
    pub articles: Vec<EnrichedArticle>,
}

impl FeedDocument {
    pub fn new(articles: Vec<EnrichedArticle>) -> Self {
        Self {
            generated_at: Local::now(),
            total_articles: articles.len(),
            articles,
        }
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub by_source: BTreeMap<String, usize>,
    pub by_category: BTreeMap<Category, usize>,
    pub with_images: usize,
}

impl RunSummary {
    pub fn from_articles(articles: &[EnrichedArticle]) -> Self {
        let mut summary = RunSummary {
            total: articles.len(),
            ..Default::default()
        };
        for article in articles {
            *summary.by_source.entry(article.source.clone()).or_default() += 1;
            *summary.by_category.entry(article.category).or_default() += 1;
            if !article.image_path.is_empty() {
                summary.with_images += 1;
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(headline: &str, source: &str, category: Category, image: &str) -> EnrichedArticle {
        EnrichedArticle {
            headline: headline.to_string(),
            description: headline.to_string(),
            source: source.to_string(),
            url: "https://example.com/a".to_string(),
            image_path: image.to_string(),
            neighbourhood: "Toronto".to_string(),
            category,
        }
    }

    #[test]
    fn test_accepts_headline_length() {
        assert!(!Source::Cp24.accepts_headline("Short title"));
        assert!(Source::Cp24.accepts_headline("Fifteen chars!!"));
    }

    #[test]
    fn test_accepts_headline_rejects_short_banner() {
        assert!(!Source::Cp24.accepts_headline("CP24 Breaking News"));
        assert!(!Source::GlobalNews.accepts_headline("Global News Toronto"));
        assert!(!Source::CityNews.accepts_headline("CityNews Toronto Live"));
    }

    #[test]
    fn test_accepts_headline_allows_long_banner_mention() {
        assert!(Source::Cp24.accepts_headline(
            "CP24 crews on scene as police close Yonge Street"
        ));
    }

    #[test]
    fn test_banner_check_is_per_source() {
        assert!(Source::Cp24.accepts_headline("CBC News at Six tonight"));
        assert!(!Source::CbcToronto.accepts_headline("CBC News at Six tonight"));
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Accident).unwrap();
        assert_eq!(json, "\"accident\"");
    }

    #[test]
    fn test_enriched_article_uses_image_field_name() {
        let a = article("Man charged after robbery downtown", "CP24", Category::Crime, "images/x.png");
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["image"], "images/x.png");
        assert!(json.get("image_path").is_none());
        assert_eq!(json["category"], "crime");
    }

    #[test]
    fn test_feed_document_counts_articles() {
        let doc = FeedDocument::new(vec![
            article("First headline for testing", "CP24", Category::News, "a.png"),
            article("Second headline for testing", "CityNews", Category::Fire, "b.png"),
        ]);
        assert_eq!(doc.total_articles, 2);
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json["generated_at"].is_string());
        assert_eq!(json["total_articles"], 2);
    }

    #[test]
    fn test_run_summary_counts() {
        let articles = vec![
            article("First headline for testing", "CP24", Category::Crime, "a.png"),
            article("Second headline for testing", "CP24", Category::Fire, "b.png"),
            article("Third headline for testing", "CityNews", Category::Crime, ""),
        ];
        let summary = RunSummary::from_articles(&articles);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_source["CP24"], 2);
        assert_eq!(summary.by_source["CityNews"], 1);
        assert_eq!(summary.by_category[&Category::Crime], 2);
        assert_eq!(summary.with_images, 2);
    }

    #[test]
    fn test_source_order_is_priority_order() {
        let mut sources = vec![Source::CityNews, Source::Cp24, Source::GlobalNews];
        sources.sort();
        assert_eq!(sources, vec![Source::Cp24, Source::GlobalNews, Source::CityNews]);
    }
}
