//! Cross-source duplicate removal.
//!
//! Outlets syndicate and rewrite each other's stories, so the same event often
//! shows up more than once with only punctuation or capitalization changed.
//! Articles are compared on a normalized headline prefix and the first one
//! seen is kept.

use crate::models::EnrichedArticle;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").unwrap());

/// Characters of the normalized headline that take part in the comparison.
pub const FINGERPRINT_LEN: usize = 50;

/// Lower-cased headline with all non-word characters (spaces included)
/// removed, cut to [`FINGERPRINT_LEN`] characters.
pub fn fingerprint(headline: &str) -> String {
    let lower = headline.to_lowercase();
    NON_WORD.replace_all(&lower, "").chars().take(FINGERPRINT_LEN).collect()
}

/// Keep the first article per fingerprint, preserving order. Articles whose
/// fingerprint is empty are dropped.
pub fn dedupe(articles: Vec<EnrichedArticle>) -> Vec<EnrichedArticle> {
    let before = articles.len();
    let kept: Vec<EnrichedArticle> = articles
        .into_iter()
        .map(|a| (fingerprint(&a.headline), a))
        .filter(|(fp, _)| !fp.is_empty())
        .unique_by(|(fp, _)| fp.clone())
        .map(|(_, a)| a)
        .collect();
    debug!(before, after = kept.len(), "Deduplicated articles");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use pretty_assertions::assert_eq;

    fn article(headline: &str, source: &str) -> EnrichedArticle {
        EnrichedArticle {
            headline: headline.to_string(),
            description: headline.to_string(),
            source: source.to_string(),
            url: format!("https://example.com/{source}"),
            image_path: "images/x.png".to_string(),
            neighbourhood: "Toronto".to_string(),
            category: Category::News,
        }
    }

    #[test]
    fn test_fingerprint_normalizes() {
        assert_eq!(fingerprint("Fire breaks out in North York home"), "firebreaksoutinnorthyorkhome");
        assert_eq!(fingerprint("fire breaks out in north york home!!"), "firebreaksoutinnorthyorkhome");
        assert_eq!(fingerprint("!!! ---"), "");
    }

    #[test]
    fn test_fingerprint_truncates() {
        let long = "a".repeat(80);
        assert_eq!(fingerprint(&long).len(), FINGERPRINT_LEN);
    }

    #[test]
    fn test_first_seen_wins() {
        let out = dedupe(vec![
            article("Fire breaks out in North York home", "CP24"),
            article("TTC fare freeze approved by council", "CBC Toronto"),
            article("fire breaks out in north york home!!", "CityNews"),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].source, "CP24");
        assert_eq!(out[1].headline, "TTC fare freeze approved by council");
    }

    #[test]
    fn test_empty_fingerprints_are_dropped() {
        let out = dedupe(vec![article("???", "CP24"), article("Storm warning for the GTA", "CP24")]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].headline, "Storm warning for the GTA");
    }

    #[test]
    fn test_prefix_collision_counts_as_duplicate() {
        let base = "Toronto police are investigating a shooting near Yonge and Dundas";
        let out = dedupe(vec![
            article(&format!("{base} on Saturday"), "CP24"),
            article(&format!("{base} on Sunday"), "Global News"),
        ]);
        assert_eq!(out.len(), 1);
    }
}
