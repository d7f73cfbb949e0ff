//! Keyword-based topic categorization.

use super::haystack;
use crate::models::Category;
use tracing::debug;

/// Keyword lists in tie-break priority order.
///
/// When two categories score the same, the one listed first wins.
const KEYWORDS: [(Category, &[&str]); 4] = [
    (
        Category::Crime,
        &[
            "shooting", "shot", "stabbing", "stabbed", "robbery", "assault", "murder", "killed",
            "homicide", "arrest", "arrested", "charged", "police", "theft", "stolen", "break-in",
            "gun", "weapon", "violence", "suspect", "investigation", "wanted", "search", "missing",
            "found dead", "body found",
        ],
    ),
    (
        Category::Fire,
        &[
            "fire", "blaze", "arson", "flames", "smoke", "burning", "burnt", "firefighters",
            "alarm", "evacuate", "evacuation", "explosion",
        ],
    ),
    (
        Category::Accident,
        &[
            "collision", "crash", "accident", "pedestrian struck", "hit-and-run", "vehicle",
            "struck", "injured", "traffic", "dies after being struck", "hit by", "run over",
            "highway closed",
        ],
    ),
    (
        Category::Weather,
        &[
            "storm", "weather", "snow", "ice", "tornado", "flood", "flooding", "freezing",
            "warning", "rain", "wind", "cold", "heat", "advisory", "blizzard", "temperature",
        ],
    ),
];

/// Number of `keywords` that occur in `text`.
fn score(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| text.contains(*k)).count()
}

/// Assign a category to an article.
///
/// Each category scores one point per keyword found in the lower-cased
/// headline and teaser. The strictly highest score wins, ties go to the
/// earlier category in [`KEYWORDS`], and no hits at all means
/// [`Category::News`].
pub fn categorize(title: &str, description: &str) -> Category {
    let text = haystack(title, description);

    let mut best = (Category::News, 0);
    for (category, keywords) in KEYWORDS {
        let s = score(&text, keywords);
        if s > best.1 {
            best = (category, s);
        }
    }

    debug!(category = %best.0, score = best.1, "Categorized");
    best.0
}
