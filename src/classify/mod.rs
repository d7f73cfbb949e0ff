//! Text classification for enriched articles.
//!
//! Both classifiers work on the same input: headline and teaser concatenated
//! and lower-cased, then matched by plain substring search.
//!
//! - [`category`]: keyword scoring into crime / fire / accident / weather / news
//! - [`neighbourhood`]: first-match lookup against an ordered gazetteer

pub mod category;
pub mod neighbourhood;

pub use category::categorize;
pub use neighbourhood::tag_neighbourhood;

/// The text both classifiers search.
fn haystack(title: &str, description: &str) -> String {
    format!("{title} {description}").to_lowercase()
}
