//! Finding a representative image on an article page.
//!
//! Strategies are tried in order and the first hit wins:
//!
//! 1. `<meta property="og:image">`
//! 2. `<meta name="twitter:image">`
//! 3. The first `<img>` declared larger than 400×200 that isn't a logo, icon,
//!    avatar or tracking pixel
//! 4. The first `<img>` (or lazy `data-src`) with a plausible URL that isn't
//!    an inline `data:` URI

use crate::utils::absolutize_url;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static OG_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:image"]"#).unwrap());
static TWITTER_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="twitter:image"]"#).unwrap());
static IMG_WITH_SRC: Lazy<Selector> = Lazy::new(|| Selector::parse("img[src]").unwrap());

const MIN_LARGE_WIDTH: u32 = 400;
const MIN_LARGE_HEIGHT: u32 = 200;
const MIN_FALLBACK_URL_LEN: usize = 20;
const JUNK_MARKERS: [&str; 5] = ["logo", "icon", "avatar", "pixel", "1x1"];

/// Which strategy produced the candidate; logged for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStrategy {
    OpenGraph,
    TwitterCard,
    LargeImage,
    FirstImage,
}

/// Best image URL on the page at `page_url`, made absolute.
pub fn find_article_image(html: &str, page_url: &str) -> Option<(String, ImageStrategy)> {
    let document = Html::parse_document(html);

    let found = meta_content(&document, &OG_IMAGE)
        .map(|u| (u, ImageStrategy::OpenGraph))
        .or_else(|| meta_content(&document, &TWITTER_IMAGE).map(|u| (u, ImageStrategy::TwitterCard)))
        .or_else(|| large_image(&document).map(|u| (u, ImageStrategy::LargeImage)))
        .or_else(|| first_image(&document, page_url).map(|u| (u, ImageStrategy::FirstImage)))?;

    let (raw, strategy) = found;
    let url = absolutize_url(page_url, &raw)?;
    debug!(?strategy, %url, "Found article image");
    Some((url, strategy))
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .filter_map(|m| m.value().attr("content"))
        .map(str::trim)
        .find(|c| !c.is_empty())
        .map(str::to_string)
}

fn declared_dimension(img: ElementRef<'_>, attr: &str) -> Option<u32> {
    img.value().attr(attr)?.trim().parse().ok()
}

fn large_image(document: &Html) -> Option<String> {
    document
        .select(&IMG_WITH_SRC)
        .filter(|img| {
            let src = img.value().attr("src").unwrap_or_default().to_lowercase();
            !JUNK_MARKERS.iter().any(|m| src.contains(m))
        })
        .find(|img| {
            matches!(
                (declared_dimension(*img, "width"), declared_dimension(*img, "height")),
                (Some(w), Some(h)) if w > MIN_LARGE_WIDTH && h > MIN_LARGE_HEIGHT
            )
        })
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string)
}

fn first_image(document: &Html, page_url: &str) -> Option<String> {
    document
        .select(&IMG_WITH_SRC)
        .filter_map(|img| {
            let v = img.value();
            [v.attr("src"), v.attr("data-src")]
                .into_iter()
                .flatten()
                .map(str::trim)
                .find(|s| !s.is_empty())
        })
        .filter(|src| src.len() > MIN_FALLBACK_URL_LEN)
        .filter_map(|src| absolutize_url(page_url, src))
        .find(|url| !url.contains("data:image"))
}
