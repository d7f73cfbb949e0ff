//! Synthetic article images.
//!
//! When neither the listing nor the article page yields a usable picture, the
//! resolver asks [`PlaceholderGenerator`] for a 1200×630 card: a gradient in
//! the category colour, the wrapped headline, the outlet name and a category
//! badge. Text goes through a TrueType font when one can be found on the
//! machine and through a tiny built-in bitmap font otherwise, so generation
//! never depends on the host.

pub mod font;

use crate::error::PipelineError;
use crate::images::process::save_png;
use crate::models::Category;
use crate::utils::short_hash;
use ab_glyph::FontVec;
use font::{FontSource, GLYPH_HEIGHT, GLYPH_WIDTH, bitmap_glyph};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use imageproc::drawing::{Blend, Canvas, draw_text_mut, text_size};
use std::io;
use std::path::PathBuf;
use tracing::{debug, instrument, warn};

pub const WIDTH: u32 = 1200;
pub const HEIGHT: u32 = 630;

const HEADLINE_PX: f32 = 60.0;
const SOURCE_PX: f32 = 40.0;
const BADGE_PX: f32 = 35.0;
const LINE_PITCH: u32 = 80;
const MAX_LINES: usize = 3;
const WRAP_WIDTH: u32 = WIDTH - 100;
const BITMAP_WRAP_CHARS: usize = 40;
const SOURCE_FROM_BOTTOM: u32 = 100;
const BADGE_TOP: u32 = 40;
const BADGE_PAD_X: u32 = 20;
const BADGE_PAD_Y: u32 = 10;
const BADGE_RADIUS: f32 = 12.0;
const BADGE_OUTLINE: f32 = 2.0;
const SHADOW_OFFSET: i32 = 2;

/// Brightness at the bottom edge of the gradient.
const GRADIENT_FLOOR: f32 = 0.6;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const SHADOW: Rgba<u8> = Rgba([0, 0, 0, 136]);
const BADGE_FILL: Rgba<u8> = Rgba([0, 0, 0, 102]);
const INDIGO: [u8; 3] = [0x63, 0x66, 0xF1];

/// Base colour of the card background.
pub fn category_colour(category: Category) -> [u8; 3] {
    match category {
        Category::Crime => [0xDC, 0x26, 0x26],
        Category::Fire => [0xEA, 0x58, 0x0C],
        Category::Accident => [0xF5, 0x9E, 0x0B],
        Category::Weather => [0x3B, 0x82, 0xF6],
        Category::News => INDIGO,
    }
}

type Surface = Blend<RgbaImage>;

/// Draws strings either with a loaded TrueType font or the 5×7 bitmap table.
enum TextRenderer {
    TrueType(FontVec),
    Bitmap,
}

impl TextRenderer {
    fn bitmap_cell(px: f32) -> u32 {
        ((px / 14.0) as u32).max(2)
    }

    fn measure(&self, px: f32, text: &str) -> (u32, u32) {
        match self {
            TextRenderer::TrueType(font) => text_size(px, font, text),
            TextRenderer::Bitmap => {
                let cell = Self::bitmap_cell(px);
                let chars = text.chars().count() as u32;
                (chars * (GLYPH_WIDTH + 1) * cell, GLYPH_HEIGHT * cell)
            }
        }
    }

    fn draw(&self, surface: &mut Surface, colour: Rgba<u8>, x: i32, y: i32, px: f32, text: &str) {
        match self {
            TextRenderer::TrueType(font) => draw_text_mut(surface, colour, x, y, px, font, text),
            TextRenderer::Bitmap => {
                let cell = Self::bitmap_cell(px) as i32;
                for (i, c) in text.chars().enumerate() {
                    let origin_x = x + i as i32 * (GLYPH_WIDTH as i32 + 1) * cell;
                    for (row, bits) in bitmap_glyph(c).iter().enumerate() {
                        for col in 0..GLYPH_WIDTH as i32 {
                            if bits & (0x10 >> col) != 0 {
                                fill_rect(
                                    surface,
                                    origin_x + col * cell,
                                    y + row as i32 * cell,
                                    cell,
                                    colour,
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    /// Greedy word wrap, capped at [`MAX_LINES`].
    fn wrap(&self, text: &str, px: f32) -> Vec<String> {
        let fits = |candidate: &str| match self {
            TextRenderer::TrueType(_) => self.measure(px, candidate).0 <= WRAP_WIDTH,
            TextRenderer::Bitmap => candidate.chars().count() <= BITMAP_WRAP_CHARS,
        };

        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();
        for word in text.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if fits(&candidate) {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines.truncate(MAX_LINES);
        lines
    }
}

fn fill_rect(surface: &mut Surface, x: i32, y: i32, size: i32, colour: Rgba<u8>) {
    let (w, h) = surface.dimensions();
    for py in y.max(0)..(y + size).min(h as i32) {
        for px in x.max(0)..(x + size).min(w as i32) {
            surface.draw_pixel(px as u32, py as u32, colour);
        }
    }
}

/// Rounded rectangle with a translucent fill and a solid outline.
fn draw_badge_box(surface: &mut Surface, x: u32, y: u32, w: u32, h: u32) {
    let (cw, ch) = surface.dimensions();
    let r = BADGE_RADIUS.min(w as f32 / 2.0).min(h as f32 / 2.0);
    let (inner_left, inner_right) = (x as f32 + r, (x + w) as f32 - r);
    let (inner_top, inner_bottom) = (y as f32 + r, (y + h) as f32 - r);

    for py in y..(y + h).min(ch) {
        for px in x..(x + w).min(cw) {
            let (cx, cy) = (px as f32 + 0.5, py as f32 + 0.5);
            let dx = (inner_left - cx).max(cx - inner_right).max(0.0);
            let dy = (inner_top - cy).max(cy - inner_bottom).max(0.0);
            // distance from the rounded edge, positive inside
            let depth = r - (dx * dx + dy * dy).sqrt();
            if depth < 0.0 {
                continue;
            }
            let colour = if depth < BADGE_OUTLINE { WHITE } else { BADGE_FILL };
            surface.draw_pixel(px, py, colour);
        }
    }
}

fn gradient(base: [u8; 3]) -> RgbaImage {
    RgbaImage::from_fn(WIDTH, HEIGHT, |_, y| {
        let fade = 1.0 - (1.0 - GRADIENT_FLOOR) * y as f32 / HEIGHT as f32;
        let shade = |c: u8| (c as f32 * fade) as u8;
        Rgba([shade(base[0]), shade(base[1]), shade(base[2]), 255])
    })
}

fn centred_x(text_width: u32) -> i32 {
    (WIDTH as i32 - text_width as i32) / 2
}

/// Renders placeholder cards into the images directory.
pub struct PlaceholderGenerator {
    images_dir: PathBuf,
    text: TextRenderer,
}

impl PlaceholderGenerator {
    /// Resolve a font once; every card of the run reuses it.
    pub fn new(images_dir: impl Into<PathBuf>, fonts: &dyn FontSource) -> Self {
        let text = match fonts.load() {
            Some(font) => TextRenderer::TrueType(font),
            None => TextRenderer::Bitmap,
        };
        Self {
            images_dir: images_dir.into(),
            text,
        }
    }

    pub fn uses_bitmap_font(&self) -> bool {
        matches!(self.text, TextRenderer::Bitmap)
    }

    /// Draw the card in memory.
    pub fn render(&self, headline: &str, category: Category, source: &str) -> RgbImage {
        let mut surface = Blend(gradient(category_colour(category)));

        let lines = self.text.wrap(headline, HEADLINE_PX);
        let block_height = lines.len() as u32 * LINE_PITCH;
        let top = HEIGHT.saturating_sub(block_height) / 2;
        for (i, line) in lines.iter().enumerate() {
            let (w, _) = self.text.measure(HEADLINE_PX, line);
            let x = centred_x(w);
            let y = (top + i as u32 * LINE_PITCH) as i32;
            self.text
                .draw(&mut surface, SHADOW, x + SHADOW_OFFSET, y + SHADOW_OFFSET, HEADLINE_PX, line);
            self.text.draw(&mut surface, WHITE, x, y, HEADLINE_PX, line);
        }

        if !source.is_empty() {
            let (w, _) = self.text.measure(SOURCE_PX, source);
            let y = (HEIGHT - SOURCE_FROM_BOTTOM) as i32;
            self.text.draw(&mut surface, WHITE, centred_x(w), y, SOURCE_PX, source);
        }

        let label = category.as_str().to_uppercase();
        let (tw, th) = self.text.measure(BADGE_PX, &label);
        let (bw, bh) = (tw + 2 * BADGE_PAD_X, th + 2 * BADGE_PAD_Y);
        let bx = (WIDTH - bw.min(WIDTH)) / 2;
        draw_badge_box(&mut surface, bx, BADGE_TOP, bw, bh);
        self.text.draw(
            &mut surface,
            WHITE,
            (bx + BADGE_PAD_X) as i32,
            (BADGE_TOP + BADGE_PAD_Y) as i32,
            BADGE_PX,
            &label,
        );

        DynamicImage::ImageRgba8(surface.0).to_rgb8()
    }

    /// Render and save a card, returning its path.
    ///
    /// Falls back to a flat indigo `simple_` image when the full card can't
    /// be written. Only a failure to write that one is returned.
    #[instrument(level = "debug", skip_all, fields(category = %category, source = %source))]
    pub async fn generate(
        &self,
        headline: &str,
        category: Category,
        source: &str,
    ) -> Result<String, PipelineError> {
        let hash = short_hash(headline);

        let path = self.images_dir.join(format!("generated_{hash}.png"));
        let card = self.render(headline, category, source);
        match save_png(&card, &path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Generated placeholder");
                return Ok(path.display().to_string());
            }
            Err(e) => warn!(error = %e, "Placeholder save failed; writing flat image"),
        }

        let simple = self.images_dir.join(format!("simple_{hash}.png"));
        let flat = RgbImage::from_pixel(WIDTH, HEIGHT, Rgb(INDIGO));
        match save_png(&flat, &simple).await {
            Ok(()) => Ok(simple.display().to_string()),
            Err(PipelineError::Io { path, source }) => Err(PipelineError::FatalIo { path, source }),
            Err(other) => Err(PipelineError::FatalIo {
                path: simple,
                source: io::Error::other(other.to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::font::NoFont;
    use std::path::Path;
    use super::*;

    fn bitmap_generator(dir: &Path) -> PlaceholderGenerator {
        PlaceholderGenerator::new(dir, &NoFont)
    }

    #[test]
    fn test_bitmap_wrap_caps_lines_and_width() {
        let generator = bitmap_generator(Path::new("images"));
        assert!(generator.uses_bitmap_font());
        let headline = "Police investigating after a series of overnight break-ins reported at \
                        several businesses along Queen Street West in Parkdale and Liberty Village \
                        with more details expected later today";
        let lines = generator.text.wrap(headline, HEADLINE_PX);
        assert_eq!(lines.len(), MAX_LINES);
        assert!(lines.iter().all(|l| l.chars().count() <= BITMAP_WRAP_CHARS));
        assert!(lines[0].starts_with("Police investigating"));
    }

    #[test]
    fn test_render_draws_text_on_gradient() {
        let generator = bitmap_generator(Path::new("images"));
        let img = generator.render("Man charged after robbery downtown", Category::Crime, "CP24");
        assert_eq!(img.dimensions(), (WIDTH, HEIGHT));

        // untouched corner is the pure category colour, bottom is darker
        assert_eq!(img.get_pixel(0, 0), &Rgb([0xDC, 0x26, 0x26]));
        assert!(img.get_pixel(0, HEIGHT - 1)[0] < 0xDC);

        let white = img.pixels().filter(|p| **p == Rgb([255, 255, 255])).count();
        assert!(white > 500, "expected headline text, got {white} white pixels");
    }

    #[test]
    fn test_category_colours() {
        assert_eq!(category_colour(Category::Fire), [0xEA, 0x58, 0x0C]);
        assert_eq!(category_colour(Category::News), INDIGO);
    }

    #[tokio::test]
    async fn test_generate_is_deterministic_per_headline() {
        let tmp = tempfile::tempdir().unwrap();
        let generator = bitmap_generator(tmp.path());
        let a = generator
            .generate("Fire breaks out in North York home", Category::Fire, "CityNews")
            .await
            .unwrap();
        let b = generator
            .generate("Fire breaks out in North York home", Category::Fire, "CityNews")
            .await
            .unwrap();
        assert_eq!(a, b);
        let name = Path::new(&a).file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(name, format!("generated_{}.png", short_hash("Fire breaks out in North York home")));
        assert_eq!(image::open(&a).unwrap().width(), WIDTH);
    }

    #[tokio::test]
    async fn test_generate_fails_fatally_when_dir_is_unwritable() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let generator = bitmap_generator(tmp.path());
        let err = generator
            .generate("Storm knocks out power across Etobicoke", Category::Weather, "CP24")
            .await
            .unwrap_err();
        assert!(err.is_fatal());
        match err {
            PipelineError::FatalIo { path, .. } => {
                assert!(path.to_string_lossy().contains("simple_"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
