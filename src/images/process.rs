//! Decoding, normalization and PNG output for downloaded images.

use crate::error::PipelineError;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;
use tokio::fs;

/// Saved images never exceed this box.
pub const MAX_WIDTH: u32 = 1200;
pub const MAX_HEIGHT: u32 = 630;

/// Decode `bytes` into a 3-channel image no larger than [`MAX_WIDTH`]×[`MAX_HEIGHT`].
///
/// Transparent pixels are composited onto white.
pub fn normalize(bytes: &[u8]) -> Result<RgbImage, image::ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    Ok(fit_within(flatten_onto_white(&decoded)))
}

fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }
    let rgba = img.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, px) in rgba.enumerate_pixels() {
        let a = u32::from(px[3]);
        let over_white = |c: u8| ((u32::from(c) * a + 255 * (255 - a)) / 255) as u8;
        out.put_pixel(x, y, Rgb([over_white(px[0]), over_white(px[1]), over_white(px[2])]));
    }
    out
}

/// Downscale, keeping aspect ratio, when either side is over the limit.
fn fit_within(img: RgbImage) -> RgbImage {
    if img.width() <= MAX_WIDTH && img.height() <= MAX_HEIGHT {
        return img;
    }
    DynamicImage::ImageRgb8(img)
        .resize(MAX_WIDTH, MAX_HEIGHT, FilterType::Lanczos3)
        .to_rgb8()
}

pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Encode `img` as PNG and write it to `path`.
pub async fn save_png(img: &RgbImage, path: &Path) -> Result<(), PipelineError> {
    let bytes = encode_png(img).map_err(|e| PipelineError::Render(e.to_string()))?;
    fs::write(path, bytes).await.map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_normalize_keeps_small_images() {
        let src = RgbImage::from_pixel(40, 20, Rgb([10, 20, 30]));
        let out = normalize(&png_bytes(DynamicImage::ImageRgb8(src))).unwrap();
        assert_eq!(out.dimensions(), (40, 20));
        assert_eq!(out.get_pixel(5, 5), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_normalize_downscales_preserving_aspect() {
        let src = RgbImage::from_pixel(1800, 945, Rgb([200, 0, 0]));
        let out = normalize(&png_bytes(DynamicImage::ImageRgb8(src))).unwrap();
        assert_eq!(out.dimensions(), (1200, 630));

        let tall = RgbImage::from_pixel(630, 1260, Rgb([0, 0, 200]));
        let out = normalize(&png_bytes(DynamicImage::ImageRgb8(tall))).unwrap();
        assert_eq!(out.dimensions(), (315, 630));
    }

    #[test]
    fn test_normalize_flattens_transparency_onto_white() {
        let mut src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        src.put_pixel(0, 0, Rgba([0, 0, 255, 255]));
        let out = normalize(&png_bytes(DynamicImage::ImageRgba8(src))).unwrap();
        assert_eq!(out.get_pixel(3, 3), &Rgb([255, 255, 255]));
        assert_eq!(out.get_pixel(0, 0), &Rgb([0, 0, 255]));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize(b"<html>not an image</html>").is_err());
    }

    #[tokio::test]
    async fn test_save_png_round_trips_dimensions() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.png");
        save_png(&RgbImage::new(12, 8), &path).await.unwrap();
        let back = image::open(&path).unwrap();
        assert_eq!((back.width(), back.height()), (12, 8));
    }

    #[tokio::test]
    async fn test_save_png_into_missing_dir_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing").join("out.png");
        let err = save_png(&RgbImage::new(2, 2), &path).await.unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }
}
