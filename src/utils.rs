//! Utility functions for hashing, URL normalization, string handling and file system checks.
//!
//! This module provides helpers used throughout the application:
//! - Short content hashes used in cache keys and image file names
//! - URL normalization for image and article links scraped from markup
//! - String truncation for logging
//! - File system validation for output directories

use sha2::{Digest, Sha256};
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Number of hex characters kept from a SHA-256 digest.
pub const SHORT_HASH_LEN: usize = 12;

/// Hash `input` and keep the first [`SHORT_HASH_LEN`] hex characters.
///
/// Used both for image cache keys and for placeholder file names, so equal
/// inputs always map to the same file on disk.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(short_hash("abc"), "ba7816bf8f01");
/// ```
pub fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(SHORT_HASH_LEN);
    hex
}

/// Turn a scraped `src`/`href` value into an absolute URL.
///
/// - Protocol-relative (`//cdn.example.com/x.jpg`) gets an `https:` scheme
/// - Absolute `http(s)` URLs are returned unchanged
/// - Anything else is resolved against `base`
///
/// Returns `None` for empty input or when the value cannot be resolved.
pub fn absolutize_url(base: &str, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(rest) = raw.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    if is_http_url(raw) {
        return Some(raw.to_string());
    }
    let base = Url::parse(base).ok()?;
    base.join(raw).ok().map(|u| u.to_string())
}

/// Whether `s` is an absolute `http://` or `https://` URL.
pub fn is_http_url(s: &str) -> bool {
    let lower = s.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` characters with an ellipsis appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}…", &s[..idx]),
    }
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = path.join("..__probe_write__");
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hash_is_stable_and_short() {
        assert_eq!(short_hash("abc"), "ba7816bf8f01");
        assert_eq!(short_hash("abc"), short_hash("abc"));
        assert_ne!(short_hash("abc"), short_hash("abd"));
        assert_eq!(short_hash("").len(), SHORT_HASH_LEN);
    }

    #[test]
    fn test_absolutize_protocol_relative() {
        assert_eq!(
            absolutize_url("https://www.cp24.com", "//images.cp24.com/a.jpg").as_deref(),
            Some("https://images.cp24.com/a.jpg")
        );
    }

    #[test]
    fn test_absolutize_path_relative() {
        assert_eq!(
            absolutize_url("https://www.cp24.com", "/content/a.jpg").as_deref(),
            Some("https://www.cp24.com/content/a.jpg")
        );
        assert_eq!(
            absolutize_url("https://globalnews.ca/news/123/story/", "img/b.png").as_deref(),
            Some("https://globalnews.ca/news/123/story/img/b.png")
        );
    }

    #[test]
    fn test_absolutize_keeps_absolute_and_rejects_empty() {
        assert_eq!(
            absolutize_url("https://www.cbc.ca", "https://i.cbc.ca/x.jpg").as_deref(),
            Some("https://i.cbc.ca/x.jpg")
        );
        assert_eq!(absolutize_url("https://www.cbc.ca", "   "), None);
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://example.com/a.png"));
        assert!(is_http_url("HTTP://example.com/a.png"));
        assert!(!is_http_url("/a.png"));
        assert!(!is_http_url("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short", 100), "short");
        assert_eq!(truncate_for_log("abcdef", 3), "abc…");
        assert_eq!(truncate_for_log("éééé", 2), "éé…");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("images");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(!nested.join("..__probe_write__").exists());
    }
}
