//! Error taxonomy for the enrichment pipeline.
//!
//! Most variants are recovered close to where they happen: a failed fetch,
//! parse or decode simply moves the image resolver on to its next strategy,
//! and a failed listing fetch turns into an empty extractor result. Only
//! [`PipelineError::FatalIo`] is allowed to surface for an article.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Connection refused, DNS failure, timeout or a body read error.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Markup did not contain what we were looking for.
    #[error("could not parse {what}: {reason}")]
    Parse { what: String, reason: String },

    /// Bytes came back but were not a decodable image.
    #[error("could not decode image from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },

    /// Drawing or encoding the placeholder failed.
    #[error("could not render placeholder: {0}")]
    Render(String),

    /// Writing an image file failed for one strategy; later strategies may still succeed.
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not even the flat fallback image could be written.
    #[error("cannot write any image to {path}: {source}")]
    FatalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn parse(what: impl Into<String>, reason: impl Into<String>) -> Self {
        PipelineError::Parse {
            what: what.into(),
            reason: reason.into(),
        }
    }

    /// True only for the failure that breaks the non-empty image guarantee.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PipelineError::FatalIo { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_fatal_io_is_fatal() {
        let io = || std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(
            PipelineError::FatalIo {
                path: PathBuf::from("images/simple_abc.png"),
                source: io(),
            }
            .is_fatal()
        );
        assert!(
            !PipelineError::Io {
                path: PathBuf::from("images/news_abc.png"),
                source: io(),
            }
            .is_fatal()
        );
        assert!(!PipelineError::parse("article page", "no image").is_fatal());
        assert!(
            !PipelineError::Status {
                url: "https://example.com".into(),
                status: 404
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_status_message() {
        let err = PipelineError::Status {
            url: "https://example.com/img.png".into(),
            status: 404,
        };
        assert_eq!(err.to_string(), "https://example.com/img.png returned HTTP 404");
    }
}
