//! Run settings.
//!
//! Values come from three layers, highest priority first: command-line flags,
//! an optional YAML file, built-in defaults. A settings file may name any
//! subset of fields:
//!
//! ```yaml
//! output_dir: /var/www/news
//! images_dir: /var/www/news/images
//! archive_dir: /var/lib/toronto_news/archive
//! source_pause_secs: 5
//! font_paths:
//!   - /usr/share/fonts/opentype/inter/Inter-Bold.otf
//! ```

use crate::cli::Cli;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub images_dir: PathBuf,
    pub archive_dir: Option<PathBuf>,
    pub listing_timeout_secs: u64,
    pub image_timeout_secs: u64,
    pub source_pause_secs: u64,
    /// Probed before the built-in system font list.
    pub font_paths: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            images_dir: PathBuf::from("images"),
            archive_dir: None,
            listing_timeout_secs: 15,
            image_timeout_secs: 10,
            source_pause_secs: 2,
            font_paths: Vec::new(),
        }
    }
}

impl Settings {
    pub fn from_yaml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_yaml(&text, path)
    }

    /// File (or defaults) first, then CLI flags on top.
    pub async fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let base = match &cli.config {
            Some(path) => Self::load(path).await?,
            None => Self::default(),
        };
        Ok(base.with_overrides(cli))
    }

    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(dir) = &cli.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(dir) = &cli.images_dir {
            self.images_dir = dir.clone();
        }
        if cli.archive_dir.is_some() {
            self.archive_dir = cli.archive_dir.clone();
        }
        if let Some(secs) = cli.listing_timeout {
            self.listing_timeout_secs = secs;
        }
        if let Some(secs) = cli.image_timeout {
            self.image_timeout_secs = secs;
        }
        if let Some(secs) = cli.source_pause {
            self.source_pause_secs = secs;
        }
        if !cli.fonts.is_empty() {
            self.font_paths = cli.fonts.iter().chain(&self.font_paths).cloned().collect();
        }
        self
    }

    pub fn listing_timeout(&self) -> Duration {
        Duration::from_secs(self.listing_timeout_secs)
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.image_timeout_secs)
    }

    pub fn source_pause(&self) -> Duration {
        Duration::from_secs(self.source_pause_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let s = Settings::from_yaml("output_dir: /srv/news\nsource_pause_secs: 5\n", Path::new("s.yaml")).unwrap();
        assert_eq!(s.output_dir, PathBuf::from("/srv/news"));
        assert_eq!(s.source_pause(), Duration::from_secs(5));
        assert_eq!(s.images_dir, PathBuf::from("images"));
        assert_eq!(s.listing_timeout(), Duration::from_secs(15));
        assert_eq!(s.image_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_bad_yaml_is_parse_error() {
        let err = Settings::from_yaml("source_pause_secs: [1, 2]", Path::new("bad.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = Settings::from_yaml(
            "images_dir: /srv/img\nsource_pause_secs: 5\nfont_paths: [file.ttf]\n",
            Path::new("s.yaml"),
        )
        .unwrap();
        let cli = Cli::parse_from(["toronto_news", "--source-pause", "0", "--font", "cli.ttf"]);
        let merged = file.with_overrides(&cli);

        assert_eq!(merged.images_dir, PathBuf::from("/srv/img"));
        assert_eq!(merged.source_pause_secs, 0);
        assert_eq!(merged.font_paths, vec![PathBuf::from("cli.ttf"), PathBuf::from("file.ttf")]);
    }

    #[tokio::test]
    async fn test_resolve_reads_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.yaml");
        std::fs::write(&path, "archive_dir: /srv/archive\n").unwrap();

        let cli = Cli {
            config: Some(path),
            ..Default::default()
        };
        let s = Settings::resolve(&cli).await.unwrap();
        assert_eq!(s.archive_dir, Some(PathBuf::from("/srv/archive")));
        assert_eq!(s.output_dir, PathBuf::from("."));
    }

    #[tokio::test]
    async fn test_missing_config_file_is_read_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/settings.yaml")),
            ..Default::default()
        };
        assert!(matches!(Settings::resolve(&cli).await, Err(ConfigError::Read { .. })));
    }
}
