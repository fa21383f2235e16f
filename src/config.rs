//! Gallery configuration.
//!
//! Handles loading and validating an optional `gallery.toml`. Every key has a
//! default, so the file only needs the values you want to change.
//!
//! ## Config File Location
//!
//! By default the file is looked up in the photos directory:
//!
//! ```text
//! photos/
//! ├── gallery.toml       # optional
//! ├── IMG_0001.HEIC
//! └── IMG_0002.jpg
//! ```
//!
//! `--config <file>` points at a file anywhere else; in that case the file must
//! exist.
//!
//! ## Configuration Options
//!
//! ```toml
//! title = "Photo Gallery"     # <title> and <h1> of index.html
//! stylesheet = "my.css"       # replaces the built-in style.css (relative to this file)
//!
//! [images]
//! quality = 70                # JPEG quality for HEIC/HEIF conversion (1-100)
//! thumbnail_width = 500       # thumbnail width in pixels, height follows aspect
//!
//! [tools]
//! heif_convert = "heif-convert"
//! resize = "convert"
//! fetch = "curl"
//! zip = "zip"
//!
//! [archive]
//! url = "https://redbean.dev/redbean-latest.com"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file looked up in the photos directory.
pub const CONFIG_FILENAME: &str = "gallery.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery configuration loaded from `gallery.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Page title and heading.
    pub title: String,
    /// Custom stylesheet copied to `style.css` instead of the built-in one.
    pub stylesheet: Option<PathBuf>,
    pub images: ImagesConfig,
    pub tools: ToolsConfig,
    pub archive: ArchiveConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            title: "Photo Gallery".to_string(),
            stylesheet: None,
            images: ImagesConfig::default(),
            tools: ToolsConfig::default(),
            archive: ArchiveConfig::default(),
        }
    }
}

/// Conversion and thumbnail settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    pub quality: u32,
    pub thumbnail_width: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            quality: 70,
            thumbnail_width: 500,
        }
    }
}

/// Program names for the external tools.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub heif_convert: String,
    pub resize: String,
    pub fetch: String,
    pub zip: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            heif_convert: "heif-convert".to_string(),
            resize: "convert".to_string(),
            fetch: "curl".to_string(),
            zip: "zip".to_string(),
        }
    }
}

/// Where the redbean bootstrap binary is downloaded from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    pub url: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            url: "https://redbean.dev/redbean-latest.com".to_string(),
        }
    }
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.images.quality) {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.images.thumbnail_width == 0 {
            return Err(ConfigError::Validation(
                "images.thumbnail_width must be non-zero".into(),
            ));
        }
        let tools = [
            ("tools.heif_convert", &self.tools.heif_convert),
            ("tools.resize", &self.tools.resize),
            ("tools.fetch", &self.tools.fetch),
            ("tools.zip", &self.tools.zip),
            ("archive.url", &self.archive.url),
        ];
        if let Some((key, _)) = tools.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ConfigError::Validation(format!("{key} must not be empty")));
        }
        Ok(())
    }
}

/// Parse and validate a config file.
///
/// A relative `stylesheet` is resolved against the file's directory.
pub fn load_config_file(path: &Path) -> Result<GalleryConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: GalleryConfig = toml::from_str(&content)?;
    if let Some(stylesheet) = config.stylesheet.take() {
        let base = path.parent().unwrap_or(Path::new(""));
        config.stylesheet = Some(base.join(stylesheet));
    }
    config.validate()?;
    Ok(config)
}

/// Resolve the config for a build.
///
/// An explicit path must exist. Otherwise `gallery.toml` in the photos
/// directory is used when present, and stock defaults when not.
pub fn load_config(
    photos_dir: &Path,
    explicit: Option<&Path>,
) -> Result<GalleryConfig, ConfigError> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }
    let candidate = photos_dir.join(CONFIG_FILENAME);
    if candidate.is_file() {
        load_config_file(&candidate)
    } else {
        Ok(GalleryConfig::default())
    }
}

/// Returns a fully-commented stock `gallery.toml` with all keys and explanations.
///
/// Used by the `--gen-config` flag.
pub fn stock_config_toml() -> &'static str {
    r##"# photo-site configuration
# ========================
# All settings are optional. Values shown below are the defaults.
# Place this file in the photos directory as gallery.toml, or pass
# --config <file>. Unknown keys will cause an error.

# Title and heading of index.html.
title = "Photo Gallery"

# Custom stylesheet written to <site>/style.css instead of the built-in one.
# Relative paths are resolved against this file's directory.
# stylesheet = "style.css"

# ---------------------------------------------------------------------------
# Images
# ---------------------------------------------------------------------------
[images]
# JPEG quality used when converting HEIC/HEIF (1-100).
quality = 70
# Thumbnail width in pixels. Height follows the aspect ratio.
thumbnail_width = 500

# ---------------------------------------------------------------------------
# External tools (program names or absolute paths)
# ---------------------------------------------------------------------------
[tools]
heif_convert = "heif-convert"
resize = "convert"
fetch = "curl"
zip = "zip"

# ---------------------------------------------------------------------------
# Redbean archive
# ---------------------------------------------------------------------------
[archive]
url = "https://redbean.dev/redbean-latest.com"
"##
}
