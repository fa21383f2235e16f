//! Site layout and the build sequence.
//!
//! [`build`] runs the stages in order, each one blocking until its tools finish:
//!
//! ```text
//! 1. Stylesheet  built-in (or configured) CSS  →  site/style.css
//! 2. Convert     photos/*                      →  site/jpg/*.jpg
//! 3. Page        site/jpg/*.jpg                →  site/jpg/small/*_small.jpg + site/index.html
//! 4. Archive     site/                         →  site.com        (unless skipped)
//! ```
//!
//! The first tool failure aborts the build; nothing is cleaned up. Every stage
//! skips outputs that already exist, so running the build again picks up where
//! the failed run stopped.

use crate::archive::{self, ArchiveOutcome};
use crate::config::{ConfigError, GalleryConfig};
use crate::convert::{self, ConvertOutcome, Converted};
use crate::generate::{self, GenerateError};
use crate::naming;
use crate::resize::ResizeOutcome;
use crate::tools::{Quality, ToolBackend, ToolError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

const DEFAULT_STYLESHEET: &str = include_str!("../static/style.css");

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Photos directory {0} does not exist or is not a directory")]
    PhotosDirNotFound(PathBuf),
    #[error("Site directory {0} has no name to derive the archive name from")]
    InvalidSiteDir(PathBuf),
    #[error("Failed to copy stylesheet {path}: {source}")]
    Stylesheet {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

impl SiteError {
    /// Process exit code for this error: the failing tool's own code when
    /// there is one, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        let tool = match self {
            SiteError::Tool(e) | SiteError::Generate(GenerateError::Tool(e)) => e.exit_code(),
            _ => None,
        };
        match tool {
            Some(code) if (1..=255).contains(&code) => code as u8,
            _ => 1,
        }
    }
}

/// Paths of everything a build writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    pub root: PathBuf,
    pub jpg_dir: PathBuf,
    pub small_dir: PathBuf,
    pub index: PathBuf,
    pub stylesheet: PathBuf,
    pub archive: PathBuf,
}

impl SiteLayout {
    /// Create the site directory tree (idempotent) and resolve its paths.
    ///
    /// The root is canonicalized so the archive name and relative links do
    /// not depend on how the path was spelled (`.`, `website/`, `../x`).
    pub fn create(root: &Path) -> Result<Self, SiteError> {
        fs::create_dir_all(root)?;
        let root = root.canonicalize()?;
        let jpg_dir = root.join(naming::JPG_DIR);
        let small_dir = jpg_dir.join(naming::SMALL_DIR);
        fs::create_dir_all(&small_dir)?;

        let archive =
            naming::archive_path(&root).ok_or_else(|| SiteError::InvalidSiteDir(root.clone()))?;

        Ok(Self {
            index: root.join(naming::INDEX_FILE),
            stylesheet: root.join(naming::STYLESHEET_FILE),
            jpg_dir,
            small_dir,
            archive,
            root,
        })
    }
}

/// Inputs of a build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub photos_dir: PathBuf,
    pub site_dir: PathBuf,
    pub skip_archive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Stylesheet,
    Convert,
    Page,
    Archive,
}

/// Progress reported while a build runs.
#[derive(Debug, Clone)]
pub enum BuildEvent {
    StageStarted(Stage),
    /// One entry of the photos directory was looked at.
    SourceHandled {
        index: usize,
        total: usize,
        source: PathBuf,
        result: Option<Converted>,
    },
    /// One image's thumbnail is in place and its page entry written.
    ThumbnailReady {
        index: usize,
        total: usize,
        thumbnail: PathBuf,
        outcome: ResizeOutcome,
    },
}

/// Summary of a finished build.
#[derive(Debug)]
pub struct BuildReport {
    pub layout: SiteLayout,
    pub converted: usize,
    pub copied: usize,
    pub cached: usize,
    pub thumbnails_resized: usize,
    pub thumbnails_cached: usize,
    pub photos: usize,
    pub archive: Option<ArchiveOutcome>,
}

/// Fail unless `path` is an existing directory.
pub fn validate_photos_dir(path: &Path) -> Result<(), SiteError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(SiteError::PhotosDirNotFound(path.to_path_buf()))
    }
}

/// Write `style.css`: the configured stylesheet if there is one, otherwise
/// the built-in default. Overwritten on every run.
pub fn write_stylesheet(layout: &SiteLayout, config: &GalleryConfig) -> Result<(), SiteError> {
    match &config.stylesheet {
        Some(custom) => {
            fs::copy(custom, &layout.stylesheet).map_err(|source| SiteError::Stylesheet {
                path: custom.clone(),
                source,
            })?;
        }
        None => fs::write(&layout.stylesheet, DEFAULT_STYLESHEET)?,
    }
    Ok(())
}

/// Run the full pipeline: stylesheet → convert → page → archive.
pub fn build(
    backend: &impl ToolBackend,
    options: &BuildOptions,
    config: &GalleryConfig,
    progress: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, SiteError> {
    validate_photos_dir(&options.photos_dir)?;
    let layout = SiteLayout::create(&options.site_dir)?;
    let progress = progress.as_ref();
    let stage = |s: Stage| {
        if let Some(tx) = progress {
            let _ = tx.send(BuildEvent::StageStarted(s));
        }
    };

    stage(Stage::Stylesheet);
    write_stylesheet(&layout, config)?;

    stage(Stage::Convert);
    let converted = convert::convert_all(
        backend,
        &options.photos_dir,
        &layout.jpg_dir,
        Quality::new(config.images.quality),
        progress,
    )?;

    stage(Stage::Page);
    let page = generate::build_page(
        backend,
        &layout,
        &converted,
        &config.title,
        config.images.thumbnail_width,
        progress,
    )?;

    let archive = if options.skip_archive {
        None
    } else {
        stage(Stage::Archive);
        Some(archive::package(
            backend,
            &layout.root,
            &layout.archive,
            &config.archive.url,
        )?)
    };

    let count = |o: ConvertOutcome| converted.iter().filter(|c| c.outcome == o).count();
    Ok(BuildReport {
        converted: count(ConvertOutcome::Converted),
        copied: count(ConvertOutcome::Copied),
        cached: count(ConvertOutcome::Cached),
        thumbnails_resized: page.resized,
        thumbnails_cached: page.cached,
        photos: page.entries.len(),
        archive,
        layout,
    })
}
