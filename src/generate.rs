//! Gallery page generation.
//!
//! Produces the single `index.html` of the site. Converted images are ordered
//! by capture timestamp (see [`metadata`](crate::metadata)), each one gets its
//! thumbnail made on the way (see [`resize`](crate::resize)), and the page
//! links every thumbnail to its full-size JPEG:
//!
//! ```text
//! site/
//! ├── index.html                   # this module
//! ├── style.css
//! └── jpg/
//!     ├── IMG_0001.jpg             # <a href="jpg/IMG_0001.jpg">
//!     └── small/
//!         └── IMG_0001_small.jpg   # <img src="jpg/small/IMG_0001_small.jpg" loading="lazy">
//! ```
//!
//! All links are relative to the site root, so the directory can be moved or
//! served from any prefix. The page is rewritten in full on every run.
//!
//! HTML is generated with [maud](https://maud.lambda.xyz/): the structure is
//! fixed at compile time and every interpolated value is escaped.

use crate::convert::Converted;
use crate::metadata;
use crate::naming;
use crate::resize::{self, ResizeOutcome};
use crate::site::{BuildEvent, SiteLayout};
use crate::tools::{ToolBackend, ToolError};
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error("{0} is outside the site directory")]
    OutsideSite(PathBuf),
}

/// One photo on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryEntry {
    /// Capture timestamp used for ordering; empty when unknown.
    pub captured: String,
    pub image: PathBuf,
    pub thumbnail: PathBuf,
    /// Link to the full-size image, relative to the site root.
    pub href: String,
    /// Thumbnail source, relative to the site root.
    pub src: String,
}

/// What [`build_page`] did.
#[derive(Debug, Default)]
pub struct PageReport {
    pub entries: Vec<GalleryEntry>,
    pub resized: usize,
    pub cached: usize,
}

/// Pair each image with its capture timestamp and order by it.
///
/// The sort is stable: images with equal timestamps keep their input order,
/// and images without one (empty string) come first.
pub fn sort_by_capture_time(images: &[PathBuf]) -> std::io::Result<Vec<(String, PathBuf)>> {
    let mut keyed = images
        .iter()
        .map(|p| Ok((metadata::capture_timestamp(p)?, p.clone())))
        .collect::<std::io::Result<Vec<_>>>()?;
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(keyed)
}

/// Order the converted images, make their thumbnails, and write `index.html`.
pub fn build_page(
    backend: &impl ToolBackend,
    layout: &SiteLayout,
    converted: &[Converted],
    title: &str,
    thumbnail_width: u32,
    progress: Option<&Sender<BuildEvent>>,
) -> Result<PageReport, GenerateError> {
    let images: Vec<PathBuf> = converted.iter().map(|c| c.path.clone()).collect();
    let sorted = sort_by_capture_time(&images)?;
    let total = sorted.len();
    let mut report = PageReport::default();

    for (idx, (captured, image)) in sorted.into_iter().enumerate() {
        let (thumbnail, outcome) =
            resize::resize(backend, &image, &layout.small_dir, thumbnail_width)?;
        match outcome {
            ResizeOutcome::Resized => report.resized += 1,
            ResizeOutcome::Cached => report.cached += 1,
        }

        if let Some(tx) = progress {
            let _ = tx.send(BuildEvent::ThumbnailReady {
                index: idx + 1,
                total,
                thumbnail: thumbnail.clone(),
                outcome,
            });
        }

        report.entries.push(GalleryEntry {
            href: site_url(&layout.root, &image)?,
            src: site_url(&layout.root, &thumbnail)?,
            captured,
            image,
            thumbnail,
        });
    }

    let page = render_index(title, &report.entries);
    fs::write(&layout.index, page.into_string())?;
    Ok(report)
}

fn site_url(root: &Path, path: &Path) -> Result<String, GenerateError> {
    naming::relative_url(root, path).ok_or_else(|| GenerateError::OutsideSite(path.to_path_buf()))
}

/// Renders the gallery page.
pub fn render_index(title: &str, entries: &[GalleryEntry]) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link href=(naming::STYLESHEET_FILE) rel="stylesheet" type="text/css";
            }
            body {
                h1 { (title) }
                @for entry in entries {
                    div.photo {
                        a href=(entry.href) {
                            img src=(entry.src) loading="lazy";
                        }
                    }
                }
            }
        }
    }
}
