//! CLI output formatting.
//!
//! Each piece of output has a `format_*` function returning lines (pure, no
//! I/O, unit tested) and, where the binary needs one, a `print_*` wrapper.
//!
//! ```text
//! ==> Writing stylesheet
//! ==> Converting photos
//! [1/3] IMG_0001.HEIC → IMG_0001.jpg (converted)
//! [2/3] IMG_0002.jpg → IMG_0002.jpg (cached)
//! [3/3] notes.txt (skipped)
//! ==> Building index page
//! [1/2] IMG_0002_small.jpg (cached)
//! [2/2] IMG_0001_small.jpg (resized)
//! ==> Packaging redbean archive
//!
//! 2 photos: 1 converted, 0 copied, 1 cached
//! Thumbnails: 1 resized, 1 cached
//! Site: /home/me/website
//! Archive: /home/me/website.com
//! ```

use crate::archive::ArchiveOutcome;
use crate::convert::ConvertOutcome;
use crate::resize::ResizeOutcome;
use crate::site::{BuildEvent, BuildReport, Stage};
use std::path::Path;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format a `[n/total]` progress counter.
fn counter(index: usize, total: usize) -> String {
    format!("[{index}/{total}]")
}

fn stage_title(stage: Stage) -> &'static str {
    match stage {
        Stage::Stylesheet => "Writing stylesheet",
        Stage::Convert => "Converting photos",
        Stage::Page => "Building index page",
        Stage::Archive => "Packaging redbean archive",
    }
}

/// Format a progress event.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::StageStarted(stage) => vec![format!("==> {}", stage_title(*stage))],
        BuildEvent::SourceHandled {
            index,
            total,
            source,
            result,
        } => {
            let line = match result {
                Some(converted) => {
                    let status = match converted.outcome {
                        ConvertOutcome::Converted => "converted",
                        ConvertOutcome::Copied => "copied",
                        ConvertOutcome::Cached => "cached",
                    };
                    format!(
                        "{} {} → {} ({})",
                        counter(*index, *total),
                        file_name(source),
                        file_name(&converted.path),
                        status
                    )
                }
                None => format!("{} {} (skipped)", counter(*index, *total), file_name(source)),
            };
            vec![line]
        }
        BuildEvent::ThumbnailReady {
            index,
            total,
            thumbnail,
            outcome,
        } => {
            let status = match outcome {
                ResizeOutcome::Resized => "resized",
                ResizeOutcome::Cached => "cached",
            };
            vec![format!(
                "{} {} ({})",
                counter(*index, *total),
                file_name(thumbnail),
                status
            )]
        }
    }
}

/// Format the archive result. An existing archive gets an explicit skip notice.
pub fn format_archive_outcome(outcome: &ArchiveOutcome) -> String {
    let path = outcome.path().display();
    match outcome {
        ArchiveOutcome::Created(_) => format!("Archive: {path}"),
        ArchiveOutcome::Existing(_) => {
            format!("Redbean archive {path} already exists. Skipping.")
        }
    }
}

/// Format the end-of-build summary.
pub fn format_summary(report: &BuildReport) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!(
            "{} photos: {} converted, {} copied, {} cached",
            report.photos, report.converted, report.copied, report.cached
        ),
        format!(
            "Thumbnails: {} resized, {} cached",
            report.thumbnails_resized, report.thumbnails_cached
        ),
        format!("Site: {}", report.layout.root.display()),
    ];
    match &report.archive {
        Some(outcome) => lines.push(format_archive_outcome(outcome)),
        None => lines.push("Archive: skipped".to_string()),
    }
    lines
}

pub fn print_build_event(event: &BuildEvent) {
    for line in format_build_event(event) {
        println!("{}", line);
    }
}

pub fn print_summary(report: &BuildReport) {
    for line in format_summary(report) {
        println!("{}", line);
    }
}
