//! Conversion stage: photos directory → `<site>/jpg/`.
//!
//! Each top-level entry of the photos directory is handled by [`try_convert`]:
//!
//! | Source | Action |
//! |---|---|
//! | directory | skipped (no recursion) |
//! | `.heic` / `.heif` | converted with the HEIF tool at the configured quality |
//! | `.jpg` / `.jpeg` | copied byte for byte |
//! | anything else | ignored |
//!
//! Extensions are matched case-insensitively. The output is always
//! `<stem>.jpg`; if it already exists the source is not touched again, even
//! if it changed since. Outputs are never overwritten.

use crate::naming::{self, SourceKind};
use crate::site::BuildEvent;
use crate::tools::{ConvertParams, Quality, ToolBackend, ToolError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use tracing::debug;

/// How a converted image came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertOutcome {
    /// Produced by the HEIF converter during this call.
    Converted,
    /// Copied from a JPEG source during this call.
    Copied,
    /// Already present; nothing was done.
    Cached,
}

/// A JPEG in the site's `jpg/` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub path: PathBuf,
    pub outcome: ConvertOutcome,
}

/// Convert one source file into `output_dir`.
///
/// Returns `Ok(None)` for directories and unsupported formats, with no tool
/// invoked. At most one file is written per call.
pub fn try_convert(
    backend: &impl ToolBackend,
    source: &Path,
    output_dir: &Path,
    quality: Quality,
) -> Result<Option<Converted>, ToolError> {
    if source.is_dir() {
        debug!(path = %source.display(), "skipping directory");
        return Ok(None);
    }
    let Some(kind) = SourceKind::from_path(source) else {
        debug!(path = %source.display(), "not a convertible image");
        return Ok(None);
    };
    let Some(stem) = source.file_stem() else {
        return Ok(None);
    };

    let output = output_dir.join(naming::jpg_file_name(stem));
    if output.exists() {
        debug!(path = %output.display(), "already converted");
        return Ok(Some(Converted {
            path: output,
            outcome: ConvertOutcome::Cached,
        }));
    }

    let outcome = match kind {
        SourceKind::Heif => {
            backend.convert_heif(&ConvertParams {
                source: source.to_path_buf(),
                output: output.clone(),
                quality,
            })?;
            ConvertOutcome::Converted
        }
        SourceKind::Jpeg => {
            fs::copy(source, &output)?;
            ConvertOutcome::Copied
        }
    };

    Ok(Some(Converted {
        path: output,
        outcome,
    }))
}

/// Convert every top-level entry of `photos_dir`, in file name order.
///
/// Sources sharing a stem (`IMG_1.HEIC` and `IMG_1.jpg`) map to the same
/// output; it is converted from whichever comes first and listed once.
pub fn convert_all(
    backend: &impl ToolBackend,
    photos_dir: &Path,
    output_dir: &Path,
    quality: Quality,
    progress: Option<&Sender<BuildEvent>>,
) -> Result<Vec<Converted>, ToolError> {
    let mut sources = fs::read_dir(photos_dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    sources.sort();

    let total = sources.len();
    let mut converted: Vec<Converted> = Vec::new();

    for (idx, source) in sources.iter().enumerate() {
        let result = try_convert(backend, source, output_dir, quality)?;

        if let Some(tx) = progress {
            let _ = tx.send(BuildEvent::SourceHandled {
                index: idx + 1,
                total,
                source: source.clone(),
                result: result.clone(),
            });
        }

        if let Some(image) = result
            && !converted.iter().any(|c| c.path == image.path)
        {
            converted.push(image);
        }
    }

    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{jpeg_bytes, photos_dir, touch, write_jpeg};
    use crate::tools::backend::tests::{MockBackend, RecordedOp};
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let photos = photos_dir(tmp.path());
        let out = tmp.path().join("site/jpg");
        fs::create_dir_all(&out).unwrap();
        (tmp, photos, out)
    }

    #[test]
    fn heif_sources_are_converted_in_any_case() {
        let (_tmp, photos, out) = setup();
        let backend = MockBackend::new();

        for name in ["a.heic", "b.HEIC", "c.heif", "d.HeIf"] {
            let source = touch(&photos, name);
            let result = try_convert(&backend, &source, &out, Quality::new(70))
                .unwrap()
                .unwrap();
            let stem = Path::new(name).file_stem().unwrap();
            assert_eq!(result.path, out.join(naming::jpg_file_name(stem)));
            assert_eq!(result.outcome, ConvertOutcome::Converted);
            assert!(result.path.exists());
        }

        assert_eq!(backend.get_operations().len(), 4);
        assert!(
            backend
                .get_operations()
                .iter()
                .all(|op| matches!(op, RecordedOp::ConvertHeif { quality: 70, .. }))
        );
    }

    #[test]
    fn jpeg_sources_are_copied_byte_for_byte() {
        let (_tmp, photos, out) = setup();
        let backend = MockBackend::new();

        for name in ["a.jpg", "b.JPG", "c.jpeg", "d.JPEG"] {
            let source = write_jpeg(&photos, name, Some("2022:06:01 10:00:00"));
            let result = try_convert(&backend, &source, &out, Quality::default())
                .unwrap()
                .unwrap();
            assert_eq!(result.outcome, ConvertOutcome::Copied);
            assert_eq!(result.path.extension().unwrap(), "jpg");
            assert_eq!(
                fs::read(&result.path).unwrap(),
                jpeg_bytes(Some("2022:06:01 10:00:00"))
            );
        }

        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn unsupported_extensions_yield_nothing() {
        let (_tmp, photos, out) = setup();
        let backend = MockBackend::new();

        for name in ["clip.mov", "notes.txt", "scan.png", "README"] {
            let source = touch(&photos, name);
            assert_eq!(
                try_convert(&backend, &source, &out, Quality::default()).unwrap(),
                None
            );
        }

        assert!(backend.get_operations().is_empty());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn directories_yield_nothing() {
        let (_tmp, photos, out) = setup();
        let backend = MockBackend::new();
        let sub = photos.join("album.heic");
        fs::create_dir_all(&sub).unwrap();

        assert_eq!(
            try_convert(&backend, &sub, &out, Quality::default()).unwrap(),
            None
        );
        assert!(backend.get_operations().is_empty());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn existing_output_is_a_cache_hit() {
        let (_tmp, photos, out) = setup();
        let backend = MockBackend::new();
        let source = touch(&photos, "a.HEIC");
        fs::write(out.join("a.jpg"), "previous run").unwrap();

        let result = try_convert(&backend, &source, &out, Quality::default())
            .unwrap()
            .unwrap();

        assert_eq!(result.outcome, ConvertOutcome::Cached);
        assert!(backend.get_operations().is_empty());
        assert_eq!(fs::read_to_string(out.join("a.jpg")).unwrap(), "previous run");
    }

    #[test]
    fn converter_failure_propagates() {
        let (_tmp, photos, out) = setup();
        let backend = MockBackend::failing(2);
        let source = touch(&photos, "a.heic");

        let err = try_convert(&backend, &source, &out, Quality::default()).unwrap_err();
        assert_eq!(err.exit_code(), Some(2));
    }

    #[test]
    fn convert_all_skips_unsupported_and_dedupes_stems() {
        let (_tmp, photos, out) = setup();
        let backend = MockBackend::new();
        touch(&photos, "IMG_1.HEIC");
        write_jpeg(&photos, "IMG_1.jpg", None);
        write_jpeg(&photos, "IMG_2.jpeg", None);
        touch(&photos, "notes.txt");
        fs::create_dir_all(photos.join("nested")).unwrap();

        let converted = convert_all(&backend, &photos, &out, Quality::default(), None).unwrap();

        let names: Vec<_> = converted
            .iter()
            .map(|c| c.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["IMG_1.jpg", "IMG_2.jpg"]);
        // IMG_1.HEIC sorts first and wins; IMG_1.jpg then hits the cache.
        assert_eq!(converted[0].outcome, ConvertOutcome::Converted);
        assert_eq!(backend.get_operations().len(), 1);
    }

    #[test]
    fn convert_all_reports_progress_for_every_entry() {
        let (_tmp, photos, out) = setup();
        let backend = MockBackend::new();
        touch(&photos, "a.heic");
        touch(&photos, "b.txt");
        let (tx, rx) = std::sync::mpsc::channel();

        convert_all(&backend, &photos, &out, Quality::default(), Some(&tx)).unwrap();
        drop(tx);

        let events: Vec<_> = rx.iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            BuildEvent::SourceHandled { index: 1, total: 2, result: Some(_), .. }
        ));
        assert!(matches!(
            &events[1],
            BuildEvent::SourceHandled { index: 2, total: 2, result: None, .. }
        ));
    }
}
