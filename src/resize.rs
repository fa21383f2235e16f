//! Resize stage: `<site>/jpg/<stem>.jpg` → `<site>/jpg/small/<stem>_small.jpg`.

use crate::naming;
use crate::tools::{ResizeParams, ToolBackend, ToolError};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    Resized,
    Cached,
}

/// Make sure a thumbnail exists for `jpg` and return its path.
///
/// The resizer runs only when the thumbnail is missing; an existing one is
/// kept as is. Either way the returned path is safe to link to.
pub fn resize(
    backend: &impl ToolBackend,
    jpg: &Path,
    small_dir: &Path,
    width: u32,
) -> Result<(PathBuf, ResizeOutcome), ToolError> {
    let stem = jpg.file_stem().unwrap_or(jpg.as_os_str());
    let output = small_dir.join(naming::thumbnail_file_name(stem));

    if output.exists() {
        debug!(path = %output.display(), "thumbnail exists");
        return Ok((output, ResizeOutcome::Cached));
    }

    backend.resize(&ResizeParams {
        source: jpg.to_path_buf(),
        output: output.clone(),
        width,
    })?;
    Ok((output, ResizeOutcome::Resized))
}
