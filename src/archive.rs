//! Redbean archive packaging.
//!
//! [redbean](https://redbean.dev) is a single-file web server that serves the
//! contents of a zip appended to its own executable. Packaging a site is:
//!
//! 1. download the redbean binary
//! 2. mark it executable
//! 3. `zip -r` the site directory into it, run from inside the site so entry
//!    names are `index.html`, `jpg/...`. Dotfiles are left out.
//!
//! The archive is `<site>.com` next to the site directory. It is created once:
//! if it exists, packaging is skipped entirely, even if the site changed.
//!
//! The download and zip go to `<site>.com.part`, which is renamed into place
//! only after both succeed. A failed run leaves no `<site>.com` behind, so the
//! next run does not mistake a truncated download for a finished archive.

use crate::tools::{ToolBackend, ToolError};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    Created(PathBuf),
    /// The archive was already there; nothing was fetched or zipped.
    Existing(PathBuf),
}

impl ArchiveOutcome {
    pub fn path(&self) -> &Path {
        match self {
            ArchiveOutcome::Created(p) | ArchiveOutcome::Existing(p) => p,
        }
    }
}

/// Package `site_dir` into the redbean archive at `archive`.
pub fn package(
    backend: &impl ToolBackend,
    site_dir: &Path,
    archive: &Path,
    url: &str,
) -> Result<ArchiveOutcome, ToolError> {
    if archive.exists() {
        return Ok(ArchiveOutcome::Existing(archive.to_path_buf()));
    }

    let partial = partial_path(archive);

    info!(%url, "downloading redbean binary");
    backend.fetch(url, &partial)?;
    mark_executable(&partial)?;

    info!(site = %site_dir.display(), "adding site assets to redbean");
    backend.zip_dir(site_dir, &partial)?;

    fs::rename(&partial, archive)?;
    Ok(ArchiveOutcome::Created(archive.to_path_buf()))
}

fn partial_path(archive: &Path) -> PathBuf {
    let mut name: OsString = archive.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o755);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
