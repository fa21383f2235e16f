//! Output naming conventions.
//!
//! Every generated file name is a pure function of the source image's stem.
//! That is what makes reruns idempotent: the stages decide whether work is
//! needed by checking whether the derived path already exists.
//!
//! ```text
//! photos/IMG_0001.HEIC  →  site/jpg/IMG_0001.jpg  →  site/jpg/small/IMG_0001_small.jpg
//! ```

use percent_encoding::{AsciiSet, CONTROLS};
use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

/// Converted images directory, relative to the site root.
pub const JPG_DIR: &str = "jpg";
/// Thumbnail directory, relative to [`JPG_DIR`].
pub const SMALL_DIR: &str = "small";
pub const INDEX_FILE: &str = "index.html";
pub const STYLESHEET_FILE: &str = "style.css";
/// Extension of the packaged redbean archive.
pub const ARCHIVE_EXTENSION: &str = "com";

/// Characters escaped inside a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Source formats the conversion stage knows how to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `.heic` / `.heif`: converted with the HEIF tool.
    Heif,
    /// `.jpg` / `.jpeg`: copied byte for byte.
    Jpeg,
}

impl SourceKind {
    /// Classify a path by extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("heic") || ext.eq_ignore_ascii_case("heif") {
            Some(SourceKind::Heif)
        } else if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") {
            Some(SourceKind::Jpeg)
        } else {
            None
        }
    }
}

/// `<stem>.jpg`
pub fn jpg_file_name(stem: &OsStr) -> OsString {
    let mut name = stem.to_os_string();
    name.push(".jpg");
    name
}

/// `<stem>_small.jpg`
pub fn thumbnail_file_name(stem: &OsStr) -> OsString {
    let mut name = stem.to_os_string();
    name.push("_small.jpg");
    name
}

/// `<parent>/<site name>.com`, or `None` when the site path has no final
/// component to name the archive after.
pub fn archive_path(site_root: &Path) -> Option<PathBuf> {
    let name = site_root.file_name()?;
    let mut file = name.to_os_string();
    file.push(".");
    file.push(ARCHIVE_EXTENSION);
    Some(site_root.with_file_name(file))
}

/// URL of `path` relative to `root`: `/`-separated, segments percent-encoded.
///
/// Returns `None` if `path` is not inside `root`.
pub fn relative_url(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let segments: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(encode_segment(s)),
            _ => None,
        })
        .collect();
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Percent-encode one file name. On unix the raw bytes are encoded, so a
/// name that is not valid UTF-8 still maps back to the file on disk.
#[cfg(unix)]
fn encode_segment(segment: &OsStr) -> String {
    use std::os::unix::ffi::OsStrExt;
    percent_encoding::percent_encode(segment.as_bytes(), PATH_SEGMENT).to_string()
}

#[cfg(not(unix))]
fn encode_segment(segment: &OsStr) -> String {
    percent_encoding::utf8_percent_encode(&segment.to_string_lossy(), PATH_SEGMENT).to_string()
}
