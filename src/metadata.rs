//! Capture timestamp extraction.
//!
//! The gallery is ordered by the EXIF `DateTime` tag of the primary image
//! (what most tools show as "Image DateTime"). Its value is a fixed-width
//! `YYYY:MM:DD HH:MM:SS` string, so plain string comparison orders it
//! chronologically and no date parsing is needed.
//!
//! A missing tag is a normal outcome, not an error: images without one get an
//! empty timestamp and sort before everything else.

use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use tracing::debug;

/// Read the `Image DateTime` tag of `path`.
///
/// Returns an empty string when the file has no EXIF data or no such tag.
/// Only failing to open the file is an error.
pub fn capture_timestamp(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let exif = match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(err) => {
            debug!(path = %path.display(), %err, "no readable EXIF data");
            return Ok(String::new());
        }
    };

    Ok(exif
        .get_field(Tag::DateTime, In::PRIMARY)
        .map(|field| match &field.value {
            Value::Ascii(parts) => parts
                .first()
                .map(|p| String::from_utf8_lossy(p).trim().to_string())
                .unwrap_or_default(),
            _ => field.display_value().to_string(),
        })
        .unwrap_or_default())
}
