//! Shared test utilities.
//!
//! Builds minimal JPEG files with an optional EXIF `DateTime` tag, so ordering
//! can be tested without binary fixtures, and sets up photo directories.

use std::fs;
use std::path::{Path, PathBuf};

/// Bytes of a minimal JPEG: SOI, an optional APP1 EXIF segment carrying only
/// IFD0 `DateTime`, and EOI. No image data; only the metadata reader and
/// byte-for-byte copies ever look at these.
pub fn jpeg_bytes(datetime: Option<&str>) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];

    if let Some(dt) = datetime {
        let mut ascii = dt.as_bytes().to_vec();
        ascii.push(0);

        // Big-endian TIFF header, IFD0 at offset 8 with a single entry.
        let mut tiff = Vec::new();
        tiff.extend_from_slice(b"MM\x00\x2A");
        tiff.extend_from_slice(&8u32.to_be_bytes());
        tiff.extend_from_slice(&1u16.to_be_bytes());
        tiff.extend_from_slice(&0x0132u16.to_be_bytes()); // DateTime
        tiff.extend_from_slice(&2u16.to_be_bytes()); // ASCII
        tiff.extend_from_slice(&(ascii.len() as u32).to_be_bytes());
        tiff.extend_from_slice(&26u32.to_be_bytes()); // value follows the IFD
        tiff.extend_from_slice(&0u32.to_be_bytes()); // no IFD1
        tiff.extend_from_slice(&ascii);

        let mut app1 = b"Exif\x00\x00".to_vec();
        app1.extend_from_slice(&tiff);

        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
        out.extend_from_slice(&app1);
    }

    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

/// Write a minimal JPEG named `name` into `dir` and return its path.
pub fn write_jpeg(dir: &Path, name: &str, datetime: Option<&str>) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, jpeg_bytes(datetime)).unwrap();
    path
}

/// Create an empty file (stand-in for a HEIC or unsupported source).
pub fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"").unwrap();
    path
}

/// Create `<tmp>/photos` and return it.
pub fn photos_dir(tmp: &Path) -> PathBuf {
    let dir = tmp.join("photos");
    fs::create_dir_all(&dir).unwrap();
    dir
}
