//! Parameter types for tool invocations.
//!
//! These structs describe *what* to produce, not *how*. The stages decide
//! which files need work and hand a params struct to the
//! [`backend`](super::backend), which does the actual subprocess call. This
//! separation lets tests swap in a recording mock without touching stage logic.

use std::path::PathBuf;

/// JPEG quality passed to the HEIF converter (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(70)
    }
}

/// Parameters for a HEIC/HEIF → JPEG conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub quality: Quality,
}

/// Parameters for a fixed-width, aspect-preserving resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
}
