//! Tool backend trait and shared error type.
//!
//! The [`ToolBackend`] trait defines the four operations a build needs:
//! convert_heif, resize, fetch, and zip_dir. The production implementation is
//! [`CommandBackend`](super::command::CommandBackend), which shells out to the
//! configured programs. Stages only ever see the trait, so tests can count
//! invocations with a mock instead of requiring the tools to be installed.

use super::params::{ConvertParams, ResizeParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with {}", .code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}")))]
    Failed { program: String, code: Option<i32> },
}

impl ToolError {
    /// Exit code reported by the failing tool, if it exited normally.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ToolError::Failed { code, .. } => *code,
            _ => None,
        }
    }
}

/// Trait for the external tools a build shells out to.
///
/// Every call blocks until the tool finishes and fails on a non-zero exit.
pub trait ToolBackend {
    /// Convert a HEIC/HEIF image to JPEG.
    fn convert_heif(&self, params: &ConvertParams) -> Result<(), ToolError>;

    /// Write a fixed-width copy of a JPEG.
    fn resize(&self, params: &ResizeParams) -> Result<(), ToolError>;

    /// Download `url` into `dest`.
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), ToolError>;

    /// Recursively append the contents of `dir` to the zip at `archive`,
    /// with entry names relative to `dir`.
    fn zip_dir(&self, dir: &Path, archive: &Path) -> Result<(), ToolError>;
}
