//! External tool plumbing.
//!
//! Every expensive step of a build is delegated to a command-line tool:
//!
//! | Operation | Default program | Invocation |
//! |---|---|---|
//! | **HEIC/HEIF → JPEG** | `heif-convert` | `heif-convert <src> -q <quality> <dst>` |
//! | **Thumbnail** | `convert` (ImageMagick) | `convert <src> -resize <width> <dst>` |
//! | **Fetch** | `curl` | `curl -fsSL <url> -o <dst>` |
//! | **Zip** | `zip` | `zip -r <archive> .` (run inside the site directory) |
//!
//! The module is split into:
//! - **Parameters**: Data structures describing a conversion or resize
//! - **Backend**: [`ToolBackend`] trait + [`ToolError`]
//! - **Command**: [`CommandBackend`], the subprocess implementation, and [`run`]

pub mod backend;
pub mod command;
mod params;

pub use backend::{ToolBackend, ToolError};
pub use command::{CommandBackend, run};
pub use params::{ConvertParams, Quality, ResizeParams};
