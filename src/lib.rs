//! # photo-site
//!
//! Turns a directory of phone photos (HEIC/HEIF and JPEG) into a static web
//! gallery, and optionally into a single redbean executable that serves it.
//!
//! # Pipeline
//!
//! ```text
//! 1. Convert   photos/*.{heic,heif,jpg,jpeg}  →  site/jpg/<stem>.jpg
//! 2. Order     EXIF DateTime of each JPEG     →  capture-time order
//! 3. Resize    site/jpg/<stem>.jpg            →  site/jpg/small/<stem>_small.jpg
//! 4. Page      ordered images                 →  site/index.html
//! 5. Archive   site/                          →  site.com (optional)
//! ```
//!
//! The heavy lifting is done by external programs (`heif-convert`,
//! ImageMagick `convert`, `curl`, `zip`), run one at a time. The first
//! failing tool aborts the build with that tool's exit code.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`site`] | Output layout and the build sequence |
//! | [`convert`] | Stage 1: HEIF conversion and JPEG copy |
//! | [`metadata`] | EXIF `DateTime` reader used for ordering |
//! | [`resize`] | Thumbnail creation |
//! | [`generate`] | `index.html` rendering with Maud |
//! | [`archive`] | Redbean download and zip |
//! | [`tools`] | [`ToolBackend`](tools::ToolBackend) trait and the subprocess backend |
//! | [`naming`] | Output file names derived from source stems |
//! | [`config`] | Optional `gallery.toml` |
//! | [`output`] | CLI progress and summary formatting |
//!
//! # Design Decisions
//!
//! ## The Filesystem Is the Cache
//!
//! Output names are pure functions of the source stem, and a stage skips any
//! output that already exists. There is no manifest or hash store: deleting a
//! file is how you ask for it to be rebuilt, and rerunning after a failure
//! resumes where it stopped. The flip side is that an edited source photo is
//! not picked up until its outputs are removed.
//!
//! ## Tools Behind a Trait
//!
//! Stages never spawn processes themselves; they call a
//! [`ToolBackend`](tools::ToolBackend). Production uses
//! [`CommandBackend`](tools::CommandBackend), and the test suite uses a
//! recording mock, so idempotence and ordering are tested without any of the
//! tools installed.

pub mod archive;
pub mod config;
pub mod convert;
pub mod generate;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod resize;
pub mod site;
pub mod tools;

#[cfg(test)]
pub(crate) mod test_helpers;
