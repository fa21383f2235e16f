//! Subprocess backend.
//!
//! [`run`] is the single place a child process is started: stdout is
//! discarded, stderr is inherited so tool diagnostics reach the terminal, and
//! any non-zero exit becomes a [`ToolError::Failed`] carrying the tool's exit
//! code. There is no timeout and no retry.

use super::backend::{ToolBackend, ToolError};
use super::params::{ConvertParams, ResizeParams};
use crate::config::ToolsConfig;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Run `program` with `args`, optionally inside `cwd`, and wait for it.
pub fn run<I, S>(program: &str, args: I, cwd: Option<&Path>) -> Result<(), ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args).stdout(Stdio::null());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    debug!(command = ?cmd, cwd = ?cwd, "running tool");
    let status = cmd.status().map_err(|source| ToolError::Spawn {
        program: program.to_string(),
        source,
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(ToolError::Failed {
            program: program.to_string(),
            code: status.code(),
        })
    }
}

/// Production backend: one subprocess per operation, program names taken
/// from the `[tools]` config section.
#[derive(Debug, Clone)]
pub struct CommandBackend {
    tools: ToolsConfig,
}

impl CommandBackend {
    pub fn new(tools: ToolsConfig) -> Self {
        Self { tools }
    }
}

impl Default for CommandBackend {
    fn default() -> Self {
        Self::new(ToolsConfig::default())
    }
}

impl ToolBackend for CommandBackend {
    fn convert_heif(&self, params: &ConvertParams) -> Result<(), ToolError> {
        let quality = params.quality.value().to_string();
        run(
            &self.tools.heif_convert,
            [
                params.source.as_os_str(),
                OsStr::new("-q"),
                OsStr::new(&quality),
                params.output.as_os_str(),
            ],
            None,
        )
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), ToolError> {
        let width = params.width.to_string();
        run(
            &self.tools.resize,
            [
                params.source.as_os_str(),
                OsStr::new("-resize"),
                OsStr::new(&width),
                params.output.as_os_str(),
            ],
            None,
        )
    }

    fn fetch(&self, url: &str, dest: &Path) -> Result<(), ToolError> {
        run(
            &self.tools.fetch,
            [
                OsStr::new("-fsSL"),
                OsStr::new(url),
                OsStr::new("-o"),
                dest.as_os_str(),
            ],
            None,
        )
    }

    fn zip_dir(&self, dir: &Path, archive: &Path) -> Result<(), ToolError> {
        // `-q` keeps zip's per-file listing off stderr; stdout is already discarded.
        // Dotfiles (`.DS_Store` and the like) stay out of the archive.
        run(
            &self.tools.zip,
            [
                OsStr::new("-q"),
                OsStr::new("-r"),
                archive.as_os_str(),
                OsStr::new("."),
                OsStr::new("-x"),
                OsStr::new(".*"),
                OsStr::new("*/.*"),
            ],
            Some(dir),
        )
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn run_succeeds_on_zero_exit() {
        run("true", std::iter::empty::<&str>(), None).unwrap();
    }

    #[test]
    fn run_surfaces_exit_code() {
        let err = run("sh", ["-c", "exit 7"], None).unwrap_err();
        assert!(matches!(
            &err,
            ToolError::Failed { program, code: Some(7) } if program == "sh"
        ));
        assert_eq!(err.exit_code(), Some(7));
    }

    #[test]
    fn run_reports_missing_program() {
        let err = run("photo-site-no-such-tool", ["--help"], None).unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn run_uses_working_directory() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("marker"), "").unwrap();

        run("sh", ["-c", "test -f marker"], Some(tmp.path())).unwrap();
        assert!(run("sh", ["-c", "test -f marker"], None).is_err());
    }

    #[test]
    fn configured_program_names_are_used() {
        let backend = CommandBackend::new(ToolsConfig {
            resize: "photo-site-missing-resizer".into(),
            ..ToolsConfig::default()
        });
        let err = backend
            .resize(&ResizeParams {
                source: "a.jpg".into(),
                output: "a_small.jpg".into(),
                width: 500,
            })
            .unwrap_err();
        assert!(matches!(
            err,
            ToolError::Spawn { ref program, .. } if program == "photo-site-missing-resizer"
        ));
    }

    /// Backend whose every tool is a script recording its arguments, one per
    /// line, into `args.txt`.
    fn recording_backend(tmp: &Path) -> CommandBackend {
        use std::os::unix::fs::PermissionsExt;
        let script = tmp.join("record-args");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\n",
                tmp.join("args.txt").display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        let program = script.to_string_lossy().to_string();
        CommandBackend::new(ToolsConfig {
            heif_convert: program.clone(),
            resize: program.clone(),
            fetch: program.clone(),
            zip: program,
        })
    }

    fn recorded_args(tmp: &Path) -> Vec<String> {
        std::fs::read_to_string(tmp.join("args.txt"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn convert_heif_passes_quality_between_source_and_output() {
        let tmp = TempDir::new().unwrap();
        let backend = recording_backend(tmp.path());

        backend
            .convert_heif(&ConvertParams {
                source: "/photos/a.heic".into(),
                output: "/site/jpg/a.jpg".into(),
                quality: crate::tools::Quality::new(70),
            })
            .unwrap();

        assert_eq!(
            recorded_args(tmp.path()),
            ["/photos/a.heic", "-q", "70", "/site/jpg/a.jpg"]
        );
    }

    #[test]
    fn resize_passes_width() {
        let tmp = TempDir::new().unwrap();
        let backend = recording_backend(tmp.path());

        backend
            .resize(&ResizeParams {
                source: "/site/jpg/a.jpg".into(),
                output: "/site/jpg/small/a_small.jpg".into(),
                width: 500,
            })
            .unwrap();

        assert_eq!(
            recorded_args(tmp.path()),
            ["/site/jpg/a.jpg", "-resize", "500", "/site/jpg/small/a_small.jpg"]
        );
    }

    #[test]
    fn fetch_passes_url_and_destination() {
        let tmp = TempDir::new().unwrap();
        let backend = recording_backend(tmp.path());

        backend
            .fetch(
                "https://redbean.dev/redbean-latest.com",
                Path::new("/tmp/website.com.part"),
            )
            .unwrap();

        assert_eq!(
            recorded_args(tmp.path()),
            [
                "-fsSL",
                "https://redbean.dev/redbean-latest.com",
                "-o",
                "/tmp/website.com.part"
            ]
        );
    }

    #[test]
    fn zip_dir_archives_site_contents_without_dotfiles() {
        let tmp = TempDir::new().unwrap();
        let backend = recording_backend(tmp.path());

        backend
            .zip_dir(tmp.path(), Path::new("/tmp/website.com.part"))
            .unwrap();

        assert_eq!(
            recorded_args(tmp.path()),
            ["-q", "-r", "/tmp/website.com.part", ".", "-x", ".*", "*/.*"]
        );
    }

    #[test]
    #[ignore] // Requires zip
    fn zip_dir_stores_relative_entries() {
        let tmp = TempDir::new().unwrap();
        let site = tmp.path().join("site");
        std::fs::create_dir_all(site.join("jpg")).unwrap();
        std::fs::write(site.join("index.html"), "<html></html>").unwrap();
        std::fs::write(site.join("jpg/a.jpg"), "jpeg").unwrap();
        std::fs::write(site.join(".DS_Store"), "").unwrap();
        let archive = tmp.path().join("site.com");

        CommandBackend::default().zip_dir(&site, &archive).unwrap();

        let listing = std::process::Command::new("unzip")
            .args(["-Z1", archive.to_str().unwrap()])
            .output()
            .unwrap();
        let names = String::from_utf8_lossy(&listing.stdout);
        assert!(names.lines().any(|l| l == "index.html"));
        assert!(names.lines().any(|l| l == "jpg/a.jpg"));
        assert!(!names.lines().any(|l| l.contains(".DS_Store")));
    }
}
