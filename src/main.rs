use clap::Parser;
use photo_site::config;
use photo_site::output;
use photo_site::site::{self, BuildOptions, SiteError};
use photo_site::tools::CommandBackend;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "photo-site")]
#[command(version)]
#[command(about = "Turn a folder of photos into a static web gallery")]
#[command(long_about = "\
Turn a folder of photos into a static web gallery

HEIC/HEIF photos are converted to JPEG, JPEGs are copied, every image gets a
500px-wide thumbnail, and index.html lists them in capture-time order
(EXIF DateTime). Finally the site is zipped into a redbean web server, a
single executable that serves it.

Output:

  website/
  ├── index.html
  ├── style.css
  └── jpg/
      ├── IMG_0001.jpg
      └── small/
          └── IMG_0001_small.jpg
  website.com                      # redbean archive (unless --skip_redbean)

Existing outputs are never regenerated: delete a file to rebuild it.

Requires heif-convert, ImageMagick `convert`, curl and zip on PATH
(program names can be changed in gallery.toml; see --gen-config).")]
struct Cli {
    /// Photos directory to process
    #[arg(long, default_value = ".")]
    photos: PathBuf,

    /// Output directory
    #[arg(long, default_value = "./website")]
    site: PathBuf,

    /// Do not create a redbean archive at the end. Useful during development.
    #[arg(long = "skip_redbean", visible_alias = "skip-redbean")]
    skip_redbean: bool,

    /// Gallery config file [default: <photos>/gallery.toml if present]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print a stock gallery.toml with all options documented and exit
    #[arg(long)]
    gen_config: bool,

    /// Log every tool invocation
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return ExitCode::SUCCESS;
    }

    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), SiteError> {
    site::validate_photos_dir(&cli.photos)?;
    let config = config::load_config(&cli.photos, cli.config.as_deref())?;
    let backend = CommandBackend::new(config.tools.clone());

    let options = BuildOptions {
        photos_dir: cli.photos.clone(),
        site_dir: cli.site.clone(),
        skip_archive: cli.skip_redbean,
    };

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_build_event(&event);
        }
    });
    let result = site::build(&backend, &options, &config, Some(tx));
    // The sender is dropped inside build, so the printer drains and exits.
    let _ = printer.join();

    let report = result?;
    output::print_summary(&report);
    Ok(())
}

/// Log to stderr. `--verbose` forces debug level; otherwise `RUST_LOG`
/// applies, defaulting to info.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
