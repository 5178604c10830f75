//! media-resolve CLI
//!
//! Loads disk images from plain, gzip, and zip sources, lists zip archives
//! as directory trees, and shows how paths normalize and shorten.
//!
//! # Output Format
//!
//! - `load`: `path=<p> kind=<plain|gzip|zip> member=<m> bytes=<n>`
//! - `ls`: one entry per line, prefixed `..`, `d`, or `f`
//! - `path`: `normalized=`, `shortened=`, and `ascended=` lines
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG=debug` to see
//! extension probes and member selection.
//!
//! # Exit Codes
//!
//! - `0`: Success
//! - `1`: The media or archive could not be loaded
//! - `2`: Invalid arguments or configuration error

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use media_resolver::path::{ascend, shorten, PathNormalizer};
use media_resolver::{HostFs, ListingEntry, LoaderConfig, MediaLoader};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "media-resolve")]
#[command(about = "Resolve disk images from plain, gzip, and zip sources")]
#[command(version)]
struct Cli {
    /// JSON loader configuration (missing fields take defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load an image and report what was read
    Load {
        /// Image, .gz, or .zip path
        path: String,

        /// Candidate extensions, comma separated (e.g. .d64,.t64)
        #[arg(long, value_delimiter = ',')]
        ext: Vec<String>,

        /// Exact archive member to load (zip sources only)
        #[arg(long)]
        member: Option<String>,
    },

    /// List a directory inside a zip archive
    Ls {
        /// Zip archive path
        archive: String,

        /// Directory prefix inside the archive (empty for the root)
        #[arg(default_value = "")]
        prefix: String,
    },

    /// Show normalized, shortened, and ascended forms of a path
    Path {
        path: String,

        /// Display width for the shortened form
        #[arg(long, default_value_t = 40)]
        width: usize,

        /// Number of trailing segments to strip
        #[arg(long, default_value_t = 1)]
        up: usize,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => match LoaderConfig::from_json_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("cannot read config {}: {e}", path.display());
                return ExitCode::from(2);
            }
        },
        None => LoaderConfig::default(),
    };
    if let Err(e) = cfg.validate() {
        eprintln!("invalid config: {e}");
        return ExitCode::from(2);
    }

    match cli.command {
        Commands::Load { path, ext, member } => run_load(cfg, &path, &ext, member.as_deref()),
        Commands::Ls { archive, prefix } => run_ls(cfg, &archive, &prefix),
        Commands::Path { path, width, up } => run_path(cfg, &path, width, up),
    }
}

fn run_load(cfg: LoaderConfig, path: &str, ext: &[String], member: Option<&str>) -> ExitCode {
    let loader = MediaLoader::new(cfg);
    let exts: Vec<&str> = ext.iter().map(String::as_str).collect();
    let candidates = (!exts.is_empty()).then_some(exts.as_slice());

    let result = match member {
        Some(name) => loader.load_archive_member(path, Some(name)),
        None => loader.load(path, candidates),
    };
    match result {
        Ok(image) => {
            println!(
                "path={} kind={} member={} bytes={}",
                image.path,
                image.kind.as_str(),
                image.member.as_deref().unwrap_or("-"),
                image.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            warn!(path = %path, error = e.name(), "load failed");
            eprintln!("{e}");
            ExitCode::from(1)
        }
    }
}

fn run_ls(cfg: LoaderConfig, archive: &str, prefix: &str) -> ExitCode {
    let loader = MediaLoader::new(cfg);
    match loader.browse_archive(archive, prefix) {
        Ok(listing) => {
            for entry in &listing {
                let tag = match entry {
                    ListingEntry::Parent => "..",
                    ListingEntry::Dir(_) => "d",
                    ListingEntry::File(_) => "f",
                };
                println!("{tag} {}", entry.name());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            warn!(archive = %archive, error = e.name(), "listing failed");
            eprintln!("{e}");
            ExitCode::from(1)
        }
    }
}

fn run_path(cfg: LoaderConfig, path: &str, width: usize, up: usize) -> ExitCode {
    let mut normalizer = PathNormalizer::with_capacity(cfg.max_path_len);
    let normalized = normalizer.normalize(path, &HostFs);
    if normalized.truncated {
        warn!(max_path_len = cfg.max_path_len, "path truncated");
    }
    println!("normalized={}", normalized.path);
    println!("shortened={}", shorten(normalized.path, width));
    println!("ascended={}", ascend(normalized.path, up));
    ExitCode::SUCCESS
}
