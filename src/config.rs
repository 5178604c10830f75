//! Loader policy and hard limits.
//!
//! # Invariants
//! - All limits are hard bounds and must be internally consistent.
//! - Media files and archives are untrusted: sizes, counts, and names are
//!   checked against these caps before any buffer is sized.
//!
//! # Design Notes
//! - Defaults mirror the classic frontend: 4 KiB paths, 1 KiB gzip probe
//!   reads, and `.d64`/`.t64`/`.c64` as the default disk image suffixes.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::path::MAX_PATH_LEN;

/// How container suffixes (`.gz`, `.zip`) are matched against a path.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuffixCase {
    /// Byte-exact match: `disk.GZ` is read as a plain file.
    #[default]
    Exact = 0,
    /// ASCII case-insensitive match: `disk.GZ` is decompressed.
    IgnoreAscii = 1,
}

/// Shared media loader configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Maximum length (bytes) of a normalized host path.
    pub max_path_len: usize,
    /// Maximum size of a loaded image, after decompression.
    pub max_image_bytes: u64,
    /// Chunk size for the gzip length-discovery pass.
    pub gzip_probe_chunk: usize,
    /// Maximum number of central-directory entries read from a zip archive.
    pub max_archive_entries: u32,
    /// Suffix matching mode for container detection.
    pub container_suffix_case: SuffixCase,
    /// Member suffixes scanned when loading from an archive without an
    /// explicit member name.
    pub disk_image_exts: Vec<String>,
}

/// Validation error returned by `LoaderConfig::validate`.
///
/// Each variant corresponds to a violated invariant. Callers should treat
/// this as a configuration bug (not hostile input).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoaderConfigError {
    MaxPathLenTooSmall { max_path_len: usize },
    MaxImageBytesZero,
    GzipProbeChunkZero,
    GzipProbeChunkTooLarge { chunk: usize, max_image_bytes: u64 },
    MaxArchiveEntriesZero,
    DiskImageExtInvalid { ext: String },
}

impl fmt::Display for LoaderConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderConfigError::MaxPathLenTooSmall { max_path_len } => {
                write!(f, "max_path_len must be >= 2 (got {max_path_len})")
            }
            LoaderConfigError::MaxImageBytesZero => write!(f, "max_image_bytes must be > 0"),
            LoaderConfigError::GzipProbeChunkZero => write!(f, "gzip_probe_chunk must be > 0"),
            LoaderConfigError::GzipProbeChunkTooLarge {
                chunk,
                max_image_bytes,
            } => write!(
                f,
                "gzip_probe_chunk must be <= max_image_bytes (chunk={chunk}, max={max_image_bytes})"
            ),
            LoaderConfigError::MaxArchiveEntriesZero => {
                write!(f, "max_archive_entries must be > 0")
            }
            LoaderConfigError::DiskImageExtInvalid { ext } => {
                write!(f, "disk image extension must start with '.' and be non-empty: {ext:?}")
            }
        }
    }
}

impl std::error::Error for LoaderConfigError {}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_path_len: MAX_PATH_LEN,
            max_image_bytes: 64 * 1024 * 1024, // 64 MiB
            gzip_probe_chunk: 1024,
            max_archive_entries: 4096,
            container_suffix_case: SuffixCase::Exact,
            disk_image_exts: vec![".d64".into(), ".t64".into(), ".c64".into()],
        }
    }
}

impl LoaderConfig {
    /// Validate cross-field invariants.
    ///
    /// Cheap; call once at startup.
    pub fn validate(&self) -> Result<(), LoaderConfigError> {
        // Room for at least a root separator plus one byte.
        if self.max_path_len < 2 {
            return Err(LoaderConfigError::MaxPathLenTooSmall {
                max_path_len: self.max_path_len,
            });
        }
        if self.max_image_bytes == 0 {
            return Err(LoaderConfigError::MaxImageBytesZero);
        }
        if self.gzip_probe_chunk == 0 {
            return Err(LoaderConfigError::GzipProbeChunkZero);
        }
        if self.gzip_probe_chunk as u64 > self.max_image_bytes {
            return Err(LoaderConfigError::GzipProbeChunkTooLarge {
                chunk: self.gzip_probe_chunk,
                max_image_bytes: self.max_image_bytes,
            });
        }
        if self.max_archive_entries == 0 {
            return Err(LoaderConfigError::MaxArchiveEntriesZero);
        }
        if let Some(ext) = self
            .disk_image_exts
            .iter()
            .find(|e| e.len() < 2 || !e.starts_with('.'))
        {
            return Err(LoaderConfigError::DiskImageExtInvalid { ext: ext.clone() });
        }
        Ok(())
    }

    /// Read a JSON config file. Missing fields take their defaults.
    ///
    /// The result is not validated; call [`LoaderConfig::validate`].
    pub fn from_json_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Default disk image suffixes as borrowed candidates.
    pub fn disk_image_candidates(&self) -> Vec<&str> {
        self.disk_image_exts.iter().map(String::as_str).collect()
    }
}
