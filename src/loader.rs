//! Unified media loader: path in, exact-length bytes out.
//!
//! # Algorithm
//! 1. When the path is missing and candidates were given, substitute the
//!    extension (first existing `dir/name + candidate`); with no substitute
//!    the original path is kept and the open below fails cleanly.
//! 2. `.gz`: decompress once in `gzip_probe_chunk` reads to learn the
//!    length, rewind, allocate exactly that, and read in one pass.
//! 3. `.zip`: list the central directory, select a member, and extract it
//!    using the member's declared uncompressed size.
//! 4. Otherwise: seek to the end for the length, seek back, allocate, read.
//!
//! # Invariants
//! - A failed load returns an error and no bytes; there is no partial image.
//! - Files, archives, and member streams are closed on every exit path
//!   (they are dropped when the call returns).
//! - Buffers never exceed `max_image_bytes`.
//! - Nothing is cached between calls.

use std::fs::File;
use std::io::{Seek, SeekFrom};

use tracing::{debug, info};

use crate::archive::formats::{ArchiveEntry, GzipStream, ZipArchive};
use crate::archive::select::read_sized;
use crate::archive::{
    detect_media_kind, extract, list_children, select_member, MediaKind, VirtualDirectoryListing,
};
use crate::config::LoaderConfig;
use crate::error::LoadError;
use crate::fs::{FsProbe, HostFs};
use crate::resolve::find_with_extensions;

/// A loaded disk image. The caller owns the bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaImage {
    /// Host path that was actually opened (after extension substitution).
    pub path: String,
    pub kind: MediaKind,
    /// Archive member the bytes came from, for zip sources.
    pub member: Option<String>,
    pub bytes: Vec<u8>,
}

impl MediaImage {
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Media loader bound to a configuration and a filesystem probe.
///
/// The probe only answers existence questions for extension substitution;
/// bytes are always read through `std::fs`.
#[derive(Clone, Debug)]
pub struct MediaLoader<P = HostFs> {
    cfg: LoaderConfig,
    probe: P,
}

impl MediaLoader<HostFs> {
    pub fn new(cfg: LoaderConfig) -> Self {
        Self::with_probe(cfg, HostFs)
    }
}

impl<P: FsProbe> MediaLoader<P> {
    /// `cfg` should already be validated.
    pub fn with_probe(cfg: LoaderConfig, probe: P) -> Self {
        debug_assert!(cfg.validate().is_ok(), "invalid loader config");
        Self { cfg, probe }
    }

    #[inline]
    pub fn config(&self) -> &LoaderConfig {
        &self.cfg
    }

    #[inline]
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Load `path` as a plain, gzip, or zip source.
    ///
    /// `candidates` drives both extension substitution and zip member
    /// selection; `None` skips substitution and takes the first member.
    pub fn load(&self, path: &str, candidates: Option<&[&str]>) -> Result<MediaImage, LoadError> {
        let path = self.substitute(path, candidates);
        let kind = detect_media_kind(&path, self.cfg.container_suffix_case);
        debug!(path = %path, kind = kind.as_str(), "loading media");

        let image = match kind {
            MediaKind::Gzip => {
                let bytes = self.read_gzip(&path)?;
                MediaImage {
                    path,
                    kind,
                    member: None,
                    bytes,
                }
            }
            MediaKind::Zip => {
                let mut archive = self.open_archive(&path)?;
                let index = select_member(archive.entries(), candidates).ok_or_else(|| {
                    LoadError::MemberNotFound {
                        archive: path.clone(),
                    }
                })?;
                self.extract_member(&mut archive, index, path)?
            }
            MediaKind::Plain => {
                let bytes = self.read_plain(&path)?;
                MediaImage {
                    path,
                    kind,
                    member: None,
                    bytes,
                }
            }
        };

        info!(
            path = %image.path,
            kind = image.kind.as_str(),
            member = image.member.as_deref().unwrap_or(""),
            bytes = image.len(),
            "media loaded"
        );
        Ok(image)
    }

    /// Load one member of the zip archive at `archive`.
    ///
    /// An explicit `member` must match an entry name exactly. Without one,
    /// the first entry carrying a configured disk image extension is used.
    /// A zero-length member counts as missing.
    pub fn load_archive_member(
        &self,
        archive: &str,
        member: Option<&str>,
    ) -> Result<MediaImage, LoadError> {
        let mut zip = self.open_archive(archive)?;
        let defaults = self.cfg.disk_image_candidates();
        let index = match member {
            Some(name) => zip.locate(name),
            None => select_member(zip.entries(), Some(defaults.as_slice())),
        };
        let index = index
            .filter(|&i| zip.entries()[i].uncompressed_size > 0)
            .ok_or_else(|| LoadError::MemberNotFound {
                archive: archive.to_string(),
            })?;

        let image = self.extract_member(&mut zip, index, archive.to_string())?;
        info!(
            path = %image.path,
            member = image.member.as_deref().unwrap_or(""),
            bytes = image.len(),
            "archive member loaded"
        );
        Ok(image)
    }

    /// Central-directory listing of `archive`, in archive order.
    pub fn archive_entries(&self, archive: &str) -> Result<Vec<ArchiveEntry>, LoadError> {
        Ok(self.open_archive(archive)?.into_entries())
    }

    /// Virtual directory listing of `prefix` inside `archive`.
    pub fn browse_archive(
        &self,
        archive: &str,
        prefix: &str,
    ) -> Result<VirtualDirectoryListing, LoadError> {
        let entries = self.archive_entries(archive)?;
        Ok(list_children(&entries, prefix))
    }

    fn substitute(&self, path: &str, candidates: Option<&[&str]>) -> String {
        if let Some(exts) = candidates {
            if !self.probe.exists(path) {
                if let Some(found) = find_with_extensions(path, exts, &self.probe) {
                    debug!(from = %path, to = %found, "extension substituted");
                    return found;
                }
                debug!(path = %path, "no extension substitute");
            }
        }
        path.to_string()
    }

    fn read_plain(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        let mut file = File::open(path).map_err(|e| LoadError::open(path, e))?;
        let len = file
            .seek(SeekFrom::End(0))
            .map_err(|e| LoadError::read(path, e))?;
        file.seek(SeekFrom::Start(0))
            .map_err(|e| LoadError::read(path, e))?;
        read_sized(&mut file, len, self.cfg.max_image_bytes, path)
    }

    fn read_gzip(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        let file = File::open(path).map_err(|e| LoadError::open(path, e))?;
        let mut stream = GzipStream::new(file);

        let mut scratch = Vec::with_capacity(self.cfg.gzip_probe_chunk);
        let len = stream
            .discover_len(
                &mut scratch,
                self.cfg.gzip_probe_chunk,
                self.cfg.max_image_bytes,
            )
            .map_err(|e| LoadError::read(path, e))?;
        debug!(
            path = %path,
            uncompressed = len,
            compressed = stream.total_compressed(),
            "gzip length discovered"
        );
        drop(scratch);

        let mut stream = stream.rewind().map_err(|e| LoadError::read(path, e))?;
        read_sized(&mut stream, len, self.cfg.max_image_bytes, path)
    }

    fn open_archive(&self, path: &str) -> Result<ZipArchive<File>, LoadError> {
        let file = File::open(path).map_err(|e| LoadError::open(path, e))?;
        let archive = ZipArchive::open(file, self.cfg.max_archive_entries).map_err(|e| {
            LoadError::OpenFailed {
                path: path.to_string(),
                source: e.into(),
            }
        })?;
        debug!(path = %path, entries = archive.entries().len(), "archive opened");
        Ok(archive)
    }

    fn extract_member(
        &self,
        archive: &mut ZipArchive<File>,
        index: usize,
        path: String,
    ) -> Result<MediaImage, LoadError> {
        let entry = &archive.entries()[index];
        let name = entry.name.clone();
        let size = entry.uncompressed_size;
        debug!(archive = %path, member = %name, size, "member selected");

        let bytes = extract(archive, index, size, self.cfg.max_image_bytes, &path)?;
        Ok(MediaImage {
            path,
            kind: MediaKind::Zip,
            member: Some(name),
            bytes,
        })
    }
}
