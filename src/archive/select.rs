//! Member selection and in-memory extraction.
//!
//! # Invariants
//! - With no candidate list the first entry wins unconditionally.
//! - With a candidate list the lowest-index matching entry wins; candidate
//!   order never reorders entries.
//! - Extraction yields either the member bytes or an error, never a buffer
//!   with an undefined tail. The member stream is closed on every path.

use std::io::{self, Read, Seek};

use tracing::debug;

use super::formats::ZipArchive;
use crate::error::{alloc_exact, LoadError};
use crate::path::has_extension;

/// Pick the member to load from `names`.
///
/// Suffix matching is ASCII case-insensitive.
pub fn select_member<S: AsRef<str>>(names: &[S], candidates: Option<&[&str]>) -> Option<usize> {
    match candidates {
        None => (!names.is_empty()).then_some(0),
        Some(exts) => names
            .iter()
            .position(|name| exts.iter().any(|ext| has_extension(name.as_ref(), ext))),
    }
}

/// Read entry `index` of `archive` into a buffer of `expected_size` bytes.
///
/// A stream that ends early yields the bytes actually read. Bytes past
/// `expected_size` are never read.
pub fn extract<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
    expected_size: u64,
    limit: u64,
    archive_path: &str,
) -> Result<Vec<u8>, LoadError> {
    // Size the buffer before touching the member stream.
    let buf = alloc_exact(expected_size, limit)?;
    let mut member = archive
        .open_member(index)
        .map_err(|e| LoadError::OpenFailed {
            path: archive_path.to_string(),
            source: e.into(),
        })?;
    fill_buffer(&mut member, buf, expected_size, archive_path)
}

/// Allocate `len` bytes (bounded by `limit`) and fill them from `reader`.
pub(crate) fn read_sized<R: Read + ?Sized>(
    reader: &mut R,
    len: u64,
    limit: u64,
    path: &str,
) -> Result<Vec<u8>, LoadError> {
    let buf = alloc_exact(len, limit)?;
    fill_buffer(reader, buf, len, path)
}

// `buf` has capacity for `len` bytes, which alloc_exact proved fits in usize.
fn fill_buffer<R: Read + ?Sized>(
    reader: &mut R,
    mut buf: Vec<u8>,
    len: u64,
    path: &str,
) -> Result<Vec<u8>, LoadError> {
    buf.resize(len as usize, 0);
    let mut filled = 0usize;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(LoadError::read(path, e)),
        }
    }
    if filled < buf.len() {
        debug!(path = %path, expected = len, got = filled, "short read");
        buf.truncate(filled);
    }
    Ok(buf)
}
