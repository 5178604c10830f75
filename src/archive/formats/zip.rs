//! Zip32 reader: central-directory listing and per-member decompression.
//!
//! # Invariants
//! - All sizes/offsets are untrusted and validated against the archive length.
//! - The central directory is read once at open; members are read on demand.
//! - A member reader borrows the archive mutably, so at most one member
//!   stream is open per archive handle and it is closed when dropped.
//!
//! # Supported
//! - Zip32 (EOCD + central directory).
//! - Entries: stored (method 0) and deflate (method 8).
//!
//! # Not Supported
//! - Zip64 (sentinel 0xFFFF/0xFFFFFFFF fields).
//! - Multi-disk archives.
//! - Encrypted entries (flag bit 0) are listed but cannot be opened.

use std::io::{self, Read, Seek, SeekFrom};

use flate2::read::DeflateDecoder;
use thiserror::Error;

const SIG_EOCD: u32 = 0x0605_4b50;
const SIG_CDFH: u32 = 0x0201_4b50;
const SIG_LFH: u32 = 0x0403_4b50;

const EOCD_MIN_LEN: usize = 22;
const EOCD_SEARCH_MAX: usize = 66 * 1024; // 64 KiB comment + header margin

/// Central directory fixed header length.
const CDFH_LEN: usize = 46;
/// Local file header fixed length.
const LFH_LEN: usize = 30;

/// Zip container failure.
#[derive(Debug, Error)]
pub enum ZipError {
    #[error("zip i/o: {0}")]
    Io(#[from] io::Error),
    #[error("malformed zip: {0}")]
    Malformed(&'static str),
    #[error("unsupported zip feature: {0}")]
    Unsupported(&'static str),
    #[error("zip lists {count} entries (limit {limit})")]
    TooManyEntries { count: u32, limit: u32 },
}

impl From<ZipError> for io::Error {
    fn from(err: ZipError) -> Self {
        match err {
            ZipError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

/// Central-directory metadata for one member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Member name as stored (`/`-separated, lossy UTF-8).
    pub name: String,
    /// Declared uncompressed size.
    pub uncompressed_size: u64,
    pub compressed_size: u64,
    pub method: u16,
    pub flags: u16,
    pub local_header_offset: u64,
}

impl ArchiveEntry {
    #[inline(always)]
    pub fn is_dir(&self) -> bool {
        self.name.ends_with('/')
    }

    #[inline(always)]
    pub fn is_encrypted(&self) -> bool {
        (self.flags & 0x0001) != 0
    }

    #[inline(always)]
    pub fn compression_supported(&self) -> bool {
        self.method == 0 || self.method == 8
    }
}

impl AsRef<str> for ArchiveEntry {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

/// Open zip archive with its central directory already listed.
///
/// The handle is closed when dropped.
pub struct ZipArchive<R> {
    reader: R,
    len: u64,
    entries: Vec<ArchiveEntry>,
}

impl<R: Read + Seek> ZipArchive<R> {
    /// Locate the end-of-central-directory record and list every entry.
    ///
    /// Fails on Zip64 or multi-disk archives, on more than `max_entries`
    /// entries, and on any offset that points outside the archive.
    pub fn open(mut reader: R, max_entries: u32) -> Result<Self, ZipError> {
        let len = reader.seek(SeekFrom::End(0))?;
        if len < EOCD_MIN_LEN as u64 {
            return Err(ZipError::Malformed("too short for end of central directory"));
        }

        // Read tail window (bounded by the maximum comment length).
        let win_len = (len as usize).min(EOCD_SEARCH_MAX);
        let win_off = len - win_len as u64;
        let mut win = vec![0u8; win_len];
        reader.seek(SeekFrom::Start(win_off))?;
        reader.read_exact(&mut win)?;

        let eocd_rel =
            find_eocd(&win).ok_or(ZipError::Malformed("end of central directory not found"))?;
        let eocd = &win[eocd_rel..];

        let disk_no = le_u16(&eocd[4..6]);
        let cd_disk = le_u16(&eocd[6..8]);
        let entries_disk = le_u16(&eocd[8..10]);
        let entries_total = le_u16(&eocd[10..12]);
        let cd_size = le_u32(&eocd[12..16]);
        let cd_off = le_u32(&eocd[16..20]);

        if disk_no != 0 || cd_disk != 0 || entries_disk != entries_total {
            return Err(ZipError::Unsupported("multi-disk archive"));
        }
        if entries_total == 0xFFFF || cd_size == 0xFFFF_FFFF || cd_off == 0xFFFF_FFFF {
            return Err(ZipError::Unsupported("zip64"));
        }
        if u32::from(entries_total) > max_entries {
            return Err(ZipError::TooManyEntries {
                count: u32::from(entries_total),
                limit: max_entries,
            });
        }

        let cd_off = u64::from(cd_off);
        let cd_end = cd_off.saturating_add(u64::from(cd_size));
        if cd_end > len {
            return Err(ZipError::Malformed("central directory out of bounds"));
        }

        let mut cd = vec![0u8; cd_size as usize];
        reader.seek(SeekFrom::Start(cd_off))?;
        reader.read_exact(&mut cd)?;

        let entries = parse_central_directory(&cd, entries_total as usize, len)?;
        Ok(Self {
            reader,
            len,
            entries,
        })
    }

    /// Entries in central-directory order.
    #[inline]
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Index of the first entry named exactly `name`.
    pub fn locate(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Open a decompressing reader over the payload of entry `index`.
    pub fn open_member(&mut self, index: usize) -> Result<MemberReader<'_, R>, ZipError> {
        let entry = self
            .entries
            .get(index)
            .ok_or(ZipError::Malformed("entry index out of range"))?;
        if entry.is_encrypted() {
            return Err(ZipError::Unsupported("encrypted entry"));
        }
        if !entry.compression_supported() {
            return Err(ZipError::Unsupported("compression method"));
        }
        let method = entry.method;
        let compressed_size = entry.compressed_size;
        let lfh_off = entry.local_header_offset;

        if lfh_off.saturating_add(LFH_LEN as u64) > self.len {
            return Err(ZipError::Malformed("local header out of bounds"));
        }
        self.reader.seek(SeekFrom::Start(lfh_off))?;
        let mut lfh = [0u8; LFH_LEN];
        self.reader.read_exact(&mut lfh)?;
        if le_u32(&lfh[0..4]) != SIG_LFH {
            return Err(ZipError::Malformed("bad local header signature"));
        }

        let name_len = u64::from(le_u16(&lfh[26..28]));
        let extra_len = u64::from(le_u16(&lfh[28..30]));
        let data_start = lfh_off
            .saturating_add(LFH_LEN as u64)
            .saturating_add(name_len)
            .saturating_add(extra_len);
        let data_end = data_start.saturating_add(compressed_size);
        if data_end > self.len {
            return Err(ZipError::Malformed("member data out of bounds"));
        }

        self.reader.seek(SeekFrom::Start(data_start))?;
        let take = LimitedRead::new(&mut self.reader, compressed_size);
        Ok(match method {
            0 => MemberReader::Stored(take),
            _ => MemberReader::Deflate(DeflateDecoder::new(take)),
        })
    }

    /// Drop the reader and keep the listing.
    pub fn into_entries(self) -> Vec<ArchiveEntry> {
        self.entries
    }
}

fn parse_central_directory(
    cd: &[u8],
    count: usize,
    archive_len: u64,
) -> Result<Vec<ArchiveEntry>, ZipError> {
    let mut entries = Vec::with_capacity(count);
    let mut pos = 0usize;

    for _ in 0..count {
        let hdr = cd
            .get(pos..pos + CDFH_LEN)
            .ok_or(ZipError::Malformed("central directory truncated"))?;
        if le_u32(&hdr[0..4]) != SIG_CDFH {
            return Err(ZipError::Malformed("bad central directory signature"));
        }

        let flags = le_u16(&hdr[8..10]);
        let method = le_u16(&hdr[10..12]);
        let comp_size = le_u32(&hdr[20..24]);
        let uncomp_size = le_u32(&hdr[24..28]);
        let name_len = le_u16(&hdr[28..30]) as usize;
        let extra_len = le_u16(&hdr[30..32]) as usize;
        let comment_len = le_u16(&hdr[32..34]) as usize;
        let lfh_off = le_u32(&hdr[42..46]);

        // Zip64 sentinel in CDFH -> unsupported.
        if comp_size == 0xFFFF_FFFF || uncomp_size == 0xFFFF_FFFF || lfh_off == 0xFFFF_FFFF {
            return Err(ZipError::Unsupported("zip64 entry"));
        }
        if u64::from(lfh_off) >= archive_len {
            return Err(ZipError::Malformed("local header offset out of bounds"));
        }

        let name_start = pos + CDFH_LEN;
        let name = cd
            .get(name_start..name_start + name_len)
            .ok_or(ZipError::Malformed("entry name truncated"))?;

        entries.push(ArchiveEntry {
            name: String::from_utf8_lossy(name).into_owned(),
            uncompressed_size: u64::from(uncomp_size),
            compressed_size: u64::from(comp_size),
            method,
            flags,
            local_header_offset: u64::from(lfh_off),
        });

        pos = name_start + name_len + extra_len + comment_len;
    }

    Ok(entries)
}

/// Decompressed reader for one member.
pub enum MemberReader<'a, R> {
    Stored(LimitedRead<'a, R>),
    Deflate(DeflateDecoder<LimitedRead<'a, R>>),
}

impl<R: Read> Read for MemberReader<'_, R> {
    #[inline]
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        match self {
            MemberReader::Stored(r) => r.read(dst),
            MemberReader::Deflate(r) => r.read(dst),
        }
    }
}

/// Read wrapper that limits reads to a fixed number of bytes.
///
/// This bounds member payload reads to the compressed size.
pub struct LimitedRead<'a, R: ?Sized> {
    inner: &'a mut R,
    remaining: u64,
}

impl<'a, R: ?Sized + Read> LimitedRead<'a, R> {
    #[inline]
    pub fn new(inner: &'a mut R, remaining: u64) -> Self {
        Self { inner, remaining }
    }

    #[inline]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl<R: ?Sized + Read> Read for LimitedRead<'_, R> {
    #[inline]
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return Ok(0);
        }
        let max = self.remaining.min(dst.len() as u64) as usize;
        let n = self.inner.read(&mut dst[..max])?;
        self.remaining = self.remaining.saturating_sub(n as u64);
        Ok(n)
    }
}

// Scan backward for an EOCD whose comment fits inside the window; a
// signature inside the comment itself is skipped.
fn find_eocd(win: &[u8]) -> Option<usize> {
    if win.len() < EOCD_MIN_LEN {
        return None;
    }
    let mut i = win.len() - EOCD_MIN_LEN;
    loop {
        if le_u32(&win[i..i + 4]) == SIG_EOCD {
            let comment_len = le_u16(&win[i + 20..i + 22]) as usize;
            if i + EOCD_MIN_LEN + comment_len <= win.len() {
                return Some(i);
            }
        }
        if i == 0 {
            return None;
        }
        i -= 1;
    }
}

#[inline(always)]
fn le_u16(b: &[u8]) -> u16 {
    u16::from_le_bytes([b[0], b[1]])
}

#[inline(always)]
fn le_u32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}
