//! Storage shape detection.
//!
//! # Invariants
//! - Detection is suffix-based and does no I/O.
//! - Under [`SuffixCase::Exact`] only lowercase `.gz` / `.zip` count;
//!   `disk.GZ` is a plain file.
//!
//! # Design Notes
//! - Suffixes are matched on the whole path string, so a directory named
//!   `foo.zip/` followed by a file is still judged by the file name.

use crate::config::SuffixCase;
use crate::path::ends_with_ignore_ascii_case;

/// How a media path is stored on the host.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Plain = 0,
    Gzip = 1,
    Zip = 2,
}

impl MediaKind {
    #[inline(always)]
    pub const fn is_compressed(self) -> bool {
        !matches!(self, MediaKind::Plain)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            MediaKind::Plain => "plain",
            MediaKind::Gzip => "gzip",
            MediaKind::Zip => "zip",
        }
    }
}

/// Classify `path` by its container suffix.
pub fn detect_media_kind(path: &str, case: SuffixCase) -> MediaKind {
    let b = path.as_bytes();
    let matches = |suf: &[u8]| match case {
        SuffixCase::Exact => b.ends_with(suf),
        SuffixCase::IgnoreAscii => ends_with_ignore_ascii_case(b, suf),
    };
    if matches(b".gz") {
        MediaKind::Gzip
    } else if matches(b".zip") {
        MediaKind::Zip
    } else {
        MediaKind::Plain
    }
}
