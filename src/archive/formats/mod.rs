//! Container readers used by the loader and the archive browser.
//!
//! # Design Notes
//! - Both readers are bounded: every declared size is checked against the
//!   source length before use.

pub mod gzip;
pub mod zip;

pub use gzip::{CountedRead, GzipStream};
pub use zip::{ArchiveEntry, LimitedRead, MemberReader, ZipArchive, ZipError};
