//! Media resolution for disk-image emulators.
//!
//! ## Scope
//! Turns a user- or frontend-supplied path into the exact bytes of a disk
//! image, whether the image is a plain file, a gzip stream, or a member of a
//! zip archive. Zip archives can also be browsed as a directory tree without
//! extracting them.
//!
//! ## Key invariants
//! - A load returns either an error or a buffer whose length is exactly the
//!   number of bytes read; no buffer ever carries an unfilled tail.
//! - Every file, archive, and member stream is released when the call
//!   returns, on success and on every error path.
//! - Buffers are sized once from a known length and bounded by
//!   `LoaderConfig::max_image_bytes`.
//! - Normalized paths contain no `.` or `..` segments and never exceed the
//!   configured path capacity.
//!
//! ## Load flow
//! `path -> extension substitution -> container detection ->
//! {plain read | gzip discover+rewind+read | zip select+extract} -> MediaImage`
//!
//! ## Notable entry points
//! - `MediaLoader`: the unified loader (`load`, `load_archive_member`,
//!   `browse_archive`).
//! - `list_children` / `navigate`: virtual directory view over zip entries.
//! - `path`: split/join/normalize/shorten/ascend helpers for UI code.
//! - `DriveBay`: per-drive image bookkeeping for a four-drive frontend.

pub mod archive;
pub mod config;
pub mod drives;
pub mod error;
pub mod fs;
pub mod loader;
pub mod path;
pub mod resolve;
#[cfg(test)]
pub mod test_utils;

pub use archive::{
    detect_media_kind, extract, list_children, navigate, select_member, ArchiveEntry,
    ListingEntry, MediaKind, VirtualDirectoryListing, ZipArchive, ZipError, PARENT_MARKER,
};
pub use config::{LoaderConfig, LoaderConfigError, SuffixCase};
pub use drives::{DriveBay, DriveSlot, InsertError, DRIVE_COUNT, DRIVE_IMAGE_EXTS};
pub use error::LoadError;
pub use fs::{make_valid_dir_path, FsProbe, HostDirs, HostFs};
pub use loader::{MediaImage, MediaLoader};
pub use resolve::find_with_extensions;
