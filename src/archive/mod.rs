//! Archive handling: container detection, zip/gzip readers, the virtual
//! directory view over zip entries, and member selection/extraction.
//!
//! # Design Notes
//! - Archive handles are scoped to one call; nothing is cached across calls.
//! - Entry names are untrusted: listing and selection only compare them,
//!   they are never joined onto host paths.

pub mod detect;
pub mod formats;
pub mod index;
pub mod select;

pub use detect::{detect_media_kind, MediaKind};
pub use formats::{ArchiveEntry, GzipStream, ZipArchive, ZipError};
pub use index::{list_children, navigate, ListingEntry, VirtualDirectoryListing, PARENT_MARKER};
pub use select::{extract, select_member};
