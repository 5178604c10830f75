//! Floppy drive bay: which image (and archive member) sits in which drive.
//!
//! The bay holds four drives, numbered 8 to 11 on the emulated bus and
//! indexed 0 to 3 here. Inserting resolves the image name the same way the
//! loader does, normalizes it, and refuses an image that already sits in
//! another drive. A failed insert leaves every slot untouched.

use thiserror::Error;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::fs::FsProbe;
use crate::loader::{MediaImage, MediaLoader};
use crate::path::{shorten, PathNormalizer, MAX_PATH_LEN};
use crate::resolve::find_with_extensions;

pub const DRIVE_COUNT: usize = 4;

/// Bus number of drive index 0.
pub const FIRST_DRIVE_NUMBER: usize = 8;

/// Suffixes tried when an inserted image name does not exist as given.
pub const DRIVE_IMAGE_EXTS: &[&str] = &[".d64", ".t64", ".x64", ".lnx", ".zip"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InsertError {
    #[error("no drive with index {drive} (bay has {} drives)", DRIVE_COUNT)]
    BadDrive { drive: usize },
    #[error("no disk image found for {name}")]
    NotFound { name: String },
    #[error("image path too long: {name}")]
    PathTooLong { name: String },
    #[error("{path} is already inserted in drive {}", FIRST_DRIVE_NUMBER + .other)]
    AlreadyInserted { path: String, other: usize },
}

/// One occupied drive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriveSlot {
    /// Normalized host path of the image or archive.
    pub image: String,
    /// Member chosen inside a zip archive, if any.
    pub member: Option<String>,
}

#[derive(Clone, Debug)]
pub struct DriveBay {
    slots: [Option<DriveSlot>; DRIVE_COUNT],
    max_path_len: usize,
}

impl Default for DriveBay {
    fn default() -> Self {
        Self::new(MAX_PATH_LEN)
    }
}

impl DriveBay {
    pub fn new(max_path_len: usize) -> Self {
        Self {
            slots: Default::default(),
            max_path_len,
        }
    }

    /// Put `name` into `drive`.
    ///
    /// An empty name or `none` (any case) ejects instead and returns
    /// `Ok(None)`. A name that does not exist is retried with
    /// [`DRIVE_IMAGE_EXTS`].
    pub fn insert<P: FsProbe + ?Sized>(
        &mut self,
        drive: usize,
        name: &str,
        member: Option<&str>,
        fs: &P,
    ) -> Result<Option<&DriveSlot>, InsertError> {
        if drive >= DRIVE_COUNT {
            return Err(InsertError::BadDrive { drive });
        }
        if name.is_empty() || name.eq_ignore_ascii_case("none") {
            self.eject(drive);
            return Ok(None);
        }

        let resolved = if fs.exists(name) {
            name.to_string()
        } else {
            find_with_extensions(name, DRIVE_IMAGE_EXTS, fs).ok_or_else(|| {
                InsertError::NotFound {
                    name: name.to_string(),
                }
            })?
        };

        let mut normalizer = PathNormalizer::with_capacity(self.max_path_len);
        let normalized = normalizer.normalize(&resolved, fs);
        if normalized.truncated {
            return Err(InsertError::PathTooLong {
                name: name.to_string(),
            });
        }
        let image = normalized.path.to_string();

        if let Some(other) = self.slots.iter().enumerate().position(|(i, slot)| {
            i != drive && slot.as_ref().is_some_and(|s| s.image == image)
        }) {
            return Err(InsertError::AlreadyInserted { path: image, other });
        }

        info!(
            drive = FIRST_DRIVE_NUMBER + drive,
            image = %image,
            member = member.unwrap_or(""),
            "disk inserted"
        );
        let slot: &DriveSlot = self.slots[drive].insert(DriveSlot {
            image,
            member: member.map(str::to_owned),
        });
        Ok(Some(slot))
    }

    /// Empty `drive`. Out-of-range indexes are ignored.
    pub fn eject(&mut self, drive: usize) {
        if let Some(slot) = self.slots.get_mut(drive) {
            if slot.take().is_some() {
                debug!(drive = FIRST_DRIVE_NUMBER + drive, "disk ejected");
            }
        }
    }

    pub fn slot(&self, drive: usize) -> Option<&DriveSlot> {
        self.slots.get(drive)?.as_ref()
    }

    /// Image path of `drive` shortened to `width` characters for display.
    pub fn display_name(&self, drive: usize, width: usize) -> Option<String> {
        self.slot(drive).map(|s| shorten(&s.image, width))
    }

    /// Load the image in `drive`. Returns `Ok(None)` for an empty drive.
    pub fn load<P: FsProbe>(
        &self,
        drive: usize,
        loader: &MediaLoader<P>,
    ) -> Result<Option<MediaImage>, LoadError> {
        let Some(slot) = self.slot(drive) else {
            return Ok(None);
        };
        let image = match slot.member.as_deref() {
            Some(member) => loader.load_archive_member(&slot.image, Some(member))?,
            None => loader.load(&slot.image, Some(DRIVE_IMAGE_EXTS))?,
        };
        Ok(Some(image))
    }
}
