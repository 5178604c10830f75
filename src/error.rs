//! Load failure taxonomy.
//!
//! Every failure is returned to the immediate caller with no partial data.
//! None of them is fatal; the caller decides whether to retry with another
//! path, fall back to a default image, or surface the error.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    /// The path and every extension substitute are absent.
    #[error("media not found: {path}")]
    NotFound { path: String },

    /// The file or archive exists but could not be opened.
    #[error("cannot open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The underlying stream reported an error mid-read.
    #[error("read failed for {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: io::Error,
    },

    /// No archive entry matches the requested name or candidate list.
    #[error("no matching member in archive {archive}")]
    MemberNotFound { archive: String },

    /// A buffer of the required size could not be allocated.
    #[error("cannot allocate {requested} bytes (limit {limit})")]
    AllocationFailed { requested: u64, limit: u64 },
}

impl LoadError {
    /// Stable short name for logs and CLI output.
    pub const fn name(&self) -> &'static str {
        match self {
            LoadError::NotFound { .. } => "not_found",
            LoadError::OpenFailed { .. } => "open_failed",
            LoadError::ReadFailed { .. } => "read_failed",
            LoadError::MemberNotFound { .. } => "member_not_found",
            LoadError::AllocationFailed { .. } => "allocation_failed",
        }
    }

    pub(crate) fn open(path: &str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_string(),
            }
        } else {
            LoadError::OpenFailed {
                path: path.to_string(),
                source,
            }
        }
    }

    pub(crate) fn read(path: &str, source: io::Error) -> Self {
        LoadError::ReadFailed {
            path: path.to_string(),
            source,
        }
    }
}

/// Reserve exactly `len` bytes, honoring `limit`.
pub(crate) fn alloc_exact(len: u64, limit: u64) -> Result<Vec<u8>, LoadError> {
    let fail = || LoadError::AllocationFailed {
        requested: len,
        limit,
    };
    if len > limit {
        return Err(fail());
    }
    let len = usize::try_from(len).map_err(|_| fail())?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| fail())?;
    Ok(buf)
}
