//! Filesystem probe seam and host directory discovery.
//!
//! The resolver never walks the filesystem itself; it asks a probe three
//! questions (does this path exist, is it a directory, where am I). Tests
//! swap in an in-memory probe, the loader defaults to [`HostFs`].

use std::env;
use std::path::Path;

use crate::path::{add_trailing_separator, PATH_SEP};

/// Read-only filesystem queries used by path resolution.
pub trait FsProbe {
    fn exists(&self, path: &str) -> bool;
    fn is_dir(&self, path: &str) -> bool;
    /// Current working directory, or `None` when the host cannot tell.
    fn current_dir(&self) -> Option<String>;
}

impl<P: FsProbe + ?Sized> FsProbe for &P {
    fn exists(&self, path: &str) -> bool {
        (**self).exists(path)
    }

    fn is_dir(&self, path: &str) -> bool {
        (**self).is_dir(path)
    }

    fn current_dir(&self) -> Option<String> {
        (**self).current_dir()
    }
}

/// Probe backed by `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HostFs;

impl FsProbe for HostFs {
    fn exists(&self, path: &str) -> bool {
        !path.is_empty() && Path::new(path).exists()
    }

    fn is_dir(&self, path: &str) -> bool {
        !path.is_empty() && Path::new(path).is_dir()
    }

    fn current_dir(&self) -> Option<String> {
        let cwd = env::current_dir().ok()?;
        cwd.to_str().map(str::to_owned)
    }
}

/// Cut trailing components off `path` until it names an existing directory,
/// then make sure it ends with a separator.
///
/// A path without any separator collapses to the root; an empty path is
/// left empty.
pub fn make_valid_dir_path<P: FsProbe + ?Sized>(path: &mut String, fs: &P) {
    loop {
        if fs.is_dir(path) {
            break;
        }
        match path.rfind(PATH_SEP) {
            Some(0) => {
                path.truncate(1);
                if !fs.is_dir(path) {
                    return;
                }
                break;
            }
            Some(i) => path.truncate(i),
            None => {
                if !path.is_empty() {
                    path.clear();
                    path.push(PATH_SEP);
                }
                return;
            }
        }
    }
    add_trailing_separator(path);
}

/// Working and home directories of the host process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostDirs {
    pub working_dir: String,
    pub home_dir: String,
}

impl HostDirs {
    /// Discover directories from the process environment.
    ///
    /// The home directory comes from `HOME` (or `HOMEDRIVE` + `HOMEPATH` on
    /// Windows) and falls back to the working directory.
    pub fn detect() -> Self {
        let working_dir = HostFs.current_dir().unwrap_or_else(|| ".".to_string());
        let home_dir = home_from_env().unwrap_or_else(|| working_dir.clone());
        Self {
            working_dir,
            home_dir,
        }
    }
}

fn home_from_env() -> Option<String> {
    if let Ok(home) = env::var("HOME") {
        if !home.is_empty() {
            return Some(home);
        }
    }
    #[cfg(windows)]
    {
        let drive = env::var("HOMEDRIVE").unwrap_or_default();
        if let Ok(path) = env::var("HOMEPATH") {
            return Some(format!("{drive}{path}"));
        }
    }
    None
}
