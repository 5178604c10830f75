//! Shared helpers for unit tests: an in-memory filesystem probe, a
//! deterministic Zip32 builder, and proptest case tuning.

use std::collections::HashSet;
use std::io::Write;

use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::fs::FsProbe;

pub fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
}

fn is_ci() -> bool {
    std::env::var_os("CI").is_some()
}

pub fn proptest_cases(default: u32) -> u32 {
    if let Some(value) = env_u32("PROPTEST_CASES") {
        return value.max(1);
    }
    if is_ci() {
        return default.max(1);
    }
    default.clamp(1, 64)
}

/// In-memory probe: a set of files, a set of directories, and an optional cwd.
#[derive(Clone, Debug, Default)]
pub struct MockFs {
    files: HashSet<String>,
    dirs: HashSet<String>,
    cwd: Option<String>,
}

impl MockFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str) -> Self {
        self.files.insert(path.to_string());
        self
    }

    pub fn with_dir(mut self, path: &str) -> Self {
        self.dirs.insert(path.to_string());
        self
    }

    pub fn with_cwd(mut self, cwd: &str) -> Self {
        self.cwd = Some(cwd.to_string());
        self
    }
}

impl FsProbe for MockFs {
    fn exists(&self, path: &str) -> bool {
        self.files.contains(path) || self.dirs.contains(path)
    }

    fn is_dir(&self, path: &str) -> bool {
        self.dirs.contains(path)
    }

    fn current_dir(&self) -> Option<String> {
        self.cwd.clone()
    }
}

/// One member for [`build_zip_bytes`].
pub struct ZipMember<'a> {
    pub name: &'a str,
    pub payload: &'a [u8],
    pub deflate: bool,
    /// Write `payload` as the member data without compressing it.
    pub raw: bool,
}

impl<'a> ZipMember<'a> {
    pub fn stored(name: &'a str, payload: &'a [u8]) -> Self {
        Self {
            name,
            payload,
            deflate: false,
            raw: false,
        }
    }

    pub fn deflated(name: &'a str, payload: &'a [u8]) -> Self {
        Self {
            name,
            payload,
            deflate: true,
            raw: false,
        }
    }

    /// Method 8 member whose data is `bytes` verbatim, typically an invalid
    /// deflate stream. The declared uncompressed size is `bytes.len()`.
    pub fn raw_deflate(name: &'a str, bytes: &'a [u8]) -> Self {
        Self {
            name,
            payload: bytes,
            deflate: true,
            raw: true,
        }
    }
}

/// Build deterministic Zip32 bytes (fixed timestamps, no data descriptors,
/// CRC left at zero).
pub fn build_zip_bytes(members: &[ZipMember<'_>]) -> Vec<u8> {
    fn u16le(v: u16) -> [u8; 2] {
        v.to_le_bytes()
    }
    fn u32le(v: u32) -> [u8; 4] {
        v.to_le_bytes()
    }

    let mut out = Vec::new();
    let mut cd = Vec::new();

    for m in members {
        let method = if m.deflate { 8u16 } else { 0u16 };
        let data = if m.deflate && !m.raw {
            let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
            enc.write_all(m.payload).unwrap();
            enc.finish().unwrap()
        } else {
            m.payload.to_vec()
        };
        let name = m.name.as_bytes();
        let local_off = out.len() as u32;

        out.extend_from_slice(&u32le(0x0403_4b50));
        out.extend_from_slice(&u16le(20));
        out.extend_from_slice(&u16le(0));
        out.extend_from_slice(&u16le(method));
        out.extend_from_slice(&u16le(0));
        out.extend_from_slice(&u16le(0));
        out.extend_from_slice(&u32le(0));
        out.extend_from_slice(&u32le(data.len() as u32));
        out.extend_from_slice(&u32le(m.payload.len() as u32));
        out.extend_from_slice(&u16le(name.len() as u16));
        out.extend_from_slice(&u16le(0));
        out.extend_from_slice(name);
        out.extend_from_slice(&data);

        cd.extend_from_slice(&u32le(0x0201_4b50));
        cd.extend_from_slice(&u16le(0));
        cd.extend_from_slice(&u16le(20));
        cd.extend_from_slice(&u16le(0));
        cd.extend_from_slice(&u16le(method));
        cd.extend_from_slice(&u16le(0));
        cd.extend_from_slice(&u16le(0));
        cd.extend_from_slice(&u32le(0));
        cd.extend_from_slice(&u32le(data.len() as u32));
        cd.extend_from_slice(&u32le(m.payload.len() as u32));
        cd.extend_from_slice(&u16le(name.len() as u16));
        cd.extend_from_slice(&u16le(0));
        cd.extend_from_slice(&u16le(0));
        cd.extend_from_slice(&u16le(0));
        cd.extend_from_slice(&u16le(0));
        cd.extend_from_slice(&u32le(0));
        cd.extend_from_slice(&u32le(local_off));
        cd.extend_from_slice(name);
    }

    let cd_start = out.len() as u32;
    let cd_size = cd.len() as u32;
    out.extend_from_slice(&cd);

    out.extend_from_slice(&u32le(0x0605_4b50));
    out.extend_from_slice(&u16le(0));
    out.extend_from_slice(&u16le(0));
    out.extend_from_slice(&u16le(members.len() as u16));
    out.extend_from_slice(&u16le(members.len() as u16));
    out.extend_from_slice(&u32le(cd_size));
    out.extend_from_slice(&u32le(cd_start));
    out.extend_from_slice(&u16le(0));

    out
}
