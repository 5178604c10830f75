//! Path algebra over host and archive path strings.
//!
//! # Scope
//! Pure string transforms: split, join, shorten, dot-dir collapse, ascend,
//! and the small predicates the loader and browsing code share. The only
//! operation that touches the host is [`PathNormalizer`], which asks the
//! filesystem probe for the current directory when the input is relative.
//!
//! # Invariants
//! - A single separator (`PATH_SEP`) is used for every transform.
//! - Byte-level cuts only happen next to ASCII `/` or `.`, so every slice
//!   is on a `char` boundary.
//! - Output sizes are stated up front (`join_capacity`, `shorten` bound)
//!   so callers can pre-size without truncation surprises.

mod normalize;

pub use normalize::{normalize, NormalizedPath, PathNormalizer};

/// Separator used for every host path transform.
pub const PATH_SEP: char = '/';

/// Default path length limit (bytes), matching `FILENAME_MAX` on Linux.
pub const MAX_PATH_LEN: usize = 4096;

/// Marker inserted by [`shorten`] where characters were cut.
pub const ELLIPSIS: &str = "...";

/// Directory / name / extension triple produced by [`split`].
///
/// `dir` keeps its trailing separator and `ext` carries no leading dot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitPath<'a> {
    pub dir: SplitDir<'a>,
    pub name: &'a str,
    pub ext: &'a str,
}

/// Directory part of a [`SplitPath`].
///
/// `Current` stands for `./` when the input had no separator at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitDir<'a> {
    Current,
    Borrowed(&'a str),
}

impl<'a> SplitDir<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            SplitDir::Current => "./",
            SplitDir::Borrowed(s) => s,
        }
    }
}

/// Split `path` into directory, base name, and extension.
///
/// The extension split happens at the last `.` that is not the first
/// character of the name, so `.hidden` stays whole while `.hidden.d64`
/// splits into `.hidden` + `d64`.
pub fn split(path: &str) -> SplitPath<'_> {
    let (dir, file) = match path.rfind(PATH_SEP) {
        Some(i) => (SplitDir::Borrowed(&path[..=i]), &path[i + 1..]),
        None => (SplitDir::Current, path),
    };

    // A dot at position 0 never starts an extension.
    let dot = file.rfind('.').filter(|&i| i > 0);

    match dot {
        Some(i) => SplitPath {
            dir,
            name: &file[..i],
            ext: &file[i + 1..],
        },
        None => SplitPath {
            dir,
            name: file,
            ext: "",
        },
    }
}

/// Upper bound (bytes) of [`join`] output for the given parts.
///
/// Accounts for `.` substituted for an empty directory, one separator,
/// and one dot before the extension.
#[inline]
pub const fn join_capacity(dir_len: usize, name_len: usize, ext_len: usize) -> usize {
    let dir_len = if dir_len == 0 { 1 } else { dir_len };
    dir_len + 1 + name_len + 1 + ext_len
}

/// Build `dir/name.ext`.
///
/// - An empty `dir` becomes `.`.
/// - Exactly one separator ends up between `dir` and `name`.
/// - `ext` is appended only when non-empty; a dot is inserted unless `ext`
///   already starts with one (candidate lists carry `.d64`-style entries).
pub fn join(dir: &str, name: &str, ext: &str) -> String {
    let mut out = String::with_capacity(join_capacity(dir.len(), name.len(), ext.len()));
    if dir.is_empty() {
        out.push('.');
    } else {
        out.push_str(dir);
    }
    add_trailing_separator(&mut out);
    out.push_str(name);
    if !ext.is_empty() {
        if !ext.starts_with('.') {
            out.push('.');
        }
        out.push_str(ext);
    }
    debug_assert!(out.len() <= join_capacity(dir.len(), name.len(), ext.len()));
    out
}

/// Shrink `path` to at most `max_len` characters for display.
///
/// Paths that fit are returned unchanged. Otherwise a head and a tail of
/// roughly `max_len / 2` characters each are kept around [`ELLIPSIS`]; the
/// tail is one character longer than the head for even limits so file
/// extensions survive.
pub fn shorten(path: &str, max_len: usize) -> String {
    let len = path.chars().count();
    if len <= max_len {
        return path.to_string();
    }
    if max_len < ELLIPSIS.len() {
        return ELLIPSIS[..max_len].to_string();
    }

    let half = max_len / 2;
    let head = if max_len % 2 == 1 { half - 1 } else { half - 2 };
    let tail = half - 1;

    let mut out = String::with_capacity(max_len * 4);
    out.extend(path.chars().take(head));
    out.push_str(ELLIPSIS);
    out.extend(path.chars().skip(len - tail));
    debug_assert!(out.chars().count() <= max_len);
    out
}

/// Collapse a trailing `/.` or `/..` left behind by incremental browsing.
///
/// - `…/.` keeps the directory (the dot is dropped, the separator stays).
/// - `…/dir/..` goes one directory up and keeps the trailing separator.
/// - `/..` stays at root.
///
/// A relative path with a single segment (`a/..`) has no separator left to
/// cut back to and is returned as the bare segment.
pub fn collapse_trailing_dot_dirs(path: &str) -> String {
    let b = path.as_bytes();
    let len = b.len();
    let sep = PATH_SEP as u8;

    if len >= 2 && b[len - 2] == sep && b[len - 1] == b'.' {
        return path[..len - 1].to_string();
    }
    if len >= 3 && b[len - 3] == sep && b[len - 2] == b'.' && b[len - 1] == b'.' {
        if len == 3 {
            return path[..1].to_string();
        }
        let up = &path[..len - 3];
        return match up.rfind(PATH_SEP) {
            Some(i) => up[..=i].to_string(),
            None => up.to_string(),
        };
    }
    path.to_string()
}

/// Remove the last `n` segments of `path`, leaving a trailing separator.
///
/// A trailing separator on the input is ignored when counting. When fewer
/// than `n` separators precede the last segment, the root is returned.
pub fn ascend(path: &str, n: usize) -> String {
    let b = path.as_bytes();
    if b.is_empty() {
        return PATH_SEP.to_string();
    }
    if n == 0 {
        let mut out = path.to_string();
        add_trailing_separator(&mut out);
        return out;
    }
    let sep = PATH_SEP as u8;

    let mut i = b.len() - 1;
    let mut seen = 0usize;
    while i > 0 && seen < n {
        i -= 1;
        if b[i] == sep {
            seen += 1;
        }
    }

    if b[i] == sep {
        path[..=i].to_string()
    } else {
        PATH_SEP.to_string()
    }
}

/// Strip trailing separators while keeping at least two characters, so
/// `/` and `//` survive untouched.
pub fn clean_trailing_separators(path: &mut String) {
    while path.len() > 2 && ends_with_separator(path) {
        path.pop();
    }
}

/// Append a separator unless `path` is empty or already ends with one.
pub fn add_trailing_separator(path: &mut String) {
    if !path.is_empty() && !ends_with_separator(path) {
        path.push(PATH_SEP);
    }
}

/// True when `path` ends with [`PATH_SEP`].
#[inline]
pub fn ends_with_separator(path: &str) -> bool {
    path.ends_with(PATH_SEP)
}

/// ASCII case-insensitive suffix match (`GAME.D64` matches `.d64`).
#[inline]
pub fn has_extension(name: &str, ext: &str) -> bool {
    ends_with_ignore_ascii_case(name.as_bytes(), ext.as_bytes())
}

/// True when `path` is anchored at the filesystem root.
pub fn is_root(path: &str) -> bool {
    if path.starts_with(PATH_SEP) {
        return true;
    }
    #[cfg(windows)]
    {
        if path.as_bytes().get(1) == Some(&b':') {
            return true;
        }
    }
    false
}

/// Drop a leading `X:` drive designator, if present.
pub fn strip_drive(path: &str) -> &str {
    let b = path.as_bytes();
    if b.len() >= 2 && b[1] == b':' && b[0].is_ascii_alphabetic() {
        &path[2..]
    } else {
        path
    }
}

#[inline]
pub(crate) fn ends_with_ignore_ascii_case(hay: &[u8], suffix: &[u8]) -> bool {
    hay.len() >= suffix.len() && hay[hay.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}
