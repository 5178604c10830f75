//! Virtual directory view over a flat archive entry list.
//!
//! Zip archives store members as a flat, insertion-ordered name sequence.
//! A browsing UI wants a folder tree instead, so this module derives the
//! immediate children of a directory prefix without extracting anything.
//!
//! # Invariants
//! - The parent marker is always the first listing entry, including at the
//!   archive root (where [`navigate`] treats it as a no-op).
//! - No two directory markers in one listing are equal under ASCII
//!   case-insensitive comparison.
//! - Every non-parent entry is derived from at least one input name that
//!   starts with the prefix.
//! - Child order is first-occurrence order of the input; nothing is sorted.
//!
//! # Algorithm
//! For each name that starts with `prefix` (ASCII case-insensitive):
//! 1. `remainder = name[prefix.len()..]`; empty remainders are skipped.
//! 2. If `remainder` has a separator (`/` or `\`) at `p > 0`, the child is
//!    the directory `remainder[..=p]`, added once per case-folded spelling.
//! 3. Otherwise the child is the file `remainder` (a leading separator
//!    included).
//!
//! # Design Notes
//! - Dedup is a `HashSet` keyed by the ASCII-lowercased marker, so a listing
//!   over `n` names costs O(n) set operations.
//! - The listing is sized for `names.len() + 1` up front; it never grows.

use std::collections::HashSet;

/// Display name of the synthetic parent entry.
pub const PARENT_MARKER: &str = "../";

/// One row of a [`VirtualDirectoryListing`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListingEntry {
    /// Synthetic `../` entry.
    Parent,
    /// Sub-directory marker, always ending in its separator.
    Dir(String),
    /// File name relative to the listing prefix.
    File(String),
}

impl ListingEntry {
    pub fn name(&self) -> &str {
        match self {
            ListingEntry::Parent => PARENT_MARKER,
            ListingEntry::Dir(name) | ListingEntry::File(name) => name,
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        !matches!(self, ListingEntry::File(_))
    }
}

/// Immediate children of one directory prefix inside an archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VirtualDirectoryListing {
    prefix: String,
    entries: Vec<ListingEntry>,
}

impl VirtualDirectoryListing {
    /// The prefix this listing was built for (`""` is the archive root).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// All entries, parent marker first.
    pub fn entries(&self) -> &[ListingEntry] {
        &self.entries
    }

    /// Entries after the parent marker.
    pub fn children(&self) -> &[ListingEntry] {
        &self.entries[1..]
    }

    /// Number of entries including the parent marker (never zero).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true: the parent marker is always present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ListingEntry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<ListingEntry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a VirtualDirectoryListing {
    type Item = &'a ListingEntry;
    type IntoIter = std::slice::Iter<'a, ListingEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Build the listing of the immediate children of `prefix`.
///
/// `prefix` is archive-relative: `""` for the root, otherwise a directory
/// name ending in `/`.
pub fn list_children<S: AsRef<str>>(names: &[S], prefix: &str) -> VirtualDirectoryListing {
    let mut entries = Vec::with_capacity(names.len() + 1);
    entries.push(ListingEntry::Parent);
    let mut seen_dirs: HashSet<String> = HashSet::new();

    for name in names {
        let Some(remainder) = strip_prefix_ignore_ascii_case(name.as_ref(), prefix) else {
            continue;
        };
        if remainder.is_empty() {
            continue;
        }
        match remainder.find(['/', '\\']) {
            // A separator at position 0 does not open a directory.
            Some(p) if p > 0 => {
                let dir = &remainder[..=p];
                if seen_dirs.insert(dir.to_ascii_lowercase()) {
                    entries.push(ListingEntry::Dir(dir.to_string()));
                }
            }
            _ => entries.push(ListingEntry::File(remainder.to_string())),
        }
    }

    debug_assert!(entries.len() <= names.len() + 1);
    VirtualDirectoryListing {
        prefix: prefix.to_string(),
        entries,
    }
}

/// Prefix reached by selecting `entry` in the listing of `prefix`.
///
/// Returns `None` for files (they are loaded, not entered). The parent
/// marker at the archive root returns the root itself.
pub fn navigate(prefix: &str, entry: &ListingEntry) -> Option<String> {
    match entry {
        ListingEntry::Parent => Some(parent_prefix(prefix).to_string()),
        ListingEntry::Dir(dir) => {
            let mut next = String::with_capacity(prefix.len() + dir.len());
            next.push_str(prefix);
            next.push_str(dir);
            Some(next)
        }
        ListingEntry::File(_) => None,
    }
}

fn parent_prefix(prefix: &str) -> &str {
    let trimmed = prefix
        .strip_suffix(['/', '\\'])
        .unwrap_or(prefix);
    match trimmed.rfind(['/', '\\']) {
        Some(i) => &prefix[..=i],
        None => "",
    }
}

fn strip_prefix_ignore_ascii_case<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let head = name.as_bytes().get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix.as_bytes()) {
        return None;
    }
    name.get(prefix.len()..)
}
