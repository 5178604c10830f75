//! Absolute path normalization with a bounded output buffer.
//!
//! # Invariants
//! - Output never exceeds the normalizer's capacity; overflow truncates on
//!   a `char` boundary and sets `truncated`.
//! - Output contains no `.` or `..` segments (unless truncated mid-segment).
//! - Normalizing an already-normalized, untruncated path is a no-op.
//!
//! # Algorithm
//! - Seed the output with the current directory (plus separator) when the
//!   input is relative; otherwise start empty.
//! - Scan the input one segment at a time:
//!   `./` is dropped, a trailing `.` drops the preceding separator,
//!   `../` or a trailing `..` pops the last output segment (resetting to
//!   root when nothing is left), anything else is copied up to and
//!   including its separator.

use crate::fs::FsProbe;

use super::{is_root, MAX_PATH_LEN, PATH_SEP};

const SEP: u8 = PATH_SEP as u8;

/// Result of [`PathNormalizer::normalize`].
///
/// `path` borrows the normalizer's buffer and is valid until the next call
/// that mutates the normalizer.
#[derive(Debug)]
pub struct NormalizedPath<'a> {
    pub path: &'a str,
    /// True if the input did not fit and the output was cut at capacity.
    pub truncated: bool,
}

/// Reusable normalizer with a fixed output capacity.
///
/// # Guarantees
/// - Output length is bounded by the capacity given to `with_capacity`.
/// - The internal buffer never grows after construction.
pub struct PathNormalizer {
    out: String,
    cap: usize,
}

impl Default for PathNormalizer {
    fn default() -> Self {
        Self::with_capacity(MAX_PATH_LEN)
    }
}

impl PathNormalizer {
    pub fn with_capacity(max_len: usize) -> Self {
        Self {
            out: String::with_capacity(max_len),
            cap: max_len,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Debug-only guard: ensure the output buffer never grows after startup.
    #[inline]
    pub fn debug_assert_no_growth(&self) {
        debug_assert!(
            self.out.capacity() >= self.cap && self.out.len() <= self.cap,
            "normalizer output exceeded its capacity"
        );
    }

    /// Resolve `.` and `..` in `input` into an absolute path.
    ///
    /// Relative input is anchored at `fs.current_dir()`. If the current
    /// directory cannot be determined, the input is returned unchanged (cut
    /// to capacity).
    pub fn normalize<'a, P: FsProbe + ?Sized>(
        &'a mut self,
        input: &str,
        fs: &P,
    ) -> NormalizedPath<'a> {
        self.out.clear();

        if !is_root(input) {
            let Some(cwd) = fs.current_dir() else {
                let truncated = !push_bounded(&mut self.out, input, self.cap);
                return NormalizedPath {
                    path: &self.out,
                    truncated,
                };
            };
            if !push_bounded(&mut self.out, &cwd, self.cap) {
                return NormalizedPath {
                    path: &self.out,
                    truncated: true,
                };
            }
            if !self.out.is_empty() && !self.out.ends_with(PATH_SEP) {
                if self.out.len() == self.cap {
                    // Only a lone `.` resolves to the bare directory.
                    return NormalizedPath {
                        path: &self.out,
                        truncated: input != ".",
                    };
                }
                self.out.push(PATH_SEP);
            }
        }

        let b = input.as_bytes();
        let at = |i: usize| b.get(i).copied().unwrap_or(0);
        let mut i = 0usize;
        let mut truncated = false;

        // Dot segments never grow the output and still apply at capacity.
        while i < b.len() {
            if at(i) == b'.' && at(i + 1) == SEP {
                i += 2;
            } else if at(i) == b'.' && i + 1 == b.len() {
                i += 1;
                if self.out.len() > 1 {
                    self.out.pop();
                }
            } else if at(i) == b'.' && at(i + 1) == b'.' && (at(i + 2) == SEP || i + 2 == b.len())
            {
                i += 2;
                self.out.pop();
                match self.out.rfind(PATH_SEP) {
                    Some(pos) => self.out.truncate(pos + 1),
                    None => {
                        self.out.clear();
                        self.out.push(PATH_SEP);
                    }
                }
                if at(i) == SEP {
                    i += 1;
                } else if self.out.len() > 1 {
                    self.out.pop();
                }
            } else {
                let seg_end = match input[i..].find(PATH_SEP) {
                    Some(rel) => i + rel + 1,
                    None => b.len(),
                };
                let seg = &input[i..seg_end];
                if self.out.len() + seg.len() <= self.cap {
                    self.out.push_str(seg);
                    i = seg_end;
                } else {
                    let room = self.cap - self.out.len();
                    let cut = floor_char_boundary(seg, room);
                    self.out.push_str(&seg[..cut]);
                    truncated = true;
                    break;
                }
            }
        }

        self.debug_assert_no_growth();
        NormalizedPath {
            path: &self.out,
            truncated,
        }
    }
}

/// Normalize `input` with the default path capacity.
pub fn normalize<P: FsProbe + ?Sized>(input: &str, fs: &P) -> String {
    let mut n = PathNormalizer::default();
    n.normalize(input, fs).path.to_string()
}

// Append as much of `s` as fits; returns false when anything was cut.
fn push_bounded(out: &mut String, s: &str, cap: usize) -> bool {
    let room = cap.saturating_sub(out.len());
    if s.len() <= room {
        out.push_str(s);
        return true;
    }
    out.push_str(&s[..floor_char_boundary(s, room)]);
    false
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
