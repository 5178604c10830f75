//! Property tests for path normalization, ascension, split/join, and shortening.

use proptest::prelude::*;

use media_resolver::path::{ascend, join, normalize, shorten, split, ELLIPSIS};
use media_resolver::FsProbe;

/// Probe with a fixed working directory and no files.
struct FixedCwd;

impl FsProbe for FixedCwd {
    fn exists(&self, _path: &str) -> bool {
        false
    }

    fn is_dir(&self, _path: &str) -> bool {
        false
    }

    fn current_dir(&self) -> Option<String> {
        Some("/home/user".to_string())
    }
}

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(".".to_string()),
        Just("..".to_string()),
        Just(String::new()),
        Just("...".to_string()),
        Just(".hidden".to_string()),
        "[a-z]{1,6}",
        "[a-z]{1,4}\\.d64",
    ]
}

fn raw_path() -> impl Strategy<Value = String> {
    (any::<bool>(), prop::collection::vec(segment(), 0..8), any::<bool>()).prop_map(
        |(absolute, segs, trailing)| {
            let mut p = String::new();
            if absolute {
                p.push('/');
            }
            p.push_str(&segs.join("/"));
            if trailing && !p.is_empty() {
                p.push('/');
            }
            p
        },
    )
}

fn name_segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,8}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn normalize_is_idempotent(p in raw_path()) {
        let once = normalize(&p, &FixedCwd);
        let twice = normalize(&once, &FixedCwd);
        prop_assert_eq!(&once, &twice);
        prop_assert!(once.starts_with('/'));
    }

    #[test]
    fn normalize_removes_dot_segments(p in raw_path()) {
        let out = normalize(&p, &FixedCwd);
        for seg in out.split('/') {
            prop_assert!(seg != "." && seg != "..", "segment {:?} left in {:?}", seg, out);
        }
    }

    #[test]
    fn ascend_strips_exactly_n_segments(
        segs in prop::collection::vec(name_segment(), 1..8),
        n_seed in any::<usize>(),
        trailing in any::<bool>(),
    ) {
        let n = 1 + n_seed % segs.len();
        let mut p = format!("/{}", segs.join("/"));
        if trailing {
            p.push('/');
        }
        let kept = &segs[..segs.len() - n];
        let expected = if kept.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", kept.join("/"))
        };
        let out = ascend(&p, n);
        prop_assert!(out.ends_with('/'));
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn split_then_join_reconstructs(
        dirs in prop::collection::vec(name_segment(), 0..4),
        name in name_segment(),
        ext in prop::option::of("[a-z0-9]{1,4}"),
    ) {
        let dir = format!("/{}", dirs.iter().map(|d| format!("{d}/")).collect::<String>());
        let path = match &ext {
            Some(e) => format!("{dir}{name}.{e}"),
            None => format!("{dir}{name}"),
        };
        let parts = split(&path);
        prop_assert_eq!(parts.dir.as_str(), dir.as_str());
        prop_assert_eq!(parts.ext, ext.as_deref().unwrap_or(""));
        prop_assert_eq!(join(parts.dir.as_str(), parts.name, parts.ext), path);
    }

    #[test]
    fn shorten_fits_and_keeps_both_ends(s in "[ -~]{0,80}", max in 3usize..60) {
        let out = shorten(&s, max);
        prop_assert!(out.chars().count() <= max);
        if s.len() <= max {
            prop_assert_eq!(out, s);
        } else {
            prop_assert!(out.contains(ELLIPSIS));
            let tail = max / 2 - 1;
            prop_assert!(out.ends_with(&s[s.len() - tail..]));
            let head_len = out.find(ELLIPSIS).unwrap_or(0);
            prop_assert!(s.starts_with(&out[..head_len]));
        }
    }
}

#[test]
fn shorten_keeps_disk_suffix() {
    let out = shorten("averyveryverylongfilename.d64", 10);
    assert!(out.len() <= 10);
    assert!(out.contains(ELLIPSIS));
    assert!(out.ends_with(".d64"));
}
