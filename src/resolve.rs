//! Extension substitution for media paths.
//!
//! Frontends often hand over a path whose extension is wrong or missing
//! (`elite` for `elite.d64`, `game.d64` when only `game.t64` exists). The
//! resolver keeps directory and base name and tries each candidate suffix in
//! order against the filesystem probe.
//!
//! The probe decides case sensitivity: on most hosts `GAME.D64` and
//! `game.d64` are different files here, while archive member matching
//! elsewhere ignores ASCII case.

use tracing::debug;

use crate::fs::FsProbe;
use crate::path::{join, split};

/// First `dir/name + candidate` that exists, in candidate order.
///
/// Candidates are suffixes such as `.d64`; a candidate without a leading dot
/// gets one. Returns `None` when no substitute exists.
pub fn find_with_extensions<P: FsProbe + ?Sized>(
    path: &str,
    candidates: &[&str],
    fs: &P,
) -> Option<String> {
    let parts = split(path);
    let dir = parts.dir.as_str();
    candidates.iter().find_map(|ext| {
        let probe = join(dir, parts.name, ext);
        let hit = fs.exists(&probe);
        debug!(candidate = %probe, hit, "extension probe");
        hit.then_some(probe)
    })
}
