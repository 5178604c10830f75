//! Fuzz target for the zip central-directory reader and member streams.
//!
//! Any byte string must either fail cleanly or open into an archive whose
//! listing and member reads stay within their declared bounds.
//!
//! # Running
//!
//! ```bash
//! cargo +nightly fuzz run fuzz_zip_open
//! cargo +nightly fuzz run fuzz_zip_open -- -max_len=4096
//! ```

#![no_main]

use std::io::{Cursor, Read};

use libfuzzer_sys::fuzz_target;
use media_resolver::{list_children, select_member, ZipArchive};

const MAX_ENTRIES: u32 = 256;
/// Cap on bytes pulled from one member so deflate bombs stay cheap.
const MAX_MEMBER_READ: u64 = 64 * 1024;

fuzz_target!(|data: &[u8]| {
    let Ok(mut archive) = ZipArchive::open(Cursor::new(data), MAX_ENTRIES) else {
        return;
    };
    assert!(archive.entries().len() <= MAX_ENTRIES as usize);

    let names: Vec<String> = archive.entries().iter().map(|e| e.name.clone()).collect();
    let listing = list_children(names.as_slice(), "");
    assert!(listing.len() <= names.len() + 1);

    if let Some(idx) = select_member(names.as_slice(), Some(&[".d64", ".t64"][..])) {
        assert!(idx < names.len());
    }

    for idx in 0..names.len() {
        let Ok(member) = archive.open_member(idx) else {
            continue;
        };
        let mut sink = Vec::new();
        let _ = member.take(MAX_MEMBER_READ).read_to_end(&mut sink);
        assert!(sink.len() as u64 <= MAX_MEMBER_READ);
    }
});
