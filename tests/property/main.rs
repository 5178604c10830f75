//! Property-based tests for path algebra and archive listing.
//!
//! Run with: `cargo test --test property`

mod archive_index;
mod path_algebra;
