//! Integration tests for media loading, archive browsing, and the CLI.
//!
//! Run with: `cargo test --test integration`

mod cli;
