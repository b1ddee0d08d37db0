//! Property tests for Lookout.
//!
//! Run with: `cargo test --test properties`

#[path = "properties/ignore_set.rs"]
mod ignore_set;

#[path = "properties/relativize.rs"]
mod relativize;
