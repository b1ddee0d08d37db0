//! Domain Entities
//!
//! Mutable domain state owned by a listener.

mod checksum_index;

pub use checksum_index::ChecksumIndex;
