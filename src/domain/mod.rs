//! Domain Layer
//!
//! Types shared by the listener core and its backends.
//!
//! ## Structure
//!
//! - `entities/` - Mutable state (ChecksumIndex)
//! - `value_objects/` - Immutable value types (Fingerprint, IgnoreSet, ConfigWarning)
//! - `ports/` - Interface definitions implemented by infrastructure (Backend)

pub mod entities;
pub mod ports;
pub mod value_objects;
