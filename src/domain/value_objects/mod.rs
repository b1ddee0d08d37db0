//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod config_warning;
mod fingerprint;
mod ignore_set;

pub use config_warning::ConfigWarning;
pub use fingerprint::Fingerprint;
pub use ignore_set::{IgnoreSet, DEFAULT_IGNORE_PATHS};
