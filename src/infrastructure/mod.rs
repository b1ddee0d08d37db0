//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//!
//! ## Structure
//!
//! - `backends/` - Change-detection backends (notify, polling) and selection

pub mod backends;

pub use backends::{BackendKind, NotifyBackend, PollingBackend};
