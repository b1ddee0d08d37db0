//! Lookout - filesystem change detection
//!
//! Lookout watches a directory tree and reports, in batches, the files whose
//! content was created or modified. Backends (OS notifications or periodic
//! polling) feed a shared listener core that filters ignored paths,
//! confirms changes by timestamp and content fingerprint, and hands the
//! queued batch to a registered handler.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod listener;

// Re-exports for convenience
pub use config::{BackendPreference, ListenerConfig};
pub use domain::entities::ChecksumIndex;
pub use domain::ports::Backend;
pub use domain::value_objects::{ConfigWarning, Fingerprint, IgnoreSet, DEFAULT_IGNORE_PATHS};
pub use error::{LookoutError, LookoutResult};
pub use infrastructure::backends::{select_kind, BackendKind, NotifyBackend, PollingBackend};
pub use listener::{Listener, ListenerHandle, ListenerState, ScanOptions};
