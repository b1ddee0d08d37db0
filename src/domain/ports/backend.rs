//! Backend Port
//!
//! A backend is the mechanism that notices filesystem activity below the
//! watch root and feeds it into the listener: either native OS notifications
//! or periodic polling. Both report through a [`ListenerHandle`].

use std::any::Any;
use std::path::Path;

use crate::error::{LookoutError, LookoutResult};
use crate::listener::ListenerHandle;

/// Trait for change-detection backends
///
/// Implementations:
/// - `NotifyBackend` - native OS events (inotify, FSEvents, ReadDirectoryChangesW)
/// - `PollingBackend` - periodic `modified_files` scans
pub trait Backend: Send {
    /// Short name used in logs and errors
    fn name(&self) -> &'static str;

    /// Whether this backend can run on the current platform.
    ///
    /// Checked by the selection policy before construction.
    fn usable() -> bool
    where
        Self: Sized;

    /// Begin monitoring `directory`, reporting into `listener`.
    ///
    /// Backends must override this. The default fails loudly so an
    /// incomplete backend is caught the first time it is started.
    fn watch(&mut self, directory: &Path, listener: ListenerHandle) -> LookoutResult<()> {
        let _ = (directory, listener);
        Err(LookoutError::NotImplemented { operation: "watch" })
    }

    /// The object doing the actual watching (notify's watcher, the poll
    /// thread handle). Downcast to the backend's concrete type.
    fn worker(&self) -> LookoutResult<&dyn Any> {
        Err(LookoutError::NotImplemented { operation: "worker" })
    }

    /// Stop monitoring. No-op unless the backend holds resources.
    fn stop(&mut self) {}
}
