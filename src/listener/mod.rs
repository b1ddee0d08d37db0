//! Listener core
//!
//! The listener owns everything backends share: the watch root, the ignore
//! set, the relativization policy, the event clock and checksum cache, and
//! the pending change queue. A background dispatcher hands queued changes to
//! the registered handler whenever the queue is non-empty and unlocked.
//!
//! ## Architecture
//!
//! - `Listener` - Lifecycle owner (`start`/`stop`), wraps one `Backend`
//! - `ListenerHandle` - Cloneable view backends report through
//! - `filter` - Candidate file enumeration with ignore-set exclusion
//! - `detector` - Timestamp + fingerprint modification check
//! - `queue` / `dispatch` - Pending changes, lock flag, dispatch thread
//!
//! ## Usage
//!
//! ```ignore
//! let mut listener = Listener::new(&ListenerConfig::default())?;
//! listener.on_change(|paths| println!("{:?}", paths));
//! listener.start()?;
//! ```

mod detector;
mod dispatch;
pub mod filter;
mod handle;
mod queue;


use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::{debug, info};

use crate::config::ListenerConfig;
use crate::domain::ports::Backend;
use crate::domain::value_objects::IgnoreSet;
use crate::error::{LookoutError, LookoutResult};
use crate::infrastructure::backends;

pub use detector::{
    confirm_reported_change, detect, is_modified, unix_seconds, Detection, FileStamp, ModifiedBy,
};
pub use handle::{ListenerHandle, ScanOptions};
pub use queue::{ChangeHandler, PendingChanges};

use dispatch::Dispatcher;

/// Lifecycle of one watch session. Locking is orthogonal to this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Constructed,
    Watching,
    Stopped,
}

/// File change listener
pub struct Listener {
    handle: ListenerHandle,
    backend: Box<dyn Backend>,
    dispatcher: Option<Dispatcher>,
    dispatch_enabled: bool,
    state: ListenerState,
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("directory", &self.directory())
            .field("backend", &self.backend.name())
            .field("state", &self.state)
            .finish()
    }
}

impl Listener {
    /// Create a listener with the first usable backend for this platform
    pub fn new(config: &ListenerConfig) -> LookoutResult<Self> {
        let backend = backends::select(config);
        Self::with_backend(config, backend)
    }

    /// Create a listener around an explicit backend
    pub fn with_backend(config: &ListenerConfig, backend: Box<dyn Backend>) -> LookoutResult<Self> {
        let directory = resolve_directory(&config.directory)?;
        let ignore_set = IgnoreSet::with_defaults(config.ignore_paths.iter().cloned());
        let queue = Arc::new(PendingChanges::new());
        let handle = ListenerHandle::new(directory, ignore_set, config.relativize_paths, queue);

        let dispatcher = if config.dispatch {
            Some(Dispatcher::spawn(handle.queue().clone())?)
        } else {
            debug!("dispatch loop disabled");
            None
        };

        info!(
            directory = %handle.directory().display(),
            backend = backend.name(),
            "listener created"
        );

        Ok(Self {
            handle,
            backend,
            dispatcher,
            dispatch_enabled: config.dispatch,
            state: ListenerState::Constructed,
        })
    }

    /// Begin watching the watch root through the backend
    pub fn start(&mut self) -> LookoutResult<()> {
        if self.state == ListenerState::Watching {
            return Err(LookoutError::AlreadyWatching {
                directory: self.directory().to_path_buf(),
            });
        }
        if self.dispatch_enabled && !self.dispatcher.as_ref().is_some_and(Dispatcher::is_running) {
            self.dispatcher = Some(Dispatcher::spawn(self.handle.queue().clone())?);
        }

        let directory = self.directory().to_path_buf();
        self.backend.watch(&directory, self.handle.clone())?;
        self.state = ListenerState::Watching;
        info!(directory = %directory.display(), backend = self.backend.name(), "watching");
        Ok(())
    }

    /// Stop watching and shut the dispatcher down.
    ///
    /// An unlocked pending batch is delivered once before the dispatcher
    /// exits; a locked one stays queued.
    pub fn stop(&mut self) {
        if self.state != ListenerState::Watching {
            return;
        }
        self.backend.stop();
        if let Some(mut dispatcher) = self.dispatcher.take() {
            dispatcher.shutdown();
        }
        self.state = ListenerState::Stopped;
        info!(directory = %self.directory().display(), "stopped watching");
    }

    pub fn state(&self) -> ListenerState {
        self.state
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// The backend's underlying watcher, see [`Backend::worker`]
    pub fn worker(&self) -> LookoutResult<&dyn std::any::Any> {
        self.backend.worker()
    }

    /// Cloneable view for backends and other threads
    pub fn handle(&self) -> ListenerHandle {
        self.handle.clone()
    }

    pub fn directory(&self) -> &Path {
        self.handle.directory()
    }

    pub fn ignore_set(&self) -> &IgnoreSet {
        self.handle.ignore_set()
    }

    pub fn relativizes(&self) -> bool {
        self.handle.relativizes()
    }

    /// Files under `dirs` modified since the previous scan, relativized
    pub fn modified_files<P: AsRef<Path>>(&self, dirs: &[P], options: ScanOptions) -> Vec<PathBuf> {
        self.handle.modified_files(dirs, options)
    }

    /// Every file under the watch root as absolute paths
    pub fn all_files(&self) -> Vec<PathBuf> {
        self.handle.all_files()
    }

    pub fn relativize_paths(&self, paths: Vec<PathBuf>) -> Vec<PathBuf> {
        self.handle.relativize_paths(paths)
    }

    pub fn last_event(&self) -> SystemTime {
        self.handle.last_event()
    }

    pub fn update_last_event(&self) {
        self.handle.update_last_event()
    }

    /// Suspend dispatch; changes keep accumulating
    pub fn lock(&self) {
        self.handle.queue().lock();
    }

    pub fn unlock(&self) {
        self.handle.queue().unlock();
    }

    pub fn is_locked(&self) -> bool {
        self.handle.queue().is_locked()
    }

    /// Register the change handler, replacing any previous one
    pub fn on_change<F>(&self, handler: F)
    where
        F: Fn(Vec<PathBuf>) + Send + Sync + 'static,
    {
        self.handle.queue().set_handler(Arc::new(handler));
    }

    /// Queued paths, not yet dispatched
    pub fn changed_files(&self) -> Vec<PathBuf> {
        self.handle.queue().snapshot()
    }

    pub fn clear_changed_files(&self) {
        self.handle.queue().clear();
    }

    /// Deliver the pending batch on the calling thread.
    ///
    /// For use when the dispatch loop is disabled. Returns false when
    /// nothing was dispatchable.
    pub fn dispatch_pending(&self) -> bool {
        match self.handle.queue().try_take() {
            Some((handler, batch)) => {
                dispatch::deliver(&handler, batch);
                true
            }
            None => false,
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Absolute, canonical form of the watch root
fn resolve_directory(directory: &Path) -> LookoutResult<PathBuf> {
    let absolute = if directory.is_absolute() {
        directory.to_path_buf()
    } else {
        std::env::current_dir()?.join(directory)
    };
    if !absolute.is_dir() {
        return Err(LookoutError::DirectoryNotFound { path: absolute });
    }
    Ok(absolute.canonicalize().unwrap_or(absolute))
}
