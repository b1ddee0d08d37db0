//! Pending change queue shared by backends and the dispatcher
//!
//! The queue, the lock flag, the registered handler and the shutdown request
//! all live behind one mutex, so appending and taking a batch can never
//! interleave and the dispatcher always sees a consistent lock state.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// Callback invoked with one batch of changed paths
pub type ChangeHandler = Arc<dyn Fn(Vec<PathBuf>) + Send + Sync>;

#[derive(Default)]
struct QueueState {
    paths: Vec<PathBuf>,
    /// Mirrors `paths` so a path is queued at most once per batch
    queued: HashSet<PathBuf>,
    locked: bool,
    handler: Option<ChangeHandler>,
    shutdown: bool,
}

impl QueueState {
    fn dispatchable(&self) -> bool {
        !self.paths.is_empty() && !self.locked && self.handler.is_some()
    }

    fn take_batch(&mut self) -> Option<(ChangeHandler, Vec<PathBuf>)> {
        if !self.dispatchable() {
            return None;
        }
        let handler = self.handler.clone()?;
        self.queued.clear();
        Some((handler, std::mem::take(&mut self.paths)))
    }
}

/// Ordered, lockable queue of changed paths
#[derive(Default)]
pub struct PendingChanges {
    state: Mutex<QueueState>,
    ready: Condvar,
}

impl std::fmt::Debug for PendingChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("PendingChanges")
            .field("paths", &state.paths)
            .field("locked", &state.locked)
            .field("has_handler", &state.handler.is_some())
            .finish()
    }
}

impl PendingChanges {
    pub fn new() -> Self {
        Self::default()
    }

    // A panicking handler runs outside the lock, but a poisoned guard is
    // still recovered so the queue keeps working.
    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append paths in order, skipping any already queued.
    ///
    /// A path keeps the position of its first report until the batch is
    /// taken. Returns how many paths were newly queued.
    pub fn extend<I>(&self, paths: I) -> usize
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut state = self.state();
        let QueueState { paths: queue, queued, .. } = &mut *state;
        let before = queue.len();
        for path in paths {
            if queued.insert(path.clone()) {
                queue.push(path);
            }
        }
        let added = queue.len() - before;
        if added > 0 {
            self.ready.notify_all();
        }
        added
    }

    pub fn clear(&self) {
        let mut state = self.state();
        state.paths.clear();
        state.queued.clear();
    }

    /// Copy of the queued paths, left in place
    pub fn snapshot(&self) -> Vec<PathBuf> {
        self.state().paths.clone()
    }

    pub fn len(&self) -> usize {
        self.state().paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().paths.is_empty()
    }

    pub fn lock(&self) {
        self.state().locked = true;
    }

    pub fn unlock(&self) {
        self.state().locked = false;
        self.ready.notify_all();
    }

    pub fn is_locked(&self) -> bool {
        self.state().locked
    }

    /// Register the handler, replacing any previous one
    pub fn set_handler(&self, handler: ChangeHandler) {
        self.state().handler = Some(handler);
        self.ready.notify_all();
    }

    /// Take the whole queue if it can be dispatched right now
    pub fn try_take(&self) -> Option<(ChangeHandler, Vec<PathBuf>)> {
        self.state().take_batch()
    }

    /// Block until a batch is dispatchable or shutdown is requested.
    ///
    /// Returns `None` once shutdown is requested and nothing dispatchable is
    /// left, so a final unlocked batch is still handed out after `shutdown`.
    pub(crate) fn wait_batch(&self) -> Option<(ChangeHandler, Vec<PathBuf>)> {
        let mut state = self.state();
        loop {
            if let Some(batch) = state.take_batch() {
                return Some(batch);
            }
            if state.shutdown {
                return None;
            }
            state = self
                .ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub(crate) fn request_shutdown(&self) {
        self.state().shutdown = true;
        self.ready.notify_all();
    }

    pub(crate) fn reset_shutdown(&self) {
        self.state().shutdown = false;
    }
}
