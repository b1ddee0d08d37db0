//! Background dispatch loop

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use super::queue::{ChangeHandler, PendingChanges};

/// Owns the dispatch thread. Dropping it shuts the thread down.
#[derive(Debug)]
pub(crate) struct Dispatcher {
    queue: Arc<PendingChanges>,
    thread: Option<JoinHandle<()>>,
}

impl Dispatcher {
    /// Spawn the dispatch thread for `queue`
    pub(crate) fn spawn(queue: Arc<PendingChanges>) -> io::Result<Self> {
        queue.reset_shutdown();
        let worker_queue = queue.clone();
        let thread = thread::Builder::new()
            .name("lookout-dispatch".to_string())
            .spawn(move || run(&worker_queue))?;
        Ok(Self {
            queue,
            thread: Some(thread),
        })
    }

    /// Ask the loop to finish and wait for it.
    ///
    /// An unlocked pending batch is still delivered before the thread exits.
    pub(crate) fn shutdown(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        self.queue.request_shutdown();
        if thread.join().is_err() {
            warn!("dispatch thread panicked");
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.thread.is_some()
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(queue: &PendingChanges) {
    debug!("dispatch loop started");
    while let Some((handler, batch)) = queue.wait_batch() {
        deliver(&handler, batch);
    }
    debug!("dispatch loop stopped");
}

/// Invoke `handler` with `batch`, containing a panic to this one batch
pub(crate) fn deliver(handler: &ChangeHandler, batch: Vec<PathBuf>) {
    let count = batch.len();
    debug!(count, "dispatching changed files");
    if panic::catch_unwind(AssertUnwindSafe(|| handler(batch))).is_err() {
        warn!(count, "change handler panicked");
    }
}
