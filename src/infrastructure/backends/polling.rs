//! Polling backend
//!
//! Rescans the whole watch root on a fixed interval. Works everywhere and is
//! the fallback when no native backend is usable.

use std::any::Any;
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::ports::Backend;
use crate::error::{LookoutError, LookoutResult};
use crate::listener::{ListenerHandle, ScanOptions};

/// Default delay between scans
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

struct PollWorker {
    stop_tx: Sender<()>,
    thread: JoinHandle<()>,
}

/// Backend that periodically calls `modified_files` over the watch root
pub struct PollingBackend {
    interval: Duration,
    worker: Option<PollWorker>,
}

impl Default for PollingBackend {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl PollingBackend {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            worker: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One scan of `directory`, queueing whatever changed. Returns how many
    /// paths were newly queued.
    pub fn poll_once(directory: &Path, listener: &ListenerHandle) -> usize {
        let changed = listener.modified_files(&[directory], ScanOptions::recursive());
        listener.report_changes(changed)
    }
}

impl Backend for PollingBackend {
    fn name(&self) -> &'static str {
        "polling"
    }

    fn usable() -> bool {
        true
    }

    fn watch(&mut self, directory: &Path, listener: ListenerHandle) -> LookoutResult<()> {
        self.stop();

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let interval = self.interval;
        let directory = directory.to_path_buf();
        let thread = thread::Builder::new()
            .name("lookout-poll".to_string())
            .spawn(move || {
                debug!(directory = %directory.display(), ?interval, "polling started");
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            Self::poll_once(&directory, &listener);
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!(directory = %directory.display(), "polling stopped");
            })?;

        self.worker = Some(PollWorker { stop_tx, thread });
        Ok(())
    }

    fn worker(&self) -> LookoutResult<&dyn Any> {
        match &self.worker {
            Some(worker) => Ok(&worker.thread as &dyn Any),
            None => Err(LookoutError::backend("polling", "not watching")),
        }
    }

    fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            if worker.thread.join().is_err() {
                warn!("polling thread panicked");
            }
        }
    }
}

impl Drop for PollingBackend {
    fn drop(&mut self) {
        self.stop();
    }
}
