//! Listener state shared with backends

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use tracing::{debug, trace};

use crate::domain::entities::ChecksumIndex;
use crate::domain::value_objects::IgnoreSet;

use super::detector;
use super::filter;
use super::queue::PendingChanges;

/// Options for [`ListenerHandle::modified_files`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Descend into subdirectories instead of checking only direct children
    pub all: bool,
}

impl ScanOptions {
    pub fn recursive() -> Self {
        Self { all: true }
    }
}

/// Event clock and checksum cache, touched only while scanning
#[derive(Debug)]
struct ScanState {
    last_event: SystemTime,
    checksums: ChecksumIndex,
}

#[derive(Debug)]
struct Shared {
    directory: PathBuf,
    ignore_set: IgnoreSet,
    relativize: bool,
    scan: Mutex<ScanState>,
    queue: Arc<PendingChanges>,
}

/// Cloneable view of a listener handed to backends.
///
/// Polling backends call [`modified_files`](Self::modified_files) and
/// [`report_changes`](Self::report_changes); native backends call
/// [`report_events`](Self::report_events) with the paths the OS named.
#[derive(Debug, Clone)]
pub struct ListenerHandle {
    shared: Arc<Shared>,
}

impl ListenerHandle {
    pub(crate) fn new(
        directory: PathBuf,
        ignore_set: IgnoreSet,
        relativize: bool,
        queue: Arc<PendingChanges>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                directory,
                ignore_set,
                relativize,
                scan: Mutex::new(ScanState {
                    last_event: SystemTime::now(),
                    checksums: ChecksumIndex::new(),
                }),
                queue,
            }),
        }
    }

    fn scan_state(&self) -> MutexGuard<'_, ScanState> {
        self.shared
            .scan
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn directory(&self) -> &Path {
        &self.shared.directory
    }

    pub fn ignore_set(&self) -> &IgnoreSet {
        &self.shared.ignore_set
    }

    pub fn relativizes(&self) -> bool {
        self.shared.relativize
    }

    pub(crate) fn queue(&self) -> &Arc<PendingChanges> {
        &self.shared.queue
    }

    /// Start instant of the most recent scan
    pub fn last_event(&self) -> SystemTime {
        self.scan_state().last_event
    }

    /// Advance the event clock to now
    pub fn update_last_event(&self) {
        self.scan_state().last_event = SystemTime::now();
    }

    /// Move the event clock to an arbitrary instant
    pub fn set_last_event(&self, instant: SystemTime) {
        self.scan_state().last_event = instant;
    }

    /// Files under `dirs` modified since the previous scan.
    ///
    /// The event clock advances before any file is checked, so a write
    /// landing during this scan is seen by the next one.
    pub fn modified_files<P: AsRef<Path>>(&self, dirs: &[P], options: ScanOptions) -> Vec<PathBuf> {
        let mut scan = self.scan_state();
        let previous = std::mem::replace(&mut scan.last_event, SystemTime::now());

        let candidates = filter::enumerate_files(dirs, &self.shared.ignore_set, options.all);
        let modified: Vec<PathBuf> = candidates
            .into_iter()
            .filter(|path| detector::is_modified(path, previous, &mut scan.checksums))
            .collect();
        drop(scan);

        trace!(count = modified.len(), "scan finished");
        self.relativize_paths(modified)
    }

    /// Every file under the watch root, ignoring modification state
    pub fn all_files(&self) -> Vec<PathBuf> {
        filter::enumerate_files(&[&self.shared.directory], &self.shared.ignore_set, true)
    }

    /// Strip the watch root from each path when relativization is on
    pub fn relativize_paths(&self, paths: Vec<PathBuf>) -> Vec<PathBuf> {
        if !self.shared.relativize {
            return paths;
        }
        paths
            .into_iter()
            .map(|path| relativize(&self.shared.directory, path))
            .collect()
    }

    /// Queue already-detected paths for dispatch, in order.
    ///
    /// Paths already waiting in the queue are not queued twice. Returns how
    /// many paths were newly queued.
    pub fn report_changes(&self, paths: Vec<PathBuf>) -> usize {
        if paths.is_empty() {
            return 0;
        }
        let queued = self.shared.queue.extend(paths);
        debug!(queued, "queueing changed files");
        queued
    }

    /// Filter, confirm and queue paths reported by a native backend.
    ///
    /// Paths outside the watch root, below an ignored name, or that are not
    /// regular files are dropped. The rest go through the same timestamp
    /// check as a scan: an mtime past the previous scan's second counts as a
    /// change even if the content is identical (a `touch`). Only when the
    /// timestamps do not move is the content fingerprint compared, so a late
    /// event for an unchanged file is dropped. Returns the number of paths
    /// newly queued.
    pub fn report_events(&self, paths: Vec<PathBuf>) -> usize {
        let candidates: Vec<PathBuf> = dedup_in_order(paths)
            .into_iter()
            .filter_map(|path| self.watched_file(path))
            .collect();
        if candidates.is_empty() {
            return 0;
        }

        let mut scan = self.scan_state();
        let previous = std::mem::replace(&mut scan.last_event, SystemTime::now());
        let confirmed: Vec<PathBuf> = candidates
            .into_iter()
            .filter(|path| detector::confirm_reported_change(path, previous, &mut scan.checksums))
            .collect();
        drop(scan);

        self.report_changes(self.relativize_paths(confirmed))
    }

    /// Absolute form of `path` if it is a regular file the listener should see
    fn watched_file(&self, path: PathBuf) -> Option<PathBuf> {
        let absolute = if path.is_absolute() {
            path
        } else {
            self.shared.directory.join(path)
        };
        let relative = absolute.strip_prefix(&self.shared.directory).ok()?;
        if self.shared.ignore_set.ignores_any_component(relative) {
            return None;
        }
        absolute.is_file().then_some(absolute)
    }
}

fn relativize(root: &Path, path: PathBuf) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
        _ => path,
    }
}

fn dedup_in_order(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = std::collections::HashSet::new();
    paths
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect()
}
