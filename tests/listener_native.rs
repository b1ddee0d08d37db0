//! End-to-end behavior with the native notification backend.
//!
//! Skipped where `notify` has no native watcher for this platform.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use lookout::{Backend, Listener, ListenerConfig, NotifyBackend};
use notify::RecommendedWatcher;
use tempfile::tempdir;

const WAIT: Duration = Duration::from_secs(5);
const SETTLE: Duration = Duration::from_millis(300);

fn native_listener(dir: &Path) -> Listener {
    let config = ListenerConfig::for_directory(dir);
    Listener::with_backend(&config, Box::new(NotifyBackend::new())).unwrap()
}

fn record_batches(listener: &Listener) -> Receiver<Vec<PathBuf>> {
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    listener.on_change(move |paths| {
        let _ = tx.lock().unwrap().send(paths);
    });
    rx
}

/// Wait until `expected` is queued, then a little longer for trailing events
fn wait_until_queued(listener: &Listener, expected: &[PathBuf]) {
    let deadline = Instant::now() + WAIT;
    while Instant::now() < deadline {
        let queued = listener.changed_files();
        if expected.iter().all(|path| queued.contains(path)) {
            thread::sleep(SETTLE);
            return;
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("never queued {:?}, have {:?}", expected, listener.changed_files());
}

#[test]
fn test_native_create_edit_and_ignored_write() {
    if !NotifyBackend::usable() {
        return;
    }
    let dir = tempdir().unwrap();
    let mut listener = native_listener(dir.path());
    let rx = record_batches(&listener);
    let root = listener.directory().to_path_buf();
    fs::create_dir_all(root.join("tmp")).unwrap();

    listener.lock();
    listener.start().unwrap();
    assert_eq!(listener.backend_name(), "notify");
    let worker = listener.worker().unwrap();
    assert!(worker.downcast_ref::<RecommendedWatcher>().is_some());

    // One create plus an edit while locked: a single entry
    fs::write(root.join("a.txt"), "first").unwrap();
    fs::write(root.join("a.txt"), "second, longer").unwrap();
    fs::write(root.join("tmp/scratch.txt"), "ignored").unwrap();
    wait_until_queued(&listener, &[PathBuf::from("a.txt")]);
    assert_eq!(listener.changed_files(), vec![PathBuf::from("a.txt")]);

    listener.unlock();
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), vec![PathBuf::from("a.txt")]);

    // Unlocked edit of another file arrives as its own batch
    listener.lock();
    fs::write(root.join("b.txt"), "b").unwrap();
    wait_until_queued(&listener, &[PathBuf::from("b.txt")]);
    listener.unlock();
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), vec![PathBuf::from("b.txt")]);

    // Only ignored activity: nothing further is delivered
    fs::write(root.join("tmp/scratch.txt"), "still ignored").unwrap();
    assert!(rx.recv_timeout(SETTLE).is_err());

    listener.stop();
}

#[test]
fn test_native_single_write_is_one_entry() {
    if !NotifyBackend::usable() {
        return;
    }
    let dir = tempdir().unwrap();
    let mut listener = native_listener(dir.path());
    let rx = record_batches(&listener);
    let root = listener.directory().to_path_buf();

    listener.lock();
    listener.start().unwrap();
    fs::write(root.join("one.txt"), "content").unwrap();
    wait_until_queued(&listener, &[PathBuf::from("one.txt")]);
    assert_eq!(listener.changed_files(), vec![PathBuf::from("one.txt")]);

    listener.unlock();
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), vec![PathBuf::from("one.txt")]);
    assert!(rx.recv_timeout(SETTLE).is_err());
    listener.stop();
}
