//! Per-file modification detection
//!
//! Filesystem timestamps are commonly truncated to whole seconds, so a file
//! written in the same second as the previous scan cannot be told apart from
//! an untouched one by its timestamps. In that case the content fingerprint
//! decides.

use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::trace;

use crate::domain::entities::ChecksumIndex;
use crate::domain::value_objects::Fingerprint;

/// Why a file was reported as modified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifiedBy {
    /// mtime moved past the previous scan
    Timestamp,
    /// Timestamps were ambiguous and the fingerprint differed
    Content,
}

/// Outcome of checking a single path
#[derive(Debug)]
pub enum Detection {
    Modified(ModifiedBy),
    Unmodified,
    /// The path could not be stat'ed or read. Treated as unmodified.
    Indeterminate(io::Error),
}

impl Detection {
    pub fn is_modified(&self) -> bool {
        matches!(self, Detection::Modified(_))
    }
}

/// mtime and ctime of a file, in whole seconds since the epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStamp {
    pub mtime: i64,
    pub ctime: i64,
}

impl FileStamp {
    pub fn read(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let mtime = unix_seconds(metadata.modified()?);
        Ok(Self {
            mtime,
            ctime: change_seconds(&metadata).unwrap_or(mtime),
        })
    }

    /// The later of mtime and ctime
    pub fn latest(&self) -> i64 {
        self.mtime.max(self.ctime)
    }
}

#[cfg(unix)]
fn change_seconds(metadata: &Metadata) -> Option<i64> {
    use std::os::unix::fs::MetadataExt;
    Some(metadata.ctime())
}

#[cfg(not(unix))]
fn change_seconds(metadata: &Metadata) -> Option<i64> {
    metadata.created().ok().map(unix_seconds)
}

/// Seconds since the epoch, rounded toward negative infinity
pub fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as i64,
        Err(err) => {
            let before = err.duration();
            let secs = before.as_secs() as i64;
            if before.subsec_nanos() > 0 {
                -secs - 1
            } else {
                -secs
            }
        }
    }
}

/// Decide whether `path` changed since `last_event`, updating `index` when it did.
pub fn detect(path: &Path, last_event: SystemTime, index: &mut ChecksumIndex) -> Detection {
    match FileStamp::read(path) {
        Ok(stamp) => detect_with_stamp(path, stamp, unix_seconds(last_event), index),
        Err(err) => Detection::Indeterminate(err),
    }
}

/// `detect` folded to a boolean; indeterminate counts as unmodified.
pub fn is_modified(path: &Path, last_event: SystemTime, index: &mut ChecksumIndex) -> bool {
    match detect(path, last_event, index) {
        Detection::Indeterminate(err) => {
            trace!(path = %path.display(), %err, "could not determine modification");
            false
        }
        detection => detection.is_modified(),
    }
}

/// Confirm a path the OS already reported as touched.
///
/// Native events can arrive after the timestamps fell behind the event
/// clock, so an "unmodified" verdict is re-checked against the cached
/// fingerprint. A touch that moves mtime past the event clock's second is
/// still reported, as a scan would report it.
pub fn confirm_reported_change(
    path: &Path,
    last_event: SystemTime,
    index: &mut ChecksumIndex,
) -> bool {
    match detect(path, last_event, index) {
        Detection::Modified(_) => true,
        Detection::Unmodified => match Fingerprint::of_file(path) {
            Ok(fingerprint) => index.record_if_changed(path, fingerprint),
            Err(_) => false,
        },
        Detection::Indeterminate(err) => {
            trace!(path = %path.display(), %err, "reported path vanished");
            false
        }
    }
}

pub(crate) fn detect_with_stamp(
    path: &Path,
    stamp: FileStamp,
    last_event_secs: i64,
    index: &mut ChecksumIndex,
) -> Detection {
    if stamp.latest() == last_event_secs {
        let fingerprint = match Fingerprint::of_file(path) {
            Ok(fingerprint) => fingerprint,
            Err(err) => return Detection::Indeterminate(err),
        };
        if index.record_if_changed(path, fingerprint) {
            Detection::Modified(ModifiedBy::Content)
        } else {
            Detection::Unmodified
        }
    } else if stamp.mtime > last_event_secs {
        match Fingerprint::of_file(path) {
            Ok(fingerprint) => {
                index.record(path, fingerprint);
                Detection::Modified(ModifiedBy::Timestamp)
            }
            Err(err) => Detection::Indeterminate(err),
        }
    } else {
        Detection::Unmodified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_unix_seconds_floors() {
        let t = UNIX_EPOCH + Duration::from_millis(1_999);
        assert_eq!(unix_seconds(t), 1);
        let before = UNIX_EPOCH - Duration::from_millis(500);
        assert_eq!(unix_seconds(before), -1);
        let exact = UNIX_EPOCH - Duration::from_secs(2);
        assert_eq!(unix_seconds(exact), -2);
    }

    #[test]
    fn test_same_second_new_content_is_modified() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "a.txt", "fresh");
        let stamp = FileStamp { mtime: 100, ctime: 100 };
        let mut index = ChecksumIndex::new();
        index.record(&path, Fingerprint::of_bytes(b"stale"));

        let detection = detect_with_stamp(&path, stamp, 100, &mut index);
        assert!(matches!(detection, Detection::Modified(ModifiedBy::Content)));
        assert_eq!(index.get(&path), Some(&Fingerprint::of_bytes(b"fresh")));
    }

    #[test]
    fn test_same_second_identical_content_is_unmodified() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "a.txt", "same");
        let stamp = FileStamp { mtime: 100, ctime: 100 };
        let mut index = ChecksumIndex::new();
        index.record(&path, Fingerprint::of_bytes(b"same"));

        let detection = detect_with_stamp(&path, stamp, 100, &mut index);
        assert!(matches!(detection, Detection::Unmodified));
    }

    #[test]
    fn test_ctime_alone_can_trigger_the_content_check() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "a.txt", "chmod only");
        let stamp = FileStamp { mtime: 90, ctime: 100 };
        let mut index = ChecksumIndex::new();

        let detection = detect_with_stamp(&path, stamp, 100, &mut index);
        assert!(matches!(detection, Detection::Modified(ModifiedBy::Content)));
    }

    #[test]
    fn test_later_mtime_is_modified_and_recorded() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "a.txt", "new");
        let stamp = FileStamp { mtime: 105, ctime: 105 };
        let mut index = ChecksumIndex::new();

        let detection = detect_with_stamp(&path, stamp, 100, &mut index);
        assert!(matches!(detection, Detection::Modified(ModifiedBy::Timestamp)));
        assert_eq!(index.get(&path), Some(&Fingerprint::of_bytes(b"new")));
    }

    #[test]
    fn test_older_timestamps_are_unmodified() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "a.txt", "old");
        let stamp = FileStamp { mtime: 50, ctime: 60 };
        let mut index = ChecksumIndex::new();

        let detection = detect_with_stamp(&path, stamp, 100, &mut index);
        assert!(matches!(detection, Detection::Unmodified));
        assert!(index.is_empty());
    }

    #[test]
    fn test_missing_file_is_indeterminate_and_not_modified() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deleted.txt");
        let mut index = ChecksumIndex::new();

        let detection = detect(&path, SystemTime::now(), &mut index);
        assert!(matches!(detection, Detection::Indeterminate(_)));
        assert!(!is_modified(&path, SystemTime::now(), &mut index));
    }

    #[test]
    fn test_real_file_in_the_scan_second() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "a.txt", "content");
        let stamp = FileStamp::read(&path).unwrap();
        let last_event = UNIX_EPOCH + Duration::from_secs(stamp.latest() as u64);
        let mut index = ChecksumIndex::new();

        assert!(is_modified(&path, last_event, &mut index));
        assert!(!is_modified(&path, last_event, &mut index));
    }

    #[test]
    fn test_reported_change_falls_back_to_content() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "a.txt", "v1");
        let mut index = ChecksumIndex::new();
        index.record(&path, Fingerprint::of_bytes(b"v0"));

        let later = SystemTime::now() + Duration::from_secs(60);
        assert!(confirm_reported_change(&path, later, &mut index));
        assert!(!confirm_reported_change(&path, later, &mut index));
    }

    #[test]
    fn test_reported_missing_path_is_dropped() {
        let dir = tempdir().unwrap();
        let mut index = ChecksumIndex::new();
        assert!(!confirm_reported_change(
            &dir.path().join("gone.txt"),
            SystemTime::now(),
            &mut index
        ));
    }

    #[test]
    fn test_real_file_older_than_scan() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "a.txt", "content");
        let mut index = ChecksumIndex::new();

        let later = SystemTime::now() + Duration::from_secs(60);
        assert!(!is_modified(&path, later, &mut index));
    }
}
