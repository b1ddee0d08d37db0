//! Checksum index for same-second change detection

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::Fingerprint;

/// Last observed content fingerprint per absolute file path.
///
/// Entries are only ever inserted or overwritten. Entries for deleted files
/// stay behind and are consulted again only if the path reappears.
#[derive(Debug, Default, Clone)]
pub struct ChecksumIndex {
    fingerprints: HashMap<PathBuf, Fingerprint>,
}

impl ChecksumIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<&Fingerprint> {
        self.fingerprints.get(path)
    }

    /// Record `fingerprint` for `path`, replacing any previous value
    pub fn record(&mut self, path: &Path, fingerprint: Fingerprint) {
        self.fingerprints.insert(path.to_path_buf(), fingerprint);
    }

    /// Compare `fingerprint` with the cached one and record it if it differs.
    ///
    /// Returns true when the content changed (or was never seen).
    pub fn record_if_changed(&mut self, path: &Path, fingerprint: Fingerprint) -> bool {
        match self.fingerprints.get(path) {
            Some(cached) if *cached == fingerprint => false,
            _ => {
                self.record(path, fingerprint);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }
}
