//! Candidate file enumeration with ignore-set exclusion

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::trace;

use crate::domain::value_objects::IgnoreSet;

/// Immediate children of each directory in `dirs` whose basename is not ignored.
///
/// Dotfiles are included. Children are sorted by name within each directory.
/// A directory that cannot be read contributes nothing.
pub fn exclude_ignored<P: AsRef<Path>>(dirs: &[P], ignore_set: &IgnoreSet) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for dir in dirs {
        let dir = trim_trailing_separators(dir.as_ref());
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                trace!(dir = %dir.display(), %err, "skipping unreadable directory");
                continue;
            }
        };
        let mut children: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| !ignore_set.contains(&entry.file_name()))
            .map(|entry| entry.path())
            .collect();
        children.sort();
        paths.extend(children);
    }
    paths
}

/// Regular files under `dirs`.
///
/// Non-recursive: the filtered immediate children that are files.
/// Recursive: every file below the filtered children, with the ignore set
/// re-applied at each level.
///
/// Symlinks to files are reported at any depth. Symlinks to directories are
/// never descended, whether they sit directly under a scanned directory or
/// deeper down.
pub fn enumerate_files<P: AsRef<Path>>(
    dirs: &[P],
    ignore_set: &IgnoreSet,
    recursive: bool,
) -> Vec<PathBuf> {
    let children = exclude_ignored(dirs, ignore_set);
    if !recursive {
        return children.into_iter().filter(|p| p.is_file()).collect();
    }

    let mut files = Vec::new();
    for child in children {
        if child.is_file() {
            files.push(child);
        } else if is_real_dir(&child) {
            files.extend(walk_files(&child, ignore_set));
        }
    }
    files
}

/// Every regular file below `dir`, skipping ignored basenames and entries
/// that vanish mid-walk.
fn walk_files(dir: &Path, ignore_set: &IgnoreSet) -> Vec<PathBuf> {
    let filter_set = ignore_set.clone();
    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            entry.depth() == 0 || !filter_set.contains(entry.file_name())
        })
        .build();

    walker
        .filter_map(|result| match result {
            Ok(entry) => Some(entry),
            Err(err) => {
                trace!(%err, "skipping entry during walk");
                None
            }
        })
        .filter(|entry| entry.depth() > 0)
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file())
        .collect()
}

/// A directory that is not reached through a symlink
fn is_real_dir(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|metadata| metadata.is_dir())
}

fn trim_trailing_separators(dir: &Path) -> PathBuf {
    let raw = dir.to_string_lossy();
    let trimmed = raw.trim_end_matches(|c: char| c == '/' || c == std::path::MAIN_SEPARATOR);
    if trimmed.is_empty() {
        dir.to_path_buf()
    } else {
        PathBuf::from(trimmed)
    }
}
