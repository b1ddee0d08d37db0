//! Ignore set value object
//!
//! Basenames that are never traversed nor reported. Matching is by exact
//! basename only, at every depth below the watch root.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::Path;

/// Basenames excluded unless the caller builds an empty set explicitly.
pub const DEFAULT_IGNORE_PATHS: &[&str] = &[".", "..", ".bundle", ".git", "log", "tmp", "vendor"];

/// Immutable set of ignored basenames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreSet {
    names: BTreeSet<String>,
}

impl Default for IgnoreSet {
    fn default() -> Self {
        Self::with_defaults(std::iter::empty::<String>())
    }
}

/// Names are basenames, so `build/` and `build` are the same entry
fn normalize<S: Into<String>>(name: S) -> Option<String> {
    let name: String = name.into();
    let trimmed = name.trim_end_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl IgnoreSet {
    /// Set containing only the given names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().filter_map(normalize).collect(),
        }
    }

    /// Union of the default names and `extra`.
    pub fn with_defaults<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: BTreeSet<String> =
            DEFAULT_IGNORE_PATHS.iter().map(|s| s.to_string()).collect();
        names.extend(extra.into_iter().filter_map(normalize));
        Self { names }
    }

    /// Whether `name` is an ignored basename.
    pub fn contains(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.names.contains(n))
    }

    /// Whether the final component of `path` is ignored.
    pub fn ignores(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|name| self.contains(name))
    }

    /// Whether any component of `rel_path` is ignored.
    ///
    /// Used for paths reported by native backends, which may point below an
    /// ignored directory.
    pub fn ignores_any_component(&self, rel_path: &Path) -> bool {
        rel_path
            .components()
            .any(|c| self.contains(c.as_os_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn defaults_are_present() {
        let set = IgnoreSet::default();
        for name in DEFAULT_IGNORE_PATHS {
            assert!(set.contains(OsStr::new(name)), "missing {}", name);
        }
        assert_eq!(set.len(), DEFAULT_IGNORE_PATHS.len());
    }

    #[test]
    fn extra_names_are_merged_without_duplicates() {
        let set = IgnoreSet::with_defaults(["node_modules", ".git", "target/"]);
        assert!(set.contains(OsStr::new("node_modules")));
        assert!(set.contains(OsStr::new("target")));
        assert_eq!(set.len(), DEFAULT_IGNORE_PATHS.len() + 2);
    }

    #[test]
    fn matches_basename_only() {
        let set = IgnoreSet::default();
        assert!(set.ignores(&PathBuf::from("/repo/tmp")));
        assert!(!set.ignores(&PathBuf::from("/repo/tmp.rs")));
        assert!(!set.ignores(&PathBuf::from("/repo/logs")));
    }

    #[test]
    fn any_component_catches_nested_paths() {
        let set = IgnoreSet::default();
        assert!(set.ignores_any_component(&PathBuf::from(".git/objects/ab")));
        assert!(set.ignores_any_component(&PathBuf::from("app/vendor/lib.rb")));
        assert!(!set.ignores_any_component(&PathBuf::from("app/models/user.rb")));
    }

    #[test]
    fn explicit_set_has_no_defaults() {
        let set = IgnoreSet::new(["build"]);
        assert!(!set.contains(OsStr::new(".git")));
        assert!(set.contains(OsStr::new("build")));
    }
}
