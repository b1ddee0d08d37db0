//! Configuration type definitions

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ConfigWarning;
use crate::error::LookoutResult;

use super::loader;

/// Which backend the selection policy may pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendPreference {
    /// First usable native backend, else polling
    #[default]
    Auto,
    /// Native notifications only, polling if unusable
    Native,
    /// Always poll
    Polling,
}

impl BackendPreference {
    pub const VALID: &'static [&'static str] = &["auto", "native", "polling"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "native" => Some(Self::Native),
            "polling" | "poll" => Some(Self::Polling),
            _ => None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    1000
}

/// Listener configuration
///
/// `directory` never comes from the file: the file is looked up inside the
/// directory being watched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerConfig {
    #[serde(skip)]
    pub directory: PathBuf,

    #[serde(default = "default_true")]
    pub relativize_paths: bool,

    #[serde(default)]
    pub ignore_paths: Vec<String>,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default)]
    pub backend: BackendPreference,

    /// Run the background dispatch loop
    #[serde(default = "default_true")]
    pub dispatch: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            directory: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            relativize_paths: true,
            ignore_paths: Vec::new(),
            poll_interval_ms: default_poll_interval_ms(),
            backend: BackendPreference::default(),
            dispatch: true,
        }
    }
}

impl ListenerConfig {
    /// Defaults for watching `directory`
    pub fn for_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    /// Load a config file, ignoring warnings
    pub fn load(path: &Path) -> LookoutResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load a config file and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> LookoutResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Project file in `directory` (if any) plus `LOOKOUT_*` overrides
    pub fn resolve(directory: &Path) -> LookoutResult<(Self, Vec<ConfigWarning>)> {
        loader::resolve(directory)
    }

    /// Apply environment variable overrides (LOOKOUT_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    pub fn with_relativize_paths(mut self, relativize: bool) -> Self {
        self.relativize_paths = relativize;
        self
    }

    pub fn with_ignore_paths<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_paths.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_backend(mut self, backend: BackendPreference) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis().max(1) as u64;
        self
    }

    pub fn with_dispatch(mut self, dispatch: bool) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}
