//! Configuration loading and environment overrides

use std::fs;
use std::path::Path;

use crate::domain::value_objects::ConfigWarning;
use crate::error::{LookoutError, LookoutResult};

use super::env_validator::{closest, EnvVarValidator};
use super::types::{BackendPreference, ListenerConfig};

/// Project config file looked up in the watched directory
pub const CONFIG_FILE_NAME: &str = ".lookout.toml";

/// `LOOKOUT_ENV` value that disables the background dispatch loop
pub const TEST_ENV_VALUE: &str = "test";

const KNOWN_KEYS: &[&str] = &[
    "relativize_paths",
    "ignore_paths",
    "poll_interval_ms",
    "backend",
    "dispatch",
];

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> LookoutResult<(ListenerConfig, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let mut config: ListenerConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| LookoutError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if let Some(parent) = path.parent() {
        config.directory = parent.to_path_buf();
    }

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Project config for `directory` (or defaults) with env overrides applied
pub fn resolve(directory: &Path) -> LookoutResult<(ListenerConfig, Vec<ConfigWarning>)> {
    let project_config = directory.join(CONFIG_FILE_NAME);
    let (mut config, warnings) = if project_config.is_file() {
        load_with_warnings(&project_config)?
    } else {
        (ListenerConfig::default(), Vec::new())
    };
    config.directory = directory.to_path_buf();
    Ok((with_env_overrides(config), warnings))
}

/// Apply environment variable overrides (LOOKOUT_* prefix)
pub fn with_env_overrides(config: ListenerConfig) -> ListenerConfig {
    with_env_overrides_from(config, |name| std::env::var(name).ok())
}

/// Apply overrides read through `lookup`, so callers can supply a fixed environment
pub fn with_env_overrides_from<F>(mut config: ListenerConfig, lookup: F) -> ListenerConfig
where
    F: Fn(&str) -> Option<String>,
{
    // LOOKOUT_ENV=test disables the dispatch loop
    if let Some(env) = lookup("LOOKOUT_ENV") {
        if env.trim().eq_ignore_ascii_case(TEST_ENV_VALUE) {
            config.dispatch = false;
        }
    }

    // LOOKOUT_BACKEND
    if let Some(backend) = lookup("LOOKOUT_BACKEND") {
        let validator = EnvVarValidator::new("LOOKOUT_BACKEND", BackendPreference::VALID);
        config.backend = validator.parse(&backend, BackendPreference::parse, config.backend);
    }

    // LOOKOUT_POLL_INTERVAL_MS
    if let Some(interval) = lookup("LOOKOUT_POLL_INTERVAL_MS") {
        let validator = EnvVarValidator::new("LOOKOUT_POLL_INTERVAL_MS", &["<milliseconds>"]);
        config.poll_interval_ms = validator.parse(
            &interval,
            |s| s.trim().parse::<u64>().ok().filter(|ms| *ms > 0),
            config.poll_interval_ms,
        );
    }

    // LOOKOUT_RELATIVIZE_PATHS
    if let Some(relativize) = lookup("LOOKOUT_RELATIVIZE_PATHS") {
        let validator = EnvVarValidator::new("LOOKOUT_RELATIVIZE_PATHS", &["true", "false"]);
        config.relativize_paths =
            validator.parse(&relativize, parse_bool, config.relativize_paths);
    }

    // LOOKOUT_IGNORE_PATHS (comma-separated, merged)
    if let Some(names) = lookup("LOOKOUT_IGNORE_PATHS") {
        for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if !config.ignore_paths.iter().any(|existing| existing == name) {
                config.ignore_paths.push(name.to_string());
            }
        }
    }

    config
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    closest(unknown, KNOWN_KEYS, 3).map(str::to_string)
}
