//! Configuration module for Lookout
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (LOOKOUT_*)
//! 3. Project config (`.lookout.toml` in the watched directory)
//! 4. Built-in defaults (lowest priority)

mod env_validator;
mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;
pub use env_validator::{closest, levenshtein, EnvVarValidator, InvalidEnvValue};
pub use loader::{with_env_overrides_from, CONFIG_FILE_NAME, TEST_ENV_VALUE};
pub use types::{BackendPreference, ListenerConfig};
