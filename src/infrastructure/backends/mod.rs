//! Backend implementations and the selection policy
//!
//! Selection walks the candidates for the configured preference and picks
//! the first one whose capability check succeeds, falling back to polling.

mod native;
mod polling;

pub use native::NotifyBackend;
pub use polling::{PollingBackend, DEFAULT_POLL_INTERVAL};

use tracing::{debug, info};

use crate::config::{BackendPreference, ListenerConfig};
use crate::domain::ports::Backend;

/// Known backend variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Native,
    Polling,
}

impl BackendKind {
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Native => "notify",
            BackendKind::Polling => "polling",
        }
    }

    /// Capability check for this variant on the current platform
    pub fn usable(self) -> bool {
        match self {
            BackendKind::Native => NotifyBackend::usable(),
            BackendKind::Polling => PollingBackend::usable(),
        }
    }

    pub fn build(self, config: &ListenerConfig) -> Box<dyn Backend> {
        match self {
            BackendKind::Native => Box::new(NotifyBackend::new()),
            BackendKind::Polling => Box::new(PollingBackend::new(config.poll_interval())),
        }
    }
}

/// Candidates in priority order for a preference
pub fn candidates(preference: BackendPreference) -> &'static [BackendKind] {
    match preference {
        BackendPreference::Auto | BackendPreference::Native => {
            &[BackendKind::Native, BackendKind::Polling]
        }
        BackendPreference::Polling => &[BackendKind::Polling],
    }
}

/// First candidate passing `usable`, polling otherwise
pub fn select_kind_with<F>(preference: BackendPreference, usable: F) -> BackendKind
where
    F: Fn(BackendKind) -> bool,
{
    let kind = candidates(preference)
        .iter()
        .copied()
        .find(|kind| usable(*kind))
        .unwrap_or(BackendKind::Polling);

    if kind == BackendKind::Polling && preference != BackendPreference::Polling {
        info!("Using polling (no usable native backend on this system)");
    } else {
        debug!(backend = kind.name(), "selected backend");
    }
    kind
}

/// Check the real platform for the configured preference
pub fn select_kind(preference: BackendPreference) -> BackendKind {
    select_kind_with(preference, BackendKind::usable)
}

/// Build the backend chosen for `config`
pub fn select(config: &ListenerConfig) -> Box<dyn Backend> {
    select_kind(config.backend).build(config)
}
