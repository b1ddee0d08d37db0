//! Native notification backend
//!
//! Wraps `notify`'s recommended watcher (inotify, kqueue, ReadDirectoryChangesW)
//! and forwards the paths each event names to the listener, which filters
//! them and confirms the change before queueing.

use std::any::Any;
use std::path::Path;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{trace, warn};

use crate::domain::ports::Backend;
use crate::error::{LookoutError, LookoutResult};
use crate::listener::ListenerHandle;

/// Backend driven by OS filesystem notifications
#[derive(Default)]
pub struct NotifyBackend {
    watcher: Option<RecommendedWatcher>,
}

impl NotifyBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Whether an event can mean file content was created or changed
fn is_relevant(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any | EventKind::Other
    )
}

impl Backend for NotifyBackend {
    fn name(&self) -> &'static str {
        "notify"
    }

    fn usable() -> bool {
        // Elsewhere notify's recommended watcher is itself a poller
        let native_platform = cfg!(any(
            target_os = "linux",
            target_os = "android",
            target_os = "macos",
            target_os = "windows",
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly",
        ));
        native_platform && notify::recommended_watcher(|_: notify::Result<Event>| {}).is_ok()
    }

    fn watch(&mut self, directory: &Path, listener: ListenerHandle) -> LookoutResult<()> {
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_relevant(&event.kind) => {
                    let queued = listener.report_events(event.paths);
                    trace!(kind = ?event.kind, queued, "native event");
                }
                Ok(_) => {}
                Err(err) => warn!(%err, "notify error"),
            },
            Config::default(),
        )
        .map_err(|e| LookoutError::backend("notify", e))?;

        watcher
            .watch(directory, RecursiveMode::Recursive)
            .map_err(|e| LookoutError::backend("notify", e))?;

        self.watcher = Some(watcher);
        Ok(())
    }

    fn worker(&self) -> LookoutResult<&dyn Any> {
        match &self.watcher {
            Some(watcher) => Ok(watcher as &dyn Any),
            None => Err(LookoutError::backend("notify", "not watching")),
        }
    }

    fn stop(&mut self) {
        // Dropping the watcher unregisters it
        self.watcher = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind};

    #[test]
    fn test_relevant_event_kinds() {
        assert!(is_relevant(&EventKind::Create(CreateKind::File)));
        assert!(is_relevant(&EventKind::Modify(ModifyKind::Any)));
        assert!(!is_relevant(&EventKind::Remove(RemoveKind::File)));
        assert!(!is_relevant(&EventKind::Access(AccessKind::Any)));
    }

    #[test]
    fn test_stop_before_watch() {
        let mut backend = NotifyBackend::new();
        backend.stop();
        assert_eq!(backend.name(), "notify");
        assert!(matches!(backend.worker(), Err(LookoutError::Backend { .. })));
    }
}
