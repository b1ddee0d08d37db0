pub mod files;
pub mod scan;
pub mod watch;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use lookout::ListenerConfig;
use tracing::warn;

use crate::cli::WatchArgs;

/// Config for `args`: project file, then env, then flags
pub fn listener_config(args: &WatchArgs) -> Result<ListenerConfig> {
    let (mut config, warnings) = ListenerConfig::resolve(&args.directory)
        .with_context(|| format!("loading config for {}", args.directory.display()))?;
    for warning in &warnings {
        warn!("{}", warning);
    }

    if args.absolute {
        config = config.with_relativize_paths(false);
    }
    if let Some(backend) = args.backend {
        config = config.with_backend(backend.into());
    }
    if let Some(ms) = args.poll_interval_ms {
        config = config.with_poll_interval(Duration::from_millis(ms));
    }
    Ok(config.with_ignore_paths(args.ignore.iter().cloned()))
}

/// One path per line, or a single JSON event
pub fn print_paths(event: &str, paths: &[PathBuf], json: bool) -> Result<()> {
    let mut out = std::io::stdout().lock();
    if json {
        let output = serde_json::json!({
            "event": event,
            "count": paths.len(),
            "paths": paths,
        });
        writeln!(out, "{}", serde_json::to_string(&output)?)?;
    } else {
        for path in paths {
            writeln!(out, "{}", path.display())?;
        }
    }
    Ok(())
}
