use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{Context, Result};
use chrono::Local;
use lookout::Listener;
use tracing::info;

use super::listener_config;
use crate::cli::WatchArgs;

pub fn cmd_watch(args: &WatchArgs, json: bool) -> Result<()> {
    let config = listener_config(args)?;
    let mut listener = Listener::new(&config)?;

    listener.on_change(move |paths| print_batch(&paths, json));

    // Set up Ctrl+C handler
    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })
    .context("Error setting Ctrl+C handler")?;

    listener.start()?;
    if json {
        let output = serde_json::json!({
            "event": "started",
            "directory": listener.directory(),
            "backend": listener.backend_name(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Watching {} ({})", listener.directory().display(), listener.backend_name());
        println!("Press Ctrl+C to stop\n");
    }

    let _ = stop_rx.recv();
    info!("interrupted");
    listener.stop();

    if json {
        println!("{}", serde_json::json!({ "event": "shutdown" }));
    }
    Ok(())
}

fn print_batch(paths: &[PathBuf], json: bool) {
    let mut out = std::io::stdout().lock();
    let now = Local::now();
    let result = if json {
        let output = serde_json::json!({
            "event": "changes",
            "timestamp": now.to_rfc3339(),
            "paths": paths,
        });
        writeln!(out, "{}", output)
    } else {
        let timestamp = now.format("%H:%M:%S");
        paths
            .iter()
            .try_for_each(|path| writeln!(out, "[{}] {}", timestamp, path.display()))
    };
    // stdout closed (e.g. piped into `head`)
    let _ = result.and_then(|()| out.flush());
}
