use std::time::{Duration, SystemTime};

use anyhow::Result;
use lookout::{Listener, ScanOptions};

use super::{listener_config, print_paths};
use crate::cli::WatchArgs;

pub fn cmd_scan(args: &WatchArgs, since_secs: u64, shallow: bool, json: bool) -> Result<()> {
    let config = listener_config(args)?.with_dispatch(false);
    let listener = Listener::new(&config)?;

    let since = SystemTime::now()
        .checked_sub(Duration::from_secs(since_secs))
        .unwrap_or(SystemTime::UNIX_EPOCH);
    listener.handle().set_last_event(since);

    let directory = listener.directory().to_path_buf();
    let modified = listener.modified_files(&[directory], ScanOptions { all: !shallow });
    print_paths("scan", &modified, json)
}
