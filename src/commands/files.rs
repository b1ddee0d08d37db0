use anyhow::Result;
use lookout::Listener;

use super::{listener_config, print_paths};
use crate::cli::WatchArgs;

pub fn cmd_files(args: &WatchArgs, json: bool) -> Result<()> {
    let config = listener_config(args)?.with_dispatch(false);
    let listener = Listener::new(&config)?;

    let files = listener.relativize_paths(listener.all_files());
    print_paths("files", &files, json)
}
