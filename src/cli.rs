use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use lookout::BackendPreference;

/// Lookout - report files that changed under a directory
#[derive(Parser, Debug)]
#[command(name = "lookout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit newline-delimited JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that builds a listener
#[derive(clap::Args, Debug, Clone)]
pub struct WatchArgs {
    /// Directory to watch
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Report absolute paths instead of paths relative to the directory
    #[arg(long)]
    pub absolute: bool,

    /// Extra names to ignore (repeatable or comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Backend to use
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,

    /// Polling interval in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch a directory and print each batch of changed files
    Watch {
        #[command(flatten)]
        args: WatchArgs,
    },

    /// List every non-ignored file under a directory
    Files {
        #[command(flatten)]
        args: WatchArgs,
    },

    /// One scan for files modified in the last N seconds
    Scan {
        #[command(flatten)]
        args: WatchArgs,

        /// Look back this many seconds
        #[arg(long, default_value_t = 0)]
        since_secs: u64,

        /// Only check direct children of the directory
        #[arg(long)]
        shallow: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendArg {
    Auto,
    Native,
    Polling,
}

impl From<BackendArg> for BackendPreference {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Auto => BackendPreference::Auto,
            BackendArg::Native => BackendPreference::Native,
            BackendArg::Polling => BackendPreference::Polling,
        }
    }
}
