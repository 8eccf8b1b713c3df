use std::path::PathBuf;

use clap::Parser;

use crate::logging::Verbosity;

/// School back-office sidecar speaking newline-delimited JSON on stdin/stdout.
#[derive(Debug, Parser)]
#[command(name = "campusd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Open this workspace directory at startup
    #[arg(short, long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Artificial delay before each store call, in milliseconds
    #[arg(long, value_name = "MS")]
    pub latency_ms: Option<u64>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}
