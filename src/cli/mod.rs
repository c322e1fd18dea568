//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// wikisync - push local MediaWiki content files to a wiki
#[derive(Parser, Debug)]
#[command(name = "wikisync", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Wiki base URL (e.g. http://localhost:8080)
    #[arg(long, global = true, env = "WIKISYNC_URL")]
    pub url: Option<String>,

    /// Wiki username
    #[arg(long, global = true, env = "WIKISYNC_USERNAME")]
    pub username: Option<String>,

    /// Wiki password
    #[arg(long, global = true, env = "WIKISYNC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Config file (default: ~/.wikisync/config.json)
    #[arg(long, global = true, env = "WIKISYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish changed content files to the wiki
    Push(PushArgs),

    /// Print version information
    Version,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Args, Debug, Default)]
pub struct PushArgs {
    /// Content directory (default: internal-wiki/content)
    #[arg(long)]
    pub content_dir: Option<PathBuf>,

    /// Sync a single file instead of the whole directory
    #[arg(long, conflicts_with = "watch")]
    pub file: Option<PathBuf>,

    /// Keep running and sync changes as they appear
    #[arg(long)]
    pub watch: bool,

    /// Seconds between watch passes (default: 5)
    #[arg(long, requires = "watch")]
    pub interval: Option<u64>,

    /// Publish every file even if it has not changed (not with --watch)
    #[arg(long, conflicts_with = "watch")]
    pub force: bool,
}
