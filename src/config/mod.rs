pub mod toml_config;

pub use toml_config::{ConfigResolver, Configuration};

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "slack-collector")]
#[command(about = "Collect the Slack member directory into an anonymized dated snapshot")]
pub struct CliArgs {
    /// Config file, relative to <app-root>/config unless absolute
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Application root; defaults to the directory of the executable
    #[arg(long, env = "SLACK_COLLECTOR_ROOT")]
    pub app_root: Option<PathBuf>,

    /// Fetch and anonymize, but do not write a snapshot
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}
