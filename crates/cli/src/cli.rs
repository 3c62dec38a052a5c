//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Lever Watcher - monitor job postings on Lever and notify on new ones
#[derive(Parser, Debug)]
#[command(
    name = "lever-watcher",
    author,
    version,
    about = "Monitor Lever job postings and notify on new ones",
    long_about = "Polls an organization's public Lever job board, remembers what it saw \n\
                  last time, and sends newly appeared postings to Slack and/or Discord."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "LEVER_WATCHER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all log output except warnings and errors
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "LEVER_WATCHER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check for new jobs and notify
    Watch(WatchArgs),

    /// List all current jobs
    List(ListArgs),

    /// Validate a configuration file without running
    Validate(ValidateArgs),

    /// Inspect or reset a destination's delivery history
    History(HistoryArgs),
}

/// Where postings come from and how they are filtered
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Lever organization identifier (e.g. `leverdemo`)
    #[arg(value_name = "COMPANY_ID", required_unless_present = "config")]
    pub company_id: Option<String>,

    /// Configuration file (TOML or JSON); CLI flags override its values
    #[arg(short, long, env = "LEVER_WATCHER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Regex pattern to filter jobs (case-insensitive, title or description)
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Query string for the Lever API (e.g. 'location=Tokyo&commitment=Full-time')
    #[arg(short, long)]
    pub query: Option<String>,
}

/// Arguments for the `watch` command
#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Slack incoming webhook URL
    #[arg(long, env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
    pub slack_webhook: Option<String>,

    /// Discord webhook URL
    #[arg(long, env = "DISCORD_WEBHOOK_URL", hide_env_values = true)]
    pub discord_webhook: Option<String>,

    /// Also write notifications to the log
    #[arg(long)]
    pub log_notifications: bool,

    /// State storage directory
    #[arg(long, env = "LEVER_WATCHER_STORAGE")]
    pub storage: Option<PathBuf>,
}

/// Arguments for the `list` command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for the `validate` command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "watch.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `history` command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// State storage directory [default: the config's storage_dir, else ~/.lever-watcher]
    #[arg(long, global = true, env = "LEVER_WATCHER_STORAGE")]
    pub storage: Option<PathBuf>,

    /// Configuration file whose `storage_dir` locates the history
    #[arg(short, long, global = true, env = "LEVER_WATCHER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub action: HistoryAction,
}

#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    /// Print the posting IDs recorded as delivered
    Show {
        /// Destination name (e.g. `discord`)
        destination: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Forget every delivered ID so the destination receives postings again
    Reset {
        /// Destination name (e.g. `discord`)
        destination: String,
    },
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
