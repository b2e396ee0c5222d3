use crate::report::window::{ReportWindow, MAX_PERIOD_DAYS};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "repo-sentinel")]
#[command(author, version)]
#[command(
    about = "Watches GitHub repositories and turns their recent activity into progress reports",
    long_about = "repo-sentinel fetches the commits, issues and pull requests of a GitHub \
                  repository over a date range, writes them to a raw progress file, and \
                  summarizes that file into a readable report with Claude. Run without a \
                  command for interactive mode."
)]
pub struct Cli {
    /// Path to config file (default: ~/.config/repo-sentinel/config.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch activity and write the raw progress file only
    Export(RangeArgs),

    /// Fetch activity, write the raw file and summarize it
    Report {
        #[command(flatten)]
        range: RangeArgs,

        /// Disable caching
        #[arg(long)]
        no_cache: bool,
    },

    /// Manage watched repositories
    #[command(subcommand)]
    Subscriptions(SubscriptionCommand),

    /// Initialize configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration
    Config,

    /// Clear the report cache
    ClearCache,

    /// Show cache statistics
    CacheStats,
}

#[derive(Subcommand, Debug)]
pub enum SubscriptionCommand {
    /// List watched repositories
    List,
    /// Watch a repository (owner/repo or GitHub URL)
    Add { repo: String },
    /// Stop watching a repository
    Remove { repo: String },
}

#[derive(Args, Debug)]
pub struct RangeArgs {
    /// Repository (owner/repo or GitHub URL)
    pub repo: String,

    /// Number of days to look back (1-30)
    #[arg(
        short,
        long,
        value_name = "DAYS",
        value_parser = clap::value_parser!(u32).range(1..=MAX_PERIOD_DAYS as i64),
        conflicts_with_all = ["since", "until"]
    )]
    pub days: Option<u32>,

    /// Start date (YYYY-MM-DD format)
    #[arg(long, requires = "until")]
    pub since: Option<String>,

    /// End date (YYYY-MM-DD format)
    #[arg(long, requires = "since")]
    pub until: Option<String>,
}

impl RangeArgs {
    /// Resolve the requested window, falling back to the last `default_days`
    pub fn window(&self, default_days: u32) -> crate::error::Result<ReportWindow> {
        match (&self.since, &self.until) {
            (Some(since), Some(until)) => ReportWindow::range(since, until),
            _ => ReportWindow::period(self.days.unwrap_or(default_days)),
        }
    }
}
