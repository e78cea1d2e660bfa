use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch every site, detect its platform, and record changes.
    Run(RunArgs),
    /// Remove duplicate entries from the site list in place.
    Dedup(DedupArgs),
    /// Fetch a single URL and print the detected platform.
    Classify(ClassifyArgs),
    /// Summarize platform usage from the history store.
    Stats(StatsArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Site list (JSON array of `{"name", "url"}` objects).
    #[arg(long, default_value = "sites.json")]
    pub sites: String,

    /// History store, rewritten at the end of the run.
    #[arg(long, default_value = "data.json")]
    pub data: String,

    /// Per-site fetch timeout (overrides PLATFORMWATCH_TIMEOUT_SECS).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Observation date (default: today, UTC).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Leave history untouched for sites whose fetch fails.
    #[arg(long, default_value_t = false)]
    pub skip_failed: bool,
}

#[derive(Debug, Args)]
pub struct DedupArgs {
    /// Site list to deduplicate (overwritten).
    #[arg(long, default_value = "sites.json")]
    pub sites: String,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Page to fetch (must be http/https).
    #[arg(long)]
    pub url: String,

    /// Fetch timeout (overrides PLATFORMWATCH_TIMEOUT_SECS).
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// History store to read.
    #[arg(long, default_value = "data.json")]
    pub data: String,

    /// Number of platforms to list per table.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Print machine-readable JSON instead of tables.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
