use clap::{Parser, Subcommand};

/// Calendar view over spreadsheet cron schedules
#[derive(Parser, Debug)]
#[command(name = "cronsheet")]
#[command(about = "Calendar view over spreadsheet cron schedules")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize sheet rows into jobs
    Jobs(JobsArgs),
    /// Group a month's occurrences by calendar day
    Month(MonthArgs),
    /// Show one day's occurrences, filtered and grouped by time
    Day(DayArgs),
    /// Expand a single cron expression over a time range
    Expand(ExpandArgs),
    /// List configured calendars with their resolved tabs
    Calendars(CalendarsArgs),
}

#[derive(clap::Args, Debug)]
pub struct JobsArgs {
    /// Sheet values file (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct MonthArgs {
    /// Sheet values file (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Year to show (defaults to the current one)
    #[arg(long)]
    pub year: Option<i32>,

    /// Month to show, 1-12 (defaults to the current one)
    #[arg(long)]
    pub month: Option<u32>,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct DayArgs {
    /// Sheet values file (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Day to show (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,

    /// Earliest hour shown, fractional (e.g. 8.5)
    #[arg(long, default_value_t = 0.0)]
    pub from: f64,

    /// Latest hour shown, fractional
    #[arg(long, default_value_t = 23.99)]
    pub to: f64,

    /// Search term field=value with field one of account, job, args (repeatable)
    #[arg(long = "filter")]
    pub filters: Vec<String>,

    /// Display position whose args are copied (repeatable)
    #[arg(long = "select")]
    pub select: Vec<usize>,

    /// Display timezone (defaults to the configured one)
    #[arg(long)]
    pub display_tz: Option<String>,

    /// Calendar name shown in the heading
    #[arg(long)]
    pub calendar: Option<String>,

    /// Calendar registry (TOML)
    #[arg(long)]
    pub config: Option<String>,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct ExpandArgs {
    /// Five-field cron expression
    #[arg(long)]
    pub cron: String,

    /// IANA timezone the expression is evaluated in
    #[arg(short, long)]
    pub tz: String,

    /// Start of range (inclusive, RFC3339 or YYYY-MM-DD)
    #[arg(long)]
    pub start: String,

    /// End of range (inclusive, RFC3339 or YYYY-MM-DD)
    #[arg(long)]
    pub end: String,

    /// Policy for nonexistent times: shift_forward, skip
    #[arg(long, default_value = "shift_forward")]
    pub policy_nonexistent: String,

    /// Policy for ambiguous times: first, second
    #[arg(long, default_value = "first")]
    pub policy_ambiguous: String,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct CalendarsArgs {
    /// Calendar registry (TOML)
    #[arg(long)]
    pub config: Option<String>,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,
}
