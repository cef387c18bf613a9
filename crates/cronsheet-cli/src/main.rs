use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod calendars_cmd;
mod cli;
mod config;
mod day_cmd;
mod error;
mod expand_cmd;
mod jobs_cmd;
mod month_cmd;
mod shared;

use calendars_cmd::run_calendars;
use cli::{Cli, Commands};
use day_cmd::run_day;
use error::{CliResult, OutputFormat, output_format_hint, parse_output_format, render_error};
use expand_cmd::run_expand;
use jobs_cmd::run_jobs;
use month_cmd::run_month;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!(command = ?cli.command, "parsed arguments");

    match cli.command {
        Commands::Jobs(args) => {
            let raw = args.output_format.clone();
            dispatch(&raw, |format| run_jobs(args, format))
        }
        Commands::Month(args) => {
            let raw = args.output_format.clone();
            dispatch(&raw, |format| run_month(args, format))
        }
        Commands::Day(args) => {
            let raw = args.output_format.clone();
            dispatch(&raw, |format| run_day(args, format))
        }
        Commands::Expand(args) => {
            let raw = args.output_format.clone();
            dispatch(&raw, |format| run_expand(args, format))
        }
        Commands::Calendars(args) => {
            let raw = args.output_format.clone();
            dispatch(&raw, |format| run_calendars(args, format))
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn dispatch(
    raw_format: &str,
    run: impl FnOnce(OutputFormat) -> CliResult<ExitCode>,
) -> ExitCode {
    let fallback = output_format_hint(raw_format);
    let output_format = match parse_output_format(raw_format) {
        Ok(format) => format,
        Err(err) => return render_error(&err, fallback),
    };

    match run(output_format) {
        Ok(code) => code,
        Err(err) => render_error(&err, output_format),
    }
}
