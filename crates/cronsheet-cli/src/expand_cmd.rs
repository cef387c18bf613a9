use std::process::ExitCode;

use cronsheet_core::tz::{format_rfc3339, format_rfc3339_utc};
use cronsheet_core::{CronSchedule, Policy, Window};
use serde::Serialize;
use tracing::debug;

use crate::cli::ExpandArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat, print_json};
use crate::shared::{parse_ambiguous_policy, parse_nonexistent_policy, parse_tz_or_input_error};

#[derive(Debug, Serialize)]
struct ExpandOutput {
    local: String,
    utc: String,
    epoch_ms: i64,
}

pub fn run_expand(args: ExpandArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let tz = parse_tz_or_input_error(&args.tz)?;
    let policy = Policy {
        nonexistent: parse_nonexistent_policy(&args.policy_nonexistent)?,
        ambiguous: parse_ambiguous_policy(&args.policy_ambiguous)?,
    };

    // A bad expression is a usage error here, unlike inside a sheet.
    let schedule = CronSchedule::parse(&args.cron).ok_or_else(|| {
        CliError::input(format!(
            "Invalid cron expression '{}'. Expected five fields",
            args.cron
        ))
    })?;

    let window = Window::parse(&args.start, &args.end, tz)?;
    if window.is_empty() {
        return Err(CliError::input(format!(
            "Invalid range: start '{}' must not be later than end '{}'",
            args.start, args.end
        )));
    }

    let instants = schedule.occurrences(tz, &window, policy);
    debug!(count = instants.len(), "expanded cron expression");

    match output_format {
        OutputFormat::Json => {
            let output: Vec<ExpandOutput> = instants
                .iter()
                .map(|instant| ExpandOutput {
                    local: format_rfc3339(instant),
                    utc: format_rfc3339_utc(instant),
                    epoch_ms: instant.timestamp_millis(),
                })
                .collect();
            print_json(&output)?;
        }
        OutputFormat::Text => {
            for instant in &instants {
                println!("{}  {}", format_rfc3339(instant), format_rfc3339_utc(instant));
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
