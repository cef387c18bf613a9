use std::collections::BTreeMap;
use std::process::ExitCode;

use cronsheet_core::tz::FALLBACK_TIMEZONE;
use cronsheet_core::{CalendarSession, OccurrenceRecord, day_key};
use tracing::debug;

use crate::cli::MonthArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat, print_json};
use crate::shared::{parse_tz_or_input_error, read_sheet, today_in};

pub fn run_month(args: MonthArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    if let Some(month) = args.month
        && !(1..=12).contains(&month)
    {
        return Err(CliError::input(format!(
            "Invalid month '{}'. Expected 1-12",
            month
        )));
    }

    let sheet = read_sheet(&args.input)?;
    let tz = parse_tz_or_input_error(FALLBACK_TIMEZONE)?;
    let mut session = CalendarSession::new(tz, today_in(tz));
    session.load(args.input.as_str(), &sheet);
    if let Some(year) = args.year {
        session.year = year;
    }
    if let Some(month) = args.month {
        session.month = month;
    }
    debug!(year = session.year, month = session.month, "building month view");

    let buckets = session.month_view();

    match output_format {
        OutputFormat::Json => {
            let days: BTreeMap<String, Vec<OccurrenceRecord>> = buckets
                .iter()
                .map(|(day, occurrences)| {
                    (
                        day_key(*day),
                        occurrences.iter().map(OccurrenceRecord::from).collect(),
                    )
                })
                .collect();
            print_json(&days)?;
        }
        OutputFormat::Text => {
            for (day, occurrences) in &buckets {
                println!("{} ({})", day_key(*day), occurrences.len());
                for occurrence in occurrences {
                    let mut line = format!(
                        "  {}  {}",
                        occurrence.scheduled_time.format("%H:%M %:z"),
                        occurrence.job.name
                    );
                    if !occurrence.job.account.is_empty() {
                        line.push_str(&format!("  [{}]", occurrence.job.account));
                    }
                    println!("{}", line);
                }
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
