use std::process::ExitCode;

use serde::Serialize;

use crate::cli::CalendarsArgs;
use crate::config::CalendarConfig;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat, print_json};

#[derive(Debug, Serialize)]
struct CalendarOutput {
    name: String,
    sheet_id: String,
    tab: String,
    explicit_tab: bool,
}

pub fn run_calendars(args: CalendarsArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let config = CalendarConfig::load(args.config.as_deref())
        .map_err(CliError::config)?;

    let calendars: Vec<CalendarOutput> = config
        .calendars
        .iter()
        .map(|(name, entry)| CalendarOutput {
            name: name.clone(),
            sheet_id: entry.sheet_id.clone(),
            tab: config.resolve_tab(name).unwrap_or_default(),
            explicit_tab: entry.tab.is_some(),
        })
        .collect();

    match output_format {
        OutputFormat::Json => print_json(&calendars)?,
        OutputFormat::Text => {
            println!("Display timezone: {}", config.default_timezone);
            for calendar in &calendars {
                println!("{}  {}  {}", calendar.name, calendar.sheet_id, calendar.tab);
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
