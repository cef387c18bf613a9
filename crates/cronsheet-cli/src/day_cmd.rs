use std::process::ExitCode;

use cronsheet_core::window::parse_day_key;
use cronsheet_core::{
    CalendarSession, DayFilter, DayView, OccurrenceRecord, SearchTerm, TimeWindow, day_key,
};
use serde::Serialize;
use tracing::debug;

use crate::cli::DayArgs;
use crate::config::CalendarConfig;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat, print_json};
use crate::shared::{read_sheet, resolve_display_tz};

#[derive(Debug, Serialize)]
struct DayOutput {
    date: String,
    display_tz: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    calendar: Option<String>,
    total: usize,
    shown: usize,
    summary: String,
    groups: Vec<GroupOutput>,
    selected: Vec<usize>,
    copied: String,
}

#[derive(Debug, Serialize)]
struct GroupOutput {
    time: String,
    occurrences: Vec<OccurrenceRecord>,
}

pub fn run_day(args: DayArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let date = parse_day_key(&args.date)?;
    let time_window = TimeWindow::new(args.from, args.to)?;
    let terms = args
        .filters
        .iter()
        .map(|raw| raw.parse::<SearchTerm>())
        .collect::<Result<Vec<_>, _>>()?;
    let filter = DayFilter { time_window, terms };

    let config = CalendarConfig::load(args.config.as_deref())
        .map_err(CliError::config)?;
    let display_tz = resolve_display_tz(
        args.display_tz.as_deref(),
        Some(config.default_timezone.as_str()),
    )?;

    let sheet = read_sheet(&args.input)?;
    let mut session = CalendarSession::new(display_tz, date);
    session.load(args.calendar.clone().unwrap_or_default(), &sheet);

    let view = session.open_day(date, &filter);
    for position in &args.select {
        if *position >= view.shown() {
            return Err(CliError::input(format!(
                "Invalid selection {}. The day shows {} jobs",
                position,
                view.shown()
            )));
        }
        session.toggle(*position, false);
    }
    debug!(date = %date, shown = view.shown(), total = view.total, "built day view");

    let copied = session.copy_text(&view);
    let selected: Vec<usize> = session.selected().iter().copied().collect();

    match output_format {
        OutputFormat::Json => {
            let output = DayOutput {
                date: day_key(date),
                display_tz: display_tz.name().to_string(),
                calendar: args.calendar.clone(),
                total: view.total,
                shown: view.shown(),
                summary: view.summary(&filter),
                groups: view
                    .groups
                    .iter()
                    .map(|group| GroupOutput {
                        time: group.time.clone(),
                        occurrences: group.occurrences.iter().map(OccurrenceRecord::from).collect(),
                    })
                    .collect(),
                selected,
                copied,
            };
            print_json(&output)?;
        }
        OutputFormat::Text => {
            print_day_text(&view, &filter, args.calendar.as_deref(), &selected, &copied);
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

fn print_day_text(
    view: &DayView,
    filter: &DayFilter,
    calendar: Option<&str>,
    selected: &[usize],
    copied: &str,
) {
    let mut heading = format!("Jobs for {}", view.date.format("%A, %B %-d, %Y"));
    if let Some(calendar) = calendar {
        heading.push_str(&format!(" - {}", calendar));
    }
    println!("{}", heading);
    println!("{}", view.summary(filter));

    let mut position = 0;
    for group in &view.groups {
        println!();
        println!("{} ({})", group.time, group.occurrences.len());
        for occurrence in &group.occurrences {
            let job = &occurrence.job;
            let marker = if selected.contains(&position) { '*' } else { ' ' };
            let mut line = format!(" {}[{}] {}", marker, position, job.name);
            if !job.account.is_empty() {
                line.push_str(&format!("  [{}]", job.account));
            }
            println!("{}", line);
            println!("      cron {} ({})", job.cron, job.timezone);
            if !job.args.is_empty() {
                println!("      args {}", job.args);
            }
            position += 1;
        }
    }

    if !copied.is_empty() {
        println!();
        println!("Selected args:");
        println!("{}", copied);
    }
}
