use std::fs;
use std::io::{self, Read};

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use cronsheet_core::tz::FALLBACK_TIMEZONE;
use cronsheet_core::{AmbiguousPolicy, NonexistentPolicy, SheetValues};
use tracing::debug;

use crate::error::{CliError, CliResult};

pub fn parse_nonexistent_policy(s: &str) -> CliResult<NonexistentPolicy> {
    match s.to_lowercase().as_str() {
        "shift_forward" => Ok(NonexistentPolicy::ShiftForward),
        "skip" => Ok(NonexistentPolicy::Skip),
        _ => Err(CliError::input(format!(
            "Invalid policy_nonexistent '{}'. Expected: shift_forward, skip",
            s
        ))),
    }
}

pub fn parse_ambiguous_policy(s: &str) -> CliResult<AmbiguousPolicy> {
    match s.to_lowercase().as_str() {
        "first" => Ok(AmbiguousPolicy::First),
        "second" => Ok(AmbiguousPolicy::Second),
        _ => Err(CliError::input(format!(
            "Invalid policy_ambiguous '{}'. Expected: first, second",
            s
        ))),
    }
}

pub fn parse_tz_or_input_error(name: &str) -> CliResult<Tz> {
    cronsheet_core::tz::parse_tz(name)
        .map_err(|e| CliError::input(format!("Invalid timezone '{}': {}", name, e)))
}

/// Display zone: explicit flag, then config, then the fallback zone.
pub fn resolve_display_tz(flag: Option<&str>, configured: Option<&str>) -> CliResult<Tz> {
    parse_tz_or_input_error(flag.or(configured).unwrap_or(FALLBACK_TIMEZONE))
}

/// Today's date as seen in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Read a Sheets `values` document from a file, or stdin for `-`.
pub fn read_sheet(input: &str) -> CliResult<SheetValues> {
    let content = if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CliError::runtime(format!("Failed to read stdin: {}", e)))?;
        buf
    } else {
        fs::read_to_string(input)
            .map_err(|e| CliError::runtime(format!("Failed to open file '{}': {}", input, e)))?
    };

    let sheet: SheetValues = serde_json::from_str(&content)
        .map_err(|e| CliError::input(format!("Invalid sheet values in '{}': {}", input, e)))?;
    debug!(input, rows = sheet.values.len(), "read sheet values");
    Ok(sheet)
}
