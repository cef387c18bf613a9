//! Row normalization.
//!
//! Feed, delivery and ETL sheets all describe scheduled jobs with different
//! column sets. Rather than branching per schema, every logical field of a
//! [`CanonicalJob`] is resolved through an ordered list of candidate column
//! names, then candidate keys of the parsed args payload, then a fixed
//! fallback. Whichever sheet shape is loaded goes through the same pipeline.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::loose::{JsonObject, parse_args, parse_rubyish};
use crate::models::{CanonicalJob, SheetValues};
use crate::tz::normalize_tz;

/// Name used when nothing better can be derived.
pub const UNNAMED: &str = "(unnamed)";

/// Class assigned to rows that only carry ETL-style columns.
pub const ETL_CLASS: &str = "etl";

/// Ordered lookup candidates for one logical field.
#[derive(Debug, Clone, Copy)]
pub struct Candidates {
    /// Header names, matched case-insensitively.
    pub columns: &'static [&'static str],
    /// Keys of the parsed args payload, tried after the columns.
    pub arg_keys: &'static [&'static str],
}

pub const CRON: Candidates = Candidates {
    columns: &["cron", "schedule"],
    arg_keys: &[],
};
pub const TIMEZONE: Candidates = Candidates {
    columns: &["timezone", "tz"],
    arg_keys: &[],
};
pub const SCHEDULED: Candidates = Candidates {
    columns: &["scheduled"],
    arg_keys: &[],
};
pub const ARGS: Candidates = Candidates {
    columns: &["args", "parameters"],
    arg_keys: &[],
};
pub const CLASS: Candidates = Candidates {
    columns: &["class", "job class", "type"],
    arg_keys: &["klass", "class", "processor"],
};
pub const ACCOUNT: Candidates = Candidates {
    columns: &["account", "account name", "client", "client_key"],
    arg_keys: &["client_key", "account"],
};
pub const NAME: Candidates = Candidates {
    columns: &["job name", "name", "file name"],
    arg_keys: &["processor", "klass", "class"],
};
pub const DESCRIPTION: Candidates = Candidates {
    columns: &["job description", "description"],
    arg_keys: &[],
};

/// Columns whose presence marks a row as coming from an ETL sheet.
const ETL_HINT_COLUMNS: &[&str] = &["file name", "scheduled", "schedule"];

/// Fields folded into a synthesized args payload, in output order.
const SYNTHESIZED_FIELDS: &[(&str, Candidates)] = &[
    (
        "channel",
        Candidates {
            columns: &["channel"],
            arg_keys: &["channel"],
        },
    ),
    (
        "send_to_pricing",
        Candidates {
            columns: &["send to pricing"],
            arg_keys: &[],
        },
    ),
    (
        "competitors",
        Candidates {
            columns: &["competitors"],
            arg_keys: &[],
        },
    ),
    (
        "file_name",
        Candidates {
            columns: &["file name", "filename"],
            arg_keys: &[],
        },
    ),
    (
        "link",
        Candidates {
            columns: &["link", "url"],
            arg_keys: &[],
        },
    ),
];

/// One data row keyed by its header names.
#[derive(Debug, Clone, Default)]
pub struct SheetRecord {
    cells: HashMap<String, String>,
}

impl SheetRecord {
    /// Zip a data row against the header row.
    ///
    /// Cells are trimmed and missing trailing cells read as empty. When two
    /// headers collide case-insensitively the later column wins.
    pub fn from_row(header: &[String], row: &[String]) -> Self {
        let cells = header
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let value = row.get(i).map(|cell| cell.trim()).unwrap_or_default();
                (header_key(name), value.to_string())
            })
            .collect();
        Self { cells }
    }

    /// First non-empty cell among `candidates`, or `""`.
    pub fn get_field(&self, candidates: &[&str]) -> &str {
        candidates
            .iter()
            .filter_map(|name| self.cells.get(&header_key(name)))
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .unwrap_or_default()
    }

    /// Resolve a logical field from the columns, then from `args`.
    fn resolve(&self, candidates: Candidates, args: &JsonObject) -> Option<String> {
        let column = self.get_field(candidates.columns);
        if !column.is_empty() {
            return Some(column.to_string());
        }
        arg_text(args, candidates.arg_keys)
    }
}

fn header_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// First truthy value among `keys`, rendered as text.
fn arg_text(args: &JsonObject, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| args.get(*key))
        .find_map(value_text)
}

/// Text of a payload value; null, false, zero and `""` count as absent.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Normalize every data row of a sheet, in row order.
///
/// Rows without a resolvable cron expression are dropped; nothing is
/// sorted or deduplicated.
pub fn normalize(header: &[String], rows: &[Vec<String>]) -> Vec<CanonicalJob> {
    let jobs: Vec<CanonicalJob> = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let job = normalize_row(&SheetRecord::from_row(header, row));
            if job.is_none() {
                debug!(row = index + 1, "dropping row without a cron expression");
            }
            job
        })
        .collect();

    debug!(rows = rows.len(), jobs = jobs.len(), "normalized sheet rows");
    jobs
}

/// Normalize a whole [`SheetValues`] document.
pub fn normalize_values(sheet: &SheetValues) -> Vec<CanonicalJob> {
    let (header, rows) = sheet.split();
    normalize(header, rows)
}

/// Build the canonical job for one record, or `None` when it has no cron.
pub fn normalize_row(record: &SheetRecord) -> Option<CanonicalJob> {
    let (cron, timezone) = resolve_schedule(record);
    if cron.is_empty() {
        return None;
    }

    let raw_args = record.get_field(ARGS.columns);
    let args = parse_args(raw_args);

    let job_class = record.resolve(CLASS, &args).unwrap_or_else(|| {
        let has_etl_hints = !record.get_field(ETL_HINT_COLUMNS).is_empty();
        if has_etl_hints {
            ETL_CLASS.to_string()
        } else {
            String::new()
        }
    });

    let account = record.resolve(ACCOUNT, &args).unwrap_or_default();

    let name = record
        .resolve(NAME, &args)
        .or_else(|| (!account.is_empty()).then(|| account.clone()))
        .unwrap_or_else(|| UNNAMED.to_string());

    let args = if raw_args.is_empty() {
        synthesize_args(record, args, &account)
    } else {
        raw_args.to_string()
    };

    Some(CanonicalJob {
        cron,
        timezone: normalize_tz(&timezone),
        job_class,
        args,
        account,
        name,
        description: record.get_field(DESCRIPTION.columns).to_string(),
    })
}

/// Cron and timezone from dedicated columns, topped up from `Scheduled`.
fn resolve_schedule(record: &SheetRecord) -> (String, String) {
    let mut cron = record.get_field(CRON.columns).to_string();
    let mut timezone = record.get_field(TIMEZONE.columns).to_string();

    if cron.is_empty() || timezone.is_empty() {
        let scheduled = parse_rubyish(record.get_field(SCHEDULED.columns));
        if cron.is_empty() {
            cron = arg_text(&scheduled, &["cron"]).unwrap_or_default();
        }
        if timezone.is_empty() {
            timezone = arg_text(&scheduled, &["timezone"]).unwrap_or_default();
        }
    }

    (cron.trim().to_string(), timezone.trim().to_string())
}

/// Serialize a helpful payload for rows that carry no args column.
///
/// Values already present in `base` win over the row's columns. An empty
/// result stays an empty string rather than `{}`.
fn synthesize_args(record: &SheetRecord, base: JsonObject, account: &str) -> String {
    let mut additions = vec![("client_key", account.to_string())];
    for (key, candidates) in SYNTHESIZED_FIELDS {
        additions.push((*key, record.resolve(*candidates, &base).unwrap_or_default()));
    }

    let mut payload = base;
    for (key, value) in additions {
        let present = payload.get(key).and_then(value_text).is_some();
        if !value.is_empty() && !present {
            payload.insert(key.to_string(), Value::String(value));
        }
    }

    if payload.is_empty() {
        String::new()
    } else {
        Value::Object(payload).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tz::FALLBACK_TIMEZONE;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn single(header: &[&str], row: &[&str]) -> Vec<CanonicalJob> {
        normalize(&strings(header), &[strings(row)])
    }

    #[test]
    fn minimal_cron_row() {
        let jobs = single(&["cron", "timezone"], &["0 9 * * 1-5", "UTC"]);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].cron, "0 9 * * 1-5");
        assert_eq!(jobs[0].timezone, "UTC");
        assert_eq!(jobs[0].name, UNNAMED);
        assert_eq!(jobs[0].job_class, "");
        assert_eq!(jobs[0].args, "");
    }

    #[test]
    fn rows_without_cron_are_dropped() {
        let jobs = normalize(&strings(&["foo"]), &[strings(&["bar"])]);
        assert!(jobs.is_empty());
    }

    #[test]
    fn header_lookup_ignores_case_and_padding() {
        let record = SheetRecord::from_row(
            &strings(&[" Job Name ", "CRON"]),
            &strings(&["  export  ", "0 1 * * *"]),
        );
        assert_eq!(record.get_field(&["job name"]), "export");
        assert_eq!(record.get_field(&["Cron"]), "0 1 * * *");
        assert_eq!(record.get_field(&["missing"]), "");
    }

    #[test]
    fn lookup_skips_empty_candidates() {
        let record = SheetRecord::from_row(&strings(&["cron", "schedule"]), &strings(&["", "5 * * * *"]));
        assert_eq!(record.get_field(CRON.columns), "5 * * * *");
    }

    #[test]
    fn missing_trailing_cells_read_empty() {
        let jobs = single(&["cron", "timezone", "account"], &["0 0 * * *"]);
        assert_eq!(jobs[0].timezone, FALLBACK_TIMEZONE);
        assert_eq!(jobs[0].account, "");
    }

    #[test]
    fn timezone_aliases_normalize() {
        let jobs = single(&["cron", "tz"], &["0 0 * * *", "Israel"]);
        assert_eq!(jobs[0].timezone, FALLBACK_TIMEZONE);
    }

    #[test]
    fn delivery_row_reads_args_payload() {
        let jobs = single(
            &["cron", "timezone", "args"],
            &[
                "15 3 * * *",
                "America/New_York",
                r#"{"klass"=>"DeliveryJob", "client_key"=>"globex", "channel"=>"sftp"}"#,
            ],
        );
        let job = &jobs[0];
        assert_eq!(job.job_class, "DeliveryJob");
        assert_eq!(job.account, "globex");
        assert_eq!(job.name, "DeliveryJob");
        // raw text is kept verbatim
        assert!(job.args.contains("=>"));
    }

    #[test]
    fn feed_row_prefers_processor_for_name() {
        let jobs = single(
            &["cron", "parameters"],
            &["0 * * * *", r#"{"processor":"FeedProcessor","klass":"Spark"}"#],
        );
        assert_eq!(jobs[0].name, "FeedProcessor");
        assert_eq!(jobs[0].job_class, "Spark");
    }

    #[test]
    fn explicit_columns_win_over_args() {
        let jobs = single(
            &["cron", "type", "client", "name", "args"],
            &["0 * * * *", "feed", "acme", "Hourly feed", r#"{"klass":"X","client_key":"other"}"#],
        );
        assert_eq!(jobs[0].job_class, "feed");
        assert_eq!(jobs[0].account, "acme");
        assert_eq!(jobs[0].name, "Hourly feed");
    }

    #[test]
    fn name_falls_back_to_account() {
        let jobs = single(&["cron", "account"], &["0 * * * *", "initech"]);
        assert_eq!(jobs[0].name, "initech");
    }

    #[test]
    fn etl_row_with_scheduled_hash() {
        let jobs = single(
            &["File Name", "Scheduled", "Channel", "Send To Pricing", "Link"],
            &[
                "prices.csv",
                "{'cron' => '0 6 * * *', 'timezone' => 'Jerusalem'}",
                "ftp",
                "yes",
                "https://example.com/prices",
            ],
        );
        let job = &jobs[0];
        assert_eq!(job.cron, "0 6 * * *");
        assert_eq!(job.timezone, FALLBACK_TIMEZONE);
        assert_eq!(job.job_class, ETL_CLASS);
        assert_eq!(job.name, "prices.csv");
        assert_eq!(
            job.args,
            r#"{"channel":"ftp","send_to_pricing":"yes","file_name":"prices.csv","link":"https://example.com/prices"}"#
        );
    }

    #[test]
    fn scheduled_only_fills_missing_parts() {
        let jobs = single(
            &["cron", "Scheduled"],
            &["0 7 * * *", "{'cron' => '0 6 * * *', 'timezone' => 'Europe/London'}"],
        );
        assert_eq!(jobs[0].cron, "0 7 * * *");
        assert_eq!(jobs[0].timezone, "Europe/London");
    }

    #[test]
    fn unparseable_scheduled_drops_row() {
        let jobs = single(&["Scheduled"], &["every day at six"]);
        assert!(jobs.is_empty());
    }

    #[test]
    fn synthesized_args_start_with_account() {
        let jobs = single(
            &["cron", "account", "Competitors"],
            &["0 * * * *", "acme", "a,b"],
        );
        assert_eq!(jobs[0].args, r#"{"client_key":"acme","competitors":"a,b"}"#);
    }

    #[test]
    fn unparseable_args_keep_raw_text() {
        let jobs = single(&["cron", "args"], &["0 * * * *", "run --full"]);
        assert_eq!(jobs[0].args, "run --full");
        assert_eq!(jobs[0].name, UNNAMED);
    }

    #[test]
    fn falsy_payload_values_are_skipped() {
        let jobs = single(
            &["cron", "args"],
            &["0 * * * *", r#"{"klass":"","class":null,"processor":"P","client_key":0}"#],
        );
        assert_eq!(jobs[0].job_class, "P");
        assert_eq!(jobs[0].account, "");
    }

    #[test]
    fn output_keeps_row_order() {
        let header = strings(&["cron", "name"]);
        let rows = vec![
            strings(&["0 1 * * *", "b"]),
            strings(&["", "skipped"]),
            strings(&["0 2 * * *", "a"]),
            strings(&["0 1 * * *", "b"]),
        ];
        let names: Vec<_> = normalize(&header, &rows).into_iter().map(|j| j.name).collect();
        assert_eq!(names, vec!["b", "a", "b"]);
    }

    #[test]
    fn normalize_empty_sheet() {
        assert!(normalize_values(&SheetValues::default()).is_empty());
    }
}
