use std::process::ExitCode;

use cronsheet_core::normalize_values;
use tracing::debug;

use crate::cli::JobsArgs;
use crate::error::{CliResult, EXIT_SUCCESS, OutputFormat, print_json};
use crate::shared::read_sheet;

pub fn run_jobs(args: JobsArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let sheet = read_sheet(&args.input)?;
    let jobs = normalize_values(&sheet);
    debug!(jobs = jobs.len(), "normalized rows");

    match output_format {
        OutputFormat::Json => print_json(&jobs)?,
        OutputFormat::Text => {
            for job in &jobs {
                let mut line = format!("{}  {}  {}", job.cron, job.timezone, job.name);
                if !job.account.is_empty() {
                    line.push_str(&format!("  [{}]", job.account));
                }
                if !job.job_class.is_empty() {
                    line.push_str(&format!("  ({})", job.job_class));
                }
                println!("{}", line);
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}
