//! Error types for cronsheet-core.
//!
//! The expansion pipeline itself degrades to empty results on malformed
//! rows and cron expressions. These errors are only produced by the typed
//! entry points: timezone lookup, window parsing and day-key parsing.

use thiserror::Error;

/// The main error type for cronsheet operations.
#[derive(Debug, Error)]
pub enum CronsheetError {
    /// Invalid timezone name provided.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Error parsing a timestamp or other textual input.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A calendar date that does not exist (e.g. month 13).
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Result type alias for cronsheet operations.
pub type Result<T> = std::result::Result<T, CronsheetError>;
