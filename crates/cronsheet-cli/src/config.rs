use anyhow::{Context, Result};
use cronsheet_core::tz::FALLBACK_TIMEZONE;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Tab read when neither the calendar nor a sibling names one.
pub const DEFAULT_TAB: &str = "Sheet1";

/// Calendar registry loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Zone day views are displayed in.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,

    /// Calendars by display name, in file order.
    #[serde(default)]
    pub calendars: IndexMap<String, CalendarEntry>,
}

/// Where one calendar's rows live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarEntry {
    pub sheet_id: String,
    #[serde(default)]
    pub tab: Option<String>,
}

fn default_timezone() -> String {
    FALLBACK_TIMEZONE.to_string()
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            default_timezone: default_timezone(),
            calendars: IndexMap::new(),
        }
    }
}

impl CalendarConfig {
    /// Load config from the given path, or the built-in empty registry.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let Some(path) = path else {
            debug!("No config given, using defaults");
            return Ok(Self::default());
        };

        let config_path = Path::new(path);
        debug!(?config_path, "Loading config");
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config: {}", config_path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("failed to parse config: {}", config_path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Tab to read for `calendar`.
    ///
    /// An explicit tab wins. Otherwise the first calendar on the same sheet
    /// with an explicit tab is borrowed, and failing that [`DEFAULT_TAB`].
    /// `None` when the calendar is not configured.
    pub fn resolve_tab(&self, calendar: &str) -> Option<String> {
        let entry = self.calendars.get(calendar)?;
        if let Some(tab) = &entry.tab {
            return Some(tab.clone());
        }

        let sibling = self
            .calendars
            .values()
            .filter(|other| other.sheet_id == entry.sheet_id)
            .find_map(|other| other.tab.clone());
        Some(sibling.unwrap_or_else(|| DEFAULT_TAB.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
default_timezone = "Europe/London"

[calendars."Feed Schedulers - US"]
sheet_id = "sheet-feed"
tab = "us"

[calendars."ETL Summary"]
sheet_id = "sheet-etl"

[calendars."Feed Schedulers - Other"]
sheet_id = "sheet-feed"
"#;

    #[test]
    fn test_default_config() {
        let config = CalendarConfig::default();
        assert_eq!(config.default_timezone, FALLBACK_TIMEZONE);
        assert!(config.calendars.is_empty());
    }

    #[test]
    fn test_load_without_path() {
        let config = CalendarConfig::load(None).unwrap();
        assert_eq!(config.default_timezone, FALLBACK_TIMEZONE);
    }

    #[test]
    fn test_calendars_keep_file_order() {
        let config = CalendarConfig::from_toml(SAMPLE).unwrap();
        let names: Vec<_> = config.calendars.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["Feed Schedulers - US", "ETL Summary", "Feed Schedulers - Other"]
        );
        assert_eq!(config.default_timezone, "Europe/London");
    }

    #[test]
    fn test_resolve_tab() {
        let config = CalendarConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.resolve_tab("Feed Schedulers - US").as_deref(), Some("us"));
        assert_eq!(config.resolve_tab("Feed Schedulers - Other").as_deref(), Some("us"));
        assert_eq!(config.resolve_tab("ETL Summary").as_deref(), Some(DEFAULT_TAB));
        assert_eq!(config.resolve_tab("Unknown"), None);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(CalendarConfig::load(Some("/nonexistent/cronsheet.toml")).is_err());
    }

    #[test]
    fn test_missing_sheet_id_is_an_error() {
        assert!(CalendarConfig::from_toml("[calendars.x]\ntab = \"a\"\n").is_err());
    }
}
