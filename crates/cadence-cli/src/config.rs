use cadence_core::models::GenerationBounds;
use chrono::{NaiveDate, NaiveTime};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::fmt::Write as _;
use std::path::Path;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";
const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_TIME_FORMAT: &str = "%H:%M";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Upper bound on occurrences returned by a preview
    pub max_occurrences: usize,
    /// How many days past the start a preview may look
    pub horizon_days: u32,
    /// strftime pattern for dates in preview tables
    pub date_format: String,
    /// strftime pattern for times in preview tables
    pub time_format: String,
}

impl Default for Config {
    fn default() -> Self {
        let bounds = GenerationBounds::default();
        Self {
            max_occurrences: bounds.max_occurrences,
            horizon_days: bounds.horizon_days,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl Config {
    /// Loads `cadence.toml` (or `path`), then `CADENCE_*` environment variables.
    ///
    /// Patterns that cannot render a date (or time) are replaced by the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let config: Self = Figment::new()
            .merge(Toml::file(file))
            .merge(Env::prefixed("CADENCE_"))
            .extract()?;
        Ok(config.with_valid_formats())
    }

    fn with_valid_formats(mut self) -> Self {
        if !renders_date(&self.date_format) {
            warn!(pattern = %self.date_format, "invalid date_format, using {}", DEFAULT_DATE_FORMAT);
            self.date_format = DEFAULT_DATE_FORMAT.to_string();
        }
        if !renders_time(&self.time_format) {
            warn!(pattern = %self.time_format, "invalid time_format, using {}", DEFAULT_TIME_FORMAT);
            self.time_format = DEFAULT_TIME_FORMAT.to_string();
        }
        self
    }

    pub fn bounds(&self) -> GenerationBounds {
        GenerationBounds::new(self.max_occurrences, self.horizon_days)
    }
}

// Unknown specifiers, and fields the value lacks (`%H` on a date), only
// fail once chrono's formatter is displayed.
fn renders_date(pattern: &str) -> bool {
    write!(String::new(), "{}", NaiveDate::MIN.format(pattern)).is_ok()
}

fn renders_time(pattern: &str) -> bool {
    write!(String::new(), "{}", NaiveTime::MIN.format(pattern)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_core_bounds() {
        let config = Config::default();
        assert_eq!(config.bounds(), GenerationBounds::default());
        assert_eq!(config.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_occurrences = 12").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.max_occurrences, 12);
        assert_eq!(config.horizon_days, GenerationBounds::default().horizon_days);
        assert_eq!(config.time_format, "%H:%M");
    }

    #[test]
    fn test_invalid_formats_fall_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "date_format = \"%Y-%Q\"").unwrap();
        writeln!(file, "time_format = \"%Y\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert_eq!(config.time_format, "%H:%M");
    }

    #[test]
    fn test_custom_valid_format_is_kept() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "date_format = \"%d/%m/%Y\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.date_format, "%d/%m/%Y");
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "horizon_days = \"forever\"").unwrap();

        assert!(Config::load(Some(file.path())).is_err());
    }
}
