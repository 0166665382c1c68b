//! Runtime configuration.
//!
//! Constants for the `az` fetch loop, plus [`Settings`] read from the
//! environment (a `.env` file is loaded by `main` first).

use crate::diagram::DEFAULT_COLUMNS;
use std::str::FromStr;

/// Base pause between `az graph query` calls.
pub const SLEEP_MSEC: u64 = 100;
/// Rows per `az graph query` page, the Resource Graph maximum.
pub const GRAPH_PAGE_SIZE: u32 = 1000;

pub const ENV_CACHE_FILE: &str = "TOPOLOGY_CACHE_FILE";
pub const ENV_COLUMNS: &str = "DIAGRAM_COLUMNS";
pub const ENV_OUTPUT_FORMAT: &str = "OUTPUT_FORMAT";

/// What `main` prints to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Summary,
    Csv,
    Json,
    Svg,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(OutputFormat::Summary),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "svg" => Ok(OutputFormat::Svg),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Snapshot file; `None` uses the dated default name.
    pub cache_file: Option<String>,
    pub columns: usize,
    pub output_format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            cache_file: None,
            columns: DEFAULT_COLUMNS,
            output_format: OutputFormat::default(),
        }
    }
}

impl Settings {
    /// Read settings from environment variables, falling back to defaults.
    pub fn from_env() -> Settings {
        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        settings.cache_file = lookup(ENV_CACHE_FILE).filter(|f| !f.trim().is_empty());

        if let Some(columns) = lookup(ENV_COLUMNS) {
            match columns.trim().parse::<usize>() {
                Ok(n) if n > 0 => settings.columns = n,
                _ => log::warn!(
                    "Ignoring {ENV_COLUMNS}='{columns}', using {}",
                    settings.columns
                ),
            }
        }

        if let Some(format) = lookup(ENV_OUTPUT_FORMAT) {
            match format.parse::<OutputFormat>() {
                Ok(f) => settings.output_format = f,
                Err(e) => log::warn!("Ignoring {ENV_OUTPUT_FORMAT}: {e}"),
            }
        }

        log::debug!("settings: {settings:?}");
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[]));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.columns, 2);
        assert_eq!(settings.output_format, OutputFormat::Summary);
    }

    #[test]
    fn test_settings_from_values() {
        let settings = Settings::from_lookup(lookup_from(&[
            (ENV_CACHE_FILE, "snap.json"),
            (ENV_COLUMNS, "3"),
            (ENV_OUTPUT_FORMAT, "SVG"),
        ]));
        assert_eq!(settings.cache_file.as_deref(), Some("snap.json"));
        assert_eq!(settings.columns, 3);
        assert_eq!(settings.output_format, OutputFormat::Svg);
    }

    #[test]
    fn test_settings_invalid_values_fall_back() {
        let settings = Settings::from_lookup(lookup_from(&[
            (ENV_CACHE_FILE, "  "),
            (ENV_COLUMNS, "0"),
            (ENV_OUTPUT_FORMAT, "pdf"),
        ]));
        assert_eq!(settings, Settings::default());
    }
}
