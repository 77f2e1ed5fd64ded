use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default config file, looked up in the working directory.
pub const CONFIG_FILE: &str = "analyzer.json";
/// Overrides [`CONFIG_FILE`] when set.
pub const CONFIG_ENV: &str = "STUDENT_ANALYZER_CONFIG";

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// Paths and tunables.  Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Spreadsheet (or CSV / JSON) holding the student records.
    pub data_file: PathBuf,
    /// Worksheet read from workbook files.
    pub sheet_name: String,
    /// Where "Generate Report" writes the PDF.
    pub report_file: PathBuf,
    /// How many students the top-performers chart shows.
    pub top_n: usize,
    pub histogram_bins: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("student_performance_analyzer.xlsx"),
            sheet_name: "Students".to_string(),
            report_file: PathBuf::from("student_report.pdf"),
            top_n: 5,
            histogram_bins: 10,
        }
    }
}

impl AppConfig {
    /// Read a config file.  A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the config file from the environment, then apply the optional
    /// data-file argument.  Errors fall back to defaults and are logged.
    pub fn from_env(data_file_arg: Option<PathBuf>) -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        let mut config = Self::load(&path).unwrap_or_else(|e| {
            log::error!("Invalid config, using defaults: {e:#}");
            Self::default()
        });
        if let Some(data_file) = data_file_arg {
            config.data_file = data_file;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.sheet_name, "Students");
        assert_eq!(config.report_file, PathBuf::from("student_report.pdf"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("analyzer.json");
        fs::write(&path, r#"{ "sheet_name": "Class 10", "top_n": 3 }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.sheet_name, "Class 10");
        assert_eq!(config.top_n, 3);
        assert_eq!(config.histogram_bins, 10);
        assert_eq!(
            config.data_file,
            PathBuf::from("student_performance_analyzer.xlsx")
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("analyzer.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }
}
