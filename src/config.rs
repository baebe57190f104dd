//! Checker configuration — TOML file with defaults for every field

use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_DIR: &str = "BatteryHealthChecker";
pub const CONFIG_ENV: &str = "BATTERY_HEALTH_CONFIG";
/// Replaced by the report path in `args`.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the OS utility writes its report.
    pub report_path: PathBuf,
    pub command: String,
    pub args: Vec<String>,
    pub timeout_secs: u64,
    /// How long to wait for the report file after the command exits.
    pub settle_timeout_ms: u64,
    pub require_elevation: bool,
    pub check_battery_presence: bool,
    /// Leave the generated report on disk after the check.
    pub keep_report: bool,
}

fn default_report_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("battery_report.html")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_path: default_report_path(),
            command: "powercfg".into(),
            args: vec![
                "/batteryreport".into(),
                "/output".into(),
                OUTPUT_PLACEHOLDER.into(),
            ],
            timeout_secs: 30,
            settle_timeout_ms: 2000,
            require_elevation: true,
            check_battery_presence: true,
            keep_report: true,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }

    /// Command arguments with the report path substituted in.
    pub fn command_args(&self) -> Vec<String> {
        let output = self.report_path.to_string_lossy();
        self.args
            .iter()
            .map(|a| a.replace(OUTPUT_PLACEHOLDER, &output))
            .collect()
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Load the checker config.
/// Search order:
///   1. explicit path (the `--config` flag)
///   2. BATTERY_HEALTH_CONFIG env var
///   3. <config dir>/BatteryHealthChecker/config.toml
///   4. Defaults
pub fn load(explicit: Option<&Path>) -> Config {
    let candidates = [
        explicit.map(Path::to_path_buf),
        std::env::var(CONFIG_ENV).ok().map(PathBuf::from),
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml")),
    ];

    for candidate in candidates.into_iter().flatten() {
        if !candidate.exists() {
            continue;
        }
        match fs::read_to_string(&candidate) {
            Ok(content) => match Config::from_toml(&content) {
                Ok(config) => {
                    info!("Loaded config from {}", candidate.display());
                    return config;
                }
                Err(e) => warn!("Failed to parse config {}: {}", candidate.display(), e),
            },
            Err(e) => warn!("Failed to read config {}: {}", candidate.display(), e),
        }
    }

    info!("No config file found, using defaults");
    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.command, "powercfg");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.settle_timeout(), Duration::from_millis(2000));
        assert!(config.require_elevation);
        assert!(config.keep_report);
        assert!(config.report_path.ends_with("battery_report.html"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("timeout_secs = 5\nkeep_report = false\n").unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert!(!config.keep_report);
        assert_eq!(config.command, "powercfg");
        assert_eq!(config.settle_timeout_ms, 2000);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml("timeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn test_command_args_substitute_output() {
        let config = Config {
            report_path: PathBuf::from("/tmp/report.html"),
            ..Config::default()
        };
        assert_eq!(
            config.command_args(),
            vec!["/batteryreport", "/output", "/tmp/report.html"]
        );
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "command = \"mock-powercfg\"\nrequire_elevation = false\n").unwrap();
        let config = load(Some(&path));
        assert_eq!(config.command, "mock-powercfg");
        assert!(!config.require_elevation);
    }
}
