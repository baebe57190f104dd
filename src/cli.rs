//! Command-line front end — argument parsing and result rendering

use clap::Parser;
use std::path::PathBuf;

use crate::checker::HealthCheck;
use crate::config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "battery-health",
    version,
    about = "Check battery health from the Windows battery report"
)]
pub struct Cli {
    /// Analyse an existing battery report instead of generating one
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Battery to check when several are installed, starting at 1
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub battery: u32,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Config file (defaults to BATTERY_HEALTH_CONFIG, then the user config dir)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seconds to wait for the report command
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Where the report command should write the report
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Skip the administrator check before generating the report
    #[arg(long)]
    pub no_elevation_check: bool,

    /// Directory for daily log files
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Zero-based battery index.
    pub fn battery_index(&self) -> usize {
        self.battery.saturating_sub(1) as usize
    }

    /// Flags take precedence over the config file.
    pub fn apply(&self, config: &mut Config) {
        if let Some(secs) = self.timeout {
            config.timeout_secs = secs;
        }
        if let Some(path) = &self.output {
            config.report_path = path.clone();
        }
        if self.no_elevation_check {
            config.require_elevation = false;
        }
    }
}

/// `57020` → `57,020`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn health_bar(pct: u32) -> String {
    const WIDTH: usize = 20;
    let filled = (pct.min(100) as usize * WIDTH + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(WIDTH - filled))
}

pub fn render_text(check: &HealthCheck) -> String {
    let battery = &check.battery;
    let health = &check.health;
    let name = battery.details.name.as_deref().unwrap_or("Battery");

    let mut lines = vec![format!(
        "Battery: {} ({} of {})",
        name,
        check.battery_index + 1,
        check.battery_count
    )];
    if let Some(manufacturer) = &battery.details.manufacturer {
        lines.push(format!("Manufacturer: {manufacturer}"));
    }
    if let Some(chemistry) = &battery.details.chemistry {
        lines.push(format!("Chemistry: {chemistry}"));
    }
    lines.push(format!(
        "Design Capacity: {} mWh",
        group_thousands(battery.design_capacity_mwh)
    ));
    lines.push(format!(
        "Current Capacity: {} mWh",
        group_thousands(battery.full_charge_capacity_mwh)
    ));
    if let Some(cycles) = battery.details.cycle_count {
        lines.push(format!("Cycle Count: {cycles}"));
    }
    lines.push(format!(
        "Health: {}% {}  (wear {}%)",
        health.percentage,
        health_bar(health.percentage),
        health.wear_percentage()
    ));
    lines.push(format!("Status: Battery is in {} condition", health.status));
    lines.push(format!("        {}", health.status.advice()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::check_document;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(57_020), "57,020");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_health_bar() {
        assert_eq!(health_bar(0), "[--------------------]");
        assert_eq!(health_bar(100), "[####################]");
        assert_eq!(health_bar(90), "[##################--]");
    }

    #[test]
    fn test_render_text() {
        let doc = "<table>\
            <tr><td>NAME</td><td>DELL 0KG6K05</td></tr>\
            <tr><td>DESIGN CAPACITY</td><td>50,000 mWh</td></tr>\
            <tr><td>FULL CHARGE CAPACITY</td><td>45,000 mWh</td></tr>\
            <tr><td>CYCLE COUNT</td><td>112</td></tr>\
            </table>";
        let text = render_text(&check_document(doc, 0).unwrap());
        assert!(text.starts_with("Battery: DELL 0KG6K05 (1 of 1)"));
        assert!(text.contains("Design Capacity: 50,000 mWh"));
        assert!(text.contains("Current Capacity: 45,000 mWh"));
        assert!(text.contains("Cycle Count: 112"));
        assert!(text.contains("Health: 90%"));
        assert!(text.contains("Status: Battery is in Excellent condition"));
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "battery-health",
            "--timeout",
            "5",
            "--output",
            "/tmp/r.html",
            "--no-elevation-check",
            "--battery",
            "2",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.report_path, PathBuf::from("/tmp/r.html"));
        assert!(!config.require_elevation);
        assert_eq!(cli.battery_index(), 1);
    }

    #[test]
    fn test_battery_zero_rejected() {
        assert!(Cli::try_parse_from(["battery-health", "--battery", "0"]).is_err());
    }
}
