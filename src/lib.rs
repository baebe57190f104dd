pub mod acquisition;
pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod report;
pub mod system;

use clap::Parser;
use log::{error, info};
use std::path::Path;

pub use checker::{check_document, BatteryHealthChecker, HealthCheck};
pub use config::Config;
pub use error::{BatteryError, CommandError, ParseError};
pub use health::{calculate_health, HealthResult, HealthStatus};
pub use report::{parse_batteries, parse_report, BatteryReport};

// ═══════════════════════════════════════════════════════════════════════════════
// Front-end commands
// ═══════════════════════════════════════════════════════════════════════════════

/// Check battery `battery_index`, reading `report` when given and otherwise
/// generating a fresh one. Failures are logged before being returned.
pub fn cmd_check_battery_health(
    config: Config,
    report: Option<&Path>,
    battery_index: usize,
) -> Result<HealthCheck, BatteryError> {
    let checker = BatteryHealthChecker::new(config);
    let result = match report {
        Some(path) => checker.check_report_file(path, battery_index),
        None => checker.check(battery_index),
    };
    result.map_err(|e| {
        error!("Battery check failed: {}", e);
        e
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Entry
// ═══════════════════════════════════════════════════════════════════════════════

/// Run the CLI and return the process exit code.
pub fn run() -> i32 {
    let cli = cli::Cli::parse();

    let log_dir = cli.log_dir.clone().or_else(logging::default_log_dir);
    if let Some(path) = logging::init(log_dir.as_deref(), cli.verbose) {
        info!("Logging to {}", path.display());
    }

    let mut config = config::load(cli.config.as_deref());
    cli.apply(&mut config);

    match cmd_check_battery_health(config, cli.report.as_deref(), cli.battery_index()) {
        Ok(check) => {
            if cli.json {
                match serde_json::to_string_pretty(&check) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        error!("Failed to serialize result: {}", e);
                        return 1;
                    }
                }
            } else {
                println!("{}", cli::render_text(&check));
            }
            0
        }
        Err(e) => {
            if cli.json {
                let body = serde_json::json!({
                    "error": e.user_message(),
                    "detail": e.to_string(),
                    "code": e.exit_code(),
                });
                println!("{body}");
            } else {
                eprintln!("Error: {}", e.user_message());
            }
            e.exit_code()
        }
    }
}
