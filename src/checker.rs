//! Battery health check — acquisition, parsing and scoring in one call

use chrono::{DateTime, Local};
use log::{info, warn};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::acquisition;
use crate::config::Config;
use crate::error::BatteryError;
use crate::health::{calculate_health, HealthResult};
use crate::report::{parse_document, BatteryReport, ReportMetadata};
use crate::system::{get_host_info, HostInfo};

/// Everything the front end needs to render one check.
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    pub battery: BatteryReport,
    pub health: HealthResult,
    pub status_label: &'static str,
    /// Indicator colour for the status, `#rrggbb`.
    pub color: &'static str,
    pub advice: &'static str,
    pub battery_index: usize,
    pub battery_count: usize,
    pub metadata: ReportMetadata,
    pub host: HostInfo,
    pub checked_at: DateTime<Local>,
}

pub struct BatteryHealthChecker {
    config: Config,
}

impl BatteryHealthChecker {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Generate a fresh report and score the battery at `battery_index`.
    pub fn check(&self, battery_index: usize) -> Result<HealthCheck, BatteryError> {
        let path = acquisition::generate_report(&self.config)?;
        let result = self.check_report_file(&path, battery_index);

        if !self.config.keep_report {
            if let Err(e) = fs::remove_file(&path) {
                warn!("Could not remove report {}: {}", path.display(), e);
            }
        }
        result
    }

    /// Score a report that already exists on disk.
    pub fn check_report_file(
        &self,
        path: &Path,
        battery_index: usize,
    ) -> Result<HealthCheck, BatteryError> {
        let content = fs::read(path)?;
        // reports are UTF-8; tolerate stray bytes from OEM-provided strings
        let doc = String::from_utf8_lossy(&content);
        check_document(&doc, battery_index)
    }
}

/// Score battery `battery_index` of an in-memory report document.
pub fn check_document(doc: &str, battery_index: usize) -> Result<HealthCheck, BatteryError> {
    let parsed = parse_document(doc)?;
    let battery_count = parsed.batteries.len();

    // only the selected column has to be readable
    let battery = parsed
        .batteries
        .into_iter()
        .nth(battery_index)
        .ok_or(BatteryError::BatteryIndex {
            index: battery_index,
            count: battery_count,
        })??;

    let health = calculate_health(&battery)?;
    info!(
        "Battery {}/{}: design {} mWh, full charge {} mWh, health {}% ({})",
        battery_index + 1,
        battery_count,
        battery.design_capacity_mwh,
        battery.full_charge_capacity_mwh,
        health.percentage,
        health.status
    );

    Ok(HealthCheck {
        battery,
        health,
        status_label: health.status.label(),
        color: health.status.color(),
        advice: health.status.advice(),
        battery_index,
        battery_count,
        metadata: parsed.metadata,
        host: get_host_info(),
        checked_at: Local::now(),
    })
}
