//! Battery Health — capacity ratio and status bucket

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BatteryError;
use crate::report::BatteryReport;

pub const EXCELLENT_THRESHOLD: u32 = 90;
pub const GOOD_THRESHOLD: u32 = 70;
pub const FAIR_THRESHOLD: u32 = 50;
pub const POOR_THRESHOLD: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl HealthStatus {
    /// Bucket a clamped percentage. Lower bounds are inclusive.
    pub fn from_percentage(pct: u32) -> Self {
        if pct >= EXCELLENT_THRESHOLD {
            Self::Excellent
        } else if pct >= GOOD_THRESHOLD {
            Self::Good
        } else if pct >= FAIR_THRESHOLD {
            Self::Fair
        } else if pct >= POOR_THRESHOLD {
            Self::Poor
        } else {
            Self::Critical
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::Critical => "Critical",
        }
    }

    /// Indicator colour for front ends.
    pub fn color(self) -> &'static str {
        match self {
            Self::Excellent => "#06c86f",
            Self::Good => "#3dbaff",
            Self::Fair => "#E6B455",
            Self::Poor => "#FF5252",
            Self::Critical => "#C42B1C",
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            Self::Excellent => "Battery is in excellent condition",
            Self::Good => "Battery is healthy with normal wear",
            Self::Fair => "Battery shows noticeable wear, expect shorter runtime",
            Self::Poor => "Battery is heavily worn, consider a replacement",
            Self::Critical => "Battery should be replaced",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResult {
    pub percentage: u32, // full_charge / design * 100, clamped to 0..=100
    pub status: HealthStatus,
}

impl HealthResult {
    pub fn wear_percentage(&self) -> u32 {
        100u32.saturating_sub(self.percentage)
    }
}

/// Health percentage of a battery, rounded half-up and clamped to 0..=100.
pub fn health_percentage(design_mwh: u64, full_charge_mwh: u64) -> Result<u32, BatteryError> {
    if design_mwh == 0 {
        return Err(BatteryError::Division);
    }
    // round(full * 100 / design) in integers so .5 boundaries are exact
    let design = design_mwh as u128;
    let rounded = (full_charge_mwh as u128 * 200 + design) / (2 * design);
    Ok(rounded.min(100) as u32)
}

/// Compute health for a parsed report
pub fn calculate_health(report: &BatteryReport) -> Result<HealthResult, BatteryError> {
    let percentage =
        health_percentage(report.design_capacity_mwh, report.full_charge_capacity_mwh)?;
    Ok(HealthResult {
        percentage,
        status: HealthStatus::from_percentage(percentage),
    })
}
