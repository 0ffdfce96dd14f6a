//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.staffboard.toml` files.

use crate::source::SourceLocations;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".staffboard.toml";

/// Longest attendance chart, in days.
pub const MAX_CHART_DAYS: usize = 366;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Fixture locations.
    #[serde(default)]
    pub source: SourceConfig,

    /// Dashboard calculations.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Report output path. Prints to stdout when unset.
    #[serde(default)]
    pub output: Option<String>,
}

/// Where the three fixtures are loaded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory holding the standard fixture file names.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Explicit location overrides (URL or path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payroll: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance: Option<String>,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            employees: None,
            payroll: None,
            attendance: None,
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl SourceConfig {
    /// Resolve the three locations; explicit ones win over `data_dir`.
    pub fn locations(&self) -> SourceLocations {
        let defaults = SourceLocations::from_data_dir(Path::new(&self.data_dir));

        SourceLocations {
            employees: self.employees.clone().unwrap_or(defaults.employees),
            payroll: self.payroll.clone().unwrap_or(defaults.payroll),
            attendance: self.attendance.clone().unwrap_or(defaults.attendance),
        }
    }
}

/// Settings for derived dashboard figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Currency prefix for amounts.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Label printed on payslips.
    #[serde(default = "default_pay_period")]
    pub pay_period: String,

    /// Leave days per employee when the fixture has none.
    #[serde(default = "default_leave_entitlement")]
    pub default_leave_entitlement: f64,

    /// Number of days in the attendance chart.
    #[serde(default = "default_chart_days")]
    pub chart_days: usize,

    /// Last chart date. Defaults to the latest date in the data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_end: Option<NaiveDate>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            pay_period: default_pay_period(),
            default_leave_entitlement: default_leave_entitlement(),
            chart_days: default_chart_days(),
            chart_end: None,
        }
    }
}

fn default_currency() -> String {
    "R".to_string()
}

fn default_pay_period() -> String {
    "July 2025".to_string()
}

fn default_leave_entitlement() -> f64 {
    20.0
}

fn default_chart_days() -> usize {
    5
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the attendance chart.
    #[serde(default = "default_true")]
    pub include_chart: bool,

    /// Include the daily attendance table and search history.
    #[serde(default = "default_true")]
    pub include_attendance: bool,

    /// Include the employee table.
    #[serde(default = "default_true")]
    pub include_employees: bool,

    /// Include the leave request table.
    #[serde(default = "default_true")]
    pub include_leave_requests: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_chart: true,
            include_attendance: true,
            include_employees: true,
            include_leave_requests: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values the user actually passed override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref dir) = args.data_dir {
            self.source.data_dir = dir.display().to_string();
        }
        if let Some(ref location) = args.employees {
            self.source.employees = Some(location.clone());
        }
        if let Some(ref location) = args.payroll {
            self.source.payroll = Some(location.clone());
        }
        if let Some(ref location) = args.attendance {
            self.source.attendance = Some(location.clone());
        }
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
        }

        if let Some(ref currency) = args.currency {
            self.dashboard.currency = currency.clone();
        }
        if let Some(ref period) = args.period {
            self.dashboard.pay_period = period.clone();
        }
        if let Some(days) = args.chart_days {
            self.dashboard.chart_days = days;
        }
        if args.chart_end.is_some() {
            self.dashboard.chart_end = args.chart_end;
        }

        if let Some(ref output) = args.output {
            self.general.output = Some(output.display().to_string());
        }

        if self.dashboard.chart_days > MAX_CHART_DAYS {
            warn!(
                "chart_days {} exceeds {}, clamping",
                self.dashboard.chart_days, MAX_CHART_DAYS
            );
            self.dashboard.chart_days = MAX_CHART_DAYS;
        }
    }

    /// Report output path, if any.
    pub fn output_path(&self) -> Option<PathBuf> {
        self.general.output.as_ref().map(PathBuf::from)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
