//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::MAX_CHART_DAYS;
use crate::models::{EmployeeId, LeaveRequestId, StatusFilter};
use crate::session::Command;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Staffboard - employee, payroll and attendance dashboard
///
/// Loads the employee directory, payroll and attendance fixtures, joins
/// them by employee id and prints the dashboard as Markdown or JSON.
///
/// Examples:
///   staffboard --data-dir ./data
///   staffboard --payroll https://example.com/payroll_data.json --format json
///   staffboard --status Absent --search thabo
///   staffboard --date 2025-07-26
///   staffboard --approve 102 --deny 202
///   staffboard --payslip 1
///   staffboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory holding employee_info.json, payroll_data.json and attendance.json
    #[arg(short, long, value_name = "DIR", env = "STAFFBOARD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Employee directory location (URL or path)
    #[arg(long, value_name = "LOCATION")]
    pub employees: Option<String>,

    /// Payroll location (URL or path)
    #[arg(long, value_name = "LOCATION")]
    pub payroll: Option<String>,

    /// Attendance and leave location (URL or path)
    #[arg(long, value_name = "LOCATION")]
    pub attendance: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .staffboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output file path for the report (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Keep only attendance days and leave requests with this exact status
    ///
    /// Use "All" (the default) to keep everything.
    #[arg(long, value_name = "STATUS")]
    pub status: Option<StatusFilter>,

    /// Show only the first employee whose name or id matches
    #[arg(short, long, value_name = "QUERY")]
    pub search: Option<String>,

    /// Approve a pending leave request (repeatable)
    #[arg(long, value_name = "REQUEST_ID")]
    pub approve: Vec<LeaveRequestId>,

    /// Deny a pending leave request (repeatable)
    #[arg(long, value_name = "REQUEST_ID")]
    pub deny: Vec<LeaveRequestId>,

    /// Print the payslip for one employee instead of the dashboard
    #[arg(long, value_name = "EMPLOYEE_ID")]
    pub payslip: Option<EmployeeId>,

    /// Date of the daily attendance table (YYYY-MM-DD)
    ///
    /// Defaults to the last chart date.
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// Last date of the attendance chart (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub chart_end: Option<NaiveDate>,

    /// Number of days in the attendance chart
    #[arg(long, value_name = "DAYS")]
    pub chart_days: Option<usize>,

    /// Currency prefix for amounts
    #[arg(long, value_name = "SYMBOL")]
    pub currency: Option<String>,

    /// Pay period label for payslips
    #[arg(long, value_name = "LABEL")]
    pub period: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .staffboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(days) = self.chart_days {
            if days == 0 || days > MAX_CHART_DAYS {
                return Err(format!("Chart days must be between 1 and {}", MAX_CHART_DAYS));
            }
        }

        for location in [&self.employees, &self.payroll, &self.attendance]
            .into_iter()
            .flatten()
        {
            if location.trim().is_empty() {
                return Err("Fixture locations cannot be empty".to_string());
            }
        }

        if let Some(id) = self.approve.iter().find(|&id| self.deny.contains(id)) {
            return Err(format!(
                "Leave request {} cannot be both approved and denied",
                id
            ));
        }

        // Validate data directory if provided
        if let Some(ref dir) = self.data_dir {
            if !dir.exists() {
                return Err(format!("Data directory does not exist: {}", dir.display()));
            }
            if !dir.is_dir() {
                return Err(format!("Data path is not a directory: {}", dir.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Approve/deny commands in the order they should be applied.
    pub fn commands(&self) -> Vec<Command> {
        self.approve
            .iter()
            .map(|&id| Command::ApproveLeave(id))
            .chain(self.deny.iter().map(|&id| Command::DenyLeave(id)))
            .collect()
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status.clone().unwrap_or_default()
    }
}
