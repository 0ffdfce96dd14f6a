//! Fixture sources.
//!
//! The three datasets live behind configurable locations, either HTTP(S)
//! URLs or files on disk. Each payload wraps its records in a named
//! top-level field.

pub mod loader;

pub use loader::{load_dataset, SourceLoader};

use crate::models::{AttendanceRecord, EmployeeRecord, PayrollRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default fixture file names inside a data directory.
pub const EMPLOYEE_FILE: &str = "employee_info.json";
pub const PAYROLL_FILE: &str = "payroll_data.json";
pub const ATTENDANCE_FILE: &str = "attendance.json";

/// Where each of the three datasets is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocations {
    pub employees: String,
    pub payroll: String,
    pub attendance: String,
}

impl SourceLocations {
    /// Locations of the standard fixture files inside `dir`.
    pub fn from_data_dir(dir: &Path) -> Self {
        Self {
            employees: dir.join(EMPLOYEE_FILE).display().to_string(),
            payroll: dir.join(PAYROLL_FILE).display().to_string(),
            attendance: dir.join(ATTENDANCE_FILE).display().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmployeeDirectory {
    #[serde(
        rename = "employeeInformation",
        default,
        deserialize_with = "crate::models::lenient::list"
    )]
    pub employees: Vec<EmployeeRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PayrollFile {
    #[serde(
        rename = "payrollData",
        default,
        deserialize_with = "crate::models::lenient::list"
    )]
    pub payroll: Vec<PayrollRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AttendanceFile {
    #[serde(
        rename = "attendanceAndLeave",
        default,
        deserialize_with = "crate::models::lenient::list"
    )]
    pub attendance: Vec<AttendanceRecord>,
}

/// The three record sets as loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub employees: Vec<EmployeeRecord>,
    pub payroll: Vec<PayrollRecord>,
    pub attendance: Vec<AttendanceRecord>,
}

impl Dataset {
    /// Gives every leave request without an identifier a fresh one.
    ///
    /// New identifiers start one past the largest explicit identifier and
    /// follow document order. Returns how many were assigned.
    pub fn assign_leave_ids(&mut self) -> usize {
        let mut next = self
            .attendance
            .iter()
            .flat_map(|a| &a.leave_requests)
            .filter_map(|r| r.id)
            .max()
            .map_or(1, |max| max.saturating_add(1));

        let mut assigned = 0;
        for request in self
            .attendance
            .iter_mut()
            .flat_map(|a| a.leave_requests.iter_mut())
        {
            if request.id.is_none() {
                request.id = Some(next);
                next = next.saturating_add(1);
                assigned += 1;
            }
        }

        if assigned > 0 {
            debug!("Assigned identifiers to {} leave requests", assigned);
        }
        assigned
    }
}
