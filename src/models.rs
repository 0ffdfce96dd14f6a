//! Data models for the dashboard.
//!
//! This module contains the record types loaded from the fixtures, the
//! joined per-employee view, and the derived statistics built from it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Employee identifier shared by all three fixtures.
pub type EmployeeId = i64;

/// Leave request identifier, unique across all employees.
pub type LeaveRequestId = i64;

/// Attendance status of a single day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttendanceStatus {
    Present,
    Absent,
    /// Any other status (e.g. "Late"), kept verbatim.
    Other(String),
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Other(s) => s,
        }
    }
}

impl From<String> for AttendanceStatus {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "present" => AttendanceStatus::Present,
            "absent" => AttendanceStatus::Absent,
            _ => AttendanceStatus::Other(s),
        }
    }
}

impl From<AttendanceStatus> for String {
    fn from(status: AttendanceStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a leave request.
///
/// Requests start out `Pending` and move to `Approved` or `Denied`, which
/// are terminal for the rest of the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LeaveStatus {
    Approved,
    Pending,
    Denied,
    Other(String),
}

impl LeaveStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Denied => "Denied",
            LeaveStatus::Other(s) => s,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, LeaveStatus::Pending)
    }

    /// Returns the decision this status represents, if it is terminal.
    pub fn decision(&self) -> Option<LeaveDecision> {
        match self {
            LeaveStatus::Approved => Some(LeaveDecision::Approved),
            LeaveStatus::Denied => Some(LeaveDecision::Denied),
            _ => None,
        }
    }
}

impl Default for LeaveStatus {
    fn default() -> Self {
        LeaveStatus::Other(String::new())
    }
}

impl From<String> for LeaveStatus {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "approved" => LeaveStatus::Approved,
            "pending" => LeaveStatus::Pending,
            "denied" => LeaveStatus::Denied,
            _ => LeaveStatus::Other(s),
        }
    }
}

impl From<LeaveStatus> for String {
    fn from(status: LeaveStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of an approve/deny action on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveDecision {
    Approved,
    Denied,
}

impl From<LeaveDecision> for LeaveStatus {
    fn from(decision: LeaveDecision) -> Self {
        match decision {
            LeaveDecision::Approved => LeaveStatus::Approved,
            LeaveDecision::Denied => LeaveStatus::Denied,
        }
    }
}

impl fmt::Display for LeaveDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", LeaveStatus::from(*self))
    }
}

/// Status filter applied to attendance days and leave requests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Keep every entry.
    #[default]
    All,
    /// Keep entries whose status text matches exactly.
    Only(String),
}

impl StatusFilter {
    pub fn matches(&self, status: &str) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("All"),
            StatusFilter::Only(status) => f.write_str(status),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            Ok(StatusFilter::Only(s.to_string()))
        }
    }
}

/// Employee directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    #[serde(deserialize_with = "lenient::id")]
    pub employee_id: EmployeeId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub position: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub department: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub contact: String,
    /// Free-text note such as "Joined in 2015, promoted in 2018".
    #[serde(default, deserialize_with = "lenient::text")]
    pub employment_history: String,
    /// Base salary as listed in the directory.
    #[serde(
        default,
        deserialize_with = "lenient::amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub salary: Option<f64>,
}

/// Payroll entry for one employee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRecord {
    #[serde(deserialize_with = "lenient::id")]
    pub employee_id: EmployeeId,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub base_salary: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub hours_worked: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub leave_deductions: Option<f64>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub final_salary: Option<f64>,
}

impl PayrollRecord {
    /// Placeholder used when an employee has no payroll entry.
    pub fn empty(employee_id: EmployeeId) -> Self {
        Self {
            employee_id,
            ..Self::default()
        }
    }
}

/// One day of attendance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStatus {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// A leave request filed by an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Fixtures may omit this; the loader assigns one.
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub id: Option<LeaveRequestId>,
    /// Unparseable dates are kept as `None`.
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub reason: String,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub days: Option<f64>,
    #[serde(default)]
    pub status: LeaveStatus,
}

/// Attendance history and leave requests for one employee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(deserialize_with = "lenient::id")]
    pub employee_id: EmployeeId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    /// Yearly leave entitlement in days.
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total_leave: Option<f64>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub attendance: Vec<DayStatus>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub leave_requests: Vec<LeaveRequest>,
}

impl AttendanceRecord {
    /// Placeholder used when an employee has no attendance entry.
    pub fn empty(employee_id: EmployeeId) -> Self {
        Self {
            employee_id,
            ..Self::default()
        }
    }

    /// First recorded status for the given date.
    pub fn status_on(&self, date: NaiveDate) -> Option<&AttendanceStatus> {
        self.attendance
            .iter()
            .find(|day| day.date == date)
            .map(|day| &day.status)
    }
}

/// Whether an employee is currently on the payroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentStatus {
    Active,
    Unknown,
}

impl fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmploymentStatus::Active => write!(f, "Active"),
            EmploymentStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// An employee joined with their payroll and attendance records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedEmployeeView {
    pub employee: EmployeeRecord,
    pub payroll: PayrollRecord,
    pub attendance: AttendanceRecord,
}

impl CombinedEmployeeView {
    pub fn employee_id(&self) -> EmployeeId {
        self.employee.employee_id
    }

    /// Payroll base salary, falling back to the directory salary.
    pub fn base_salary(&self) -> Option<f64> {
        self.payroll.base_salary.or(self.employee.salary)
    }

    /// Final salary if present, else base salary, else zero.
    pub fn resolved_salary(&self) -> f64 {
        self.payroll
            .final_salary
            .or_else(|| self.base_salary())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    pub fn employment_status(&self) -> EmploymentStatus {
        if self.payroll.final_salary.is_some() {
            EmploymentStatus::Active
        } else {
            EmploymentStatus::Unknown
        }
    }

    pub fn pending_leave_count(&self) -> usize {
        self.attendance
            .leave_requests
            .iter()
            .filter(|r| r.status.is_pending())
            .count()
    }
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub headcount: usize,
    pub total_payroll: f64,
    pub pending_leave: usize,
}

impl SummaryStatistics {
    /// Creates the statistics from a set of combined views.
    pub fn from_views(views: &[CombinedEmployeeView]) -> Self {
        let mut summary = Self {
            headcount: views.len(),
            ..Self::default()
        };

        for view in views {
            summary.total_payroll += view.resolved_salary();
            summary.pending_leave += view.pending_leave_count();
        }

        summary
    }
}

/// One employee's status on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAttendance {
    pub employee_id: EmployeeId,
    pub name: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// Present/absent counts for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub present: usize,
    pub absent: usize,
}

/// Leave usage for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveBalance {
    pub entitlement: f64,
    pub used: f64,
    pub remaining: f64,
    pub pending: usize,
}

/// Payslip figures for one employee and pay period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payslip {
    pub employee_id: EmployeeId,
    pub name: String,
    pub department: String,
    pub position: String,
    pub period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
    pub gross_salary: f64,
    pub leave_deductions: f64,
    pub net_pay: f64,
}

/// Tolerant deserializers for hand-edited fixture data.
///
/// Numbers may arrive as strings, text fields as null, lists as anything.
/// None of these should take the whole load down.
pub(crate) mod lenient {
    use chrono::NaiveDate;
    use serde::de::{DeserializeOwned, Error};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use tracing::warn;

    /// Missing or null is `None`; anything non-numeric counts as zero.
    pub fn amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Null => None,
            Value::Number(n) => Some(n.as_f64().unwrap_or(0.0)),
            Value::String(s) => Some(
                s.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .unwrap_or(0.0),
            ),
            _ => Some(0.0),
        })
    }

    pub fn id<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        to_id(&value).ok_or_else(|| D::Error::custom(format!("invalid identifier: {}", value)))
    }

    pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(None);
        }
        to_id(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid identifier: {}", value)))
    }

    fn to_id(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Null => String::new(),
            Value::String(s) => s,
            other => other.to_string(),
        })
    }

    /// `YYYY-MM-DD`; anything else is `None`.
    pub fn opt_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
            _ => None,
        })
    }

    /// Non-array values become an empty list. Items that fail to decode
    /// are skipped with a warning.
    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        let Value::Array(items) = value else {
            return Ok(Vec::new());
        };

        Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    warn!("Skipping entry {}: {}", index, e);
                    None
                }
            })
            .collect())
    }
}
