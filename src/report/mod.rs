//! Dashboard report assembly and rendering.
//!
//! The report is a plain snapshot of everything the dashboard shows:
//! headline statistics, the employee table, leave requests and the
//! attendance chart.

pub mod generator;

pub use generator::*;

use crate::analysis::{attendance_history, attendance_on, department_headcount, leave_balance};
use crate::models::{
    CombinedEmployeeView, DailyAttendance, DayCount, EmployeeId, EmploymentStatus, LeaveBalance,
    LeaveRequestId, LeaveStatus, SummaryStatistics,
};
use crate::source::SourceLocations;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the three datasets were loaded from.
    pub sources: SourceLocations,
    pub generated_at: DateTime<Utc>,
    /// Currency prefix used for amounts, e.g. "R" or "$".
    pub currency: String,
    pub pay_period: String,
    pub status_filter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// One row of the employee table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRow {
    pub employee_id: EmployeeId,
    pub name: String,
    pub position: String,
    pub department: String,
    pub contact: String,
    pub salary: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_worked: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leave_deductions: Option<f64>,
    pub status: EmploymentStatus,
    pub leave: LeaveBalance,
}

/// One row of the leave request table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRow {
    pub request_id: Option<LeaveRequestId>,
    pub employee_id: EmployeeId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<f64>,
    pub status: LeaveStatus,
}

/// Employees in one department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentCount {
    pub department: String,
    pub employees: usize,
}

/// Daily attendance table, plus the matched employee's history on a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSection {
    pub date: NaiveDate,
    pub on_date: Vec<DailyAttendance>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<DailyAttendance>,
}

/// The complete dashboard report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub metadata: ReportMetadata,
    /// Statistics over every loaded employee, regardless of filters.
    pub summary: SummaryStatistics,
    pub departments: Vec<DepartmentCount>,
    pub attendance_chart: Vec<DayCount>,
    pub attendance: AttendanceSection,
    pub employees: Vec<EmployeeRow>,
    pub leave_requests: Vec<LeaveRow>,
}

impl DashboardReport {
    /// Build the report from the filtered views shown in the tables.
    ///
    /// With a search in the metadata, `views` holds the matched employee and
    /// their attendance history is included.
    pub fn build(
        metadata: ReportMetadata,
        summary: SummaryStatistics,
        views: &[CombinedEmployeeView],
        attendance_chart: Vec<DayCount>,
        attendance_date: NaiveDate,
        default_entitlement: f64,
    ) -> Self {
        let attendance = AttendanceSection {
            date: attendance_date,
            on_date: attendance_on(views, attendance_date),
            history: match metadata.search {
                Some(_) => views.iter().flat_map(attendance_history).collect(),
                None => Vec::new(),
            },
        };

        let employees = views
            .iter()
            .map(|view| EmployeeRow {
                employee_id: view.employee_id(),
                name: view.employee.name.clone(),
                position: view.employee.position.clone(),
                department: view.employee.department.clone(),
                contact: view.employee.contact.clone(),
                salary: view.resolved_salary(),
                hours_worked: view.payroll.hours_worked,
                leave_deductions: view.payroll.leave_deductions,
                status: view.employment_status(),
                leave: leave_balance(view, default_entitlement),
            })
            .collect();

        let leave_requests = views
            .iter()
            .flat_map(|view| {
                view.attendance.leave_requests.iter().map(move |r| LeaveRow {
                    request_id: r.id,
                    employee_id: view.employee_id(),
                    name: view.employee.name.clone(),
                    date: r.date,
                    reason: r.reason.clone(),
                    days: r.days,
                    status: r.status.clone(),
                })
            })
            .collect();

        let departments = department_headcount(views)
            .into_iter()
            .map(|(department, employees)| DepartmentCount {
                department,
                employees,
            })
            .collect();

        Self {
            metadata,
            summary,
            departments,
            attendance_chart,
            attendance,
            employees,
            leave_requests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{combine, filter_by_status, search};
    use crate::models::{
        AttendanceRecord, AttendanceStatus, DayStatus, EmployeeRecord, StatusFilter,
    };
    use crate::source::SourceLocations;
    use chrono::Utc;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn employee(id: EmployeeId, name: &str) -> EmployeeRecord {
        EmployeeRecord {
            employee_id: id,
            name: name.to_string(),
            position: String::new(),
            department: "QA".to_string(),
            contact: String::new(),
            employment_history: String::new(),
            salary: Some(1000.0),
        }
    }

    fn attendance(id: EmployeeId, days: &[(u32, AttendanceStatus)]) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: id,
            attendance: days
                .iter()
                .map(|(day, status)| DayStatus {
                    date: date(*day),
                    status: status.clone(),
                })
                .collect(),
            ..AttendanceRecord::default()
        }
    }

    fn metadata(search: Option<&str>) -> ReportMetadata {
        ReportMetadata {
            sources: SourceLocations::from_data_dir(std::path::Path::new("data")),
            generated_at: Utc::now(),
            currency: "R".to_string(),
            pay_period: "July 2025".to_string(),
            status_filter: "Absent".to_string(),
            search: search.map(str::to_string),
        }
    }

    fn views() -> Vec<CombinedEmployeeView> {
        combine(
            &[employee(1, "Sibongile Nkosi"), employee(3, "Thabo Molefe")],
            &[],
            &[
                attendance(1, &[(26, AttendanceStatus::Absent), (27, AttendanceStatus::Present)]),
                attendance(
                    3,
                    &[
                        (25, AttendanceStatus::Present),
                        (26, AttendanceStatus::Present),
                        (28, AttendanceStatus::Absent),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn test_daily_attendance_follows_status_filter() {
        let filtered = filter_by_status(&views(), &StatusFilter::Only("Absent".to_string()));
        let report = DashboardReport::build(
            metadata(None),
            SummaryStatistics::default(),
            &filtered,
            vec![],
            date(26),
            20.0,
        );

        assert_eq!(report.attendance.date, date(26));
        let ids: Vec<_> = report.attendance.on_date.iter().map(|d| d.employee_id).collect();
        assert_eq!(ids, vec![1]);
        assert!(report.attendance.history.is_empty());
    }

    #[test]
    fn test_search_includes_filtered_history() {
        let filtered = filter_by_status(&views(), &StatusFilter::Only("Absent".to_string()));
        let matched: Vec<_> = search(&filtered, "thabo").cloned().into_iter().collect();
        let report = DashboardReport::build(
            metadata(Some("thabo")),
            SummaryStatistics::default(),
            &matched,
            vec![],
            date(28),
            20.0,
        );

        let history: Vec<_> = report
            .attendance
            .history
            .iter()
            .map(|d| (d.date, d.status.clone()))
            .collect();
        assert_eq!(history, vec![(date(28), AttendanceStatus::Absent)]);
        assert_eq!(report.attendance.on_date.len(), 1);
        assert_eq!(report.attendance.on_date[0].name, "Thabo Molefe");
    }
}
