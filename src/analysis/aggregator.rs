//! Joining and aggregation.
//!
//! This module joins the three record sets into per-employee views and
//! computes the statistics and chart buckets derived from them.

use crate::models::{
    AttendanceRecord, AttendanceStatus, CombinedEmployeeView, DailyAttendance, DayCount,
    EmployeeRecord, PayrollRecord, SummaryStatistics,
};
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

/// Join employees with their payroll and attendance records.
///
/// Produces exactly one view per employee, in input order. When several
/// payroll or attendance records share an identifier the first one wins;
/// a missing record is replaced by an empty one.
pub fn combine(
    employees: &[EmployeeRecord],
    payroll: &[PayrollRecord],
    attendance: &[AttendanceRecord],
) -> Vec<CombinedEmployeeView> {
    let mut payroll_by_id: HashMap<_, &PayrollRecord> = HashMap::new();
    for record in payroll {
        payroll_by_id.entry(record.employee_id).or_insert(record);
    }

    let mut attendance_by_id: HashMap<_, &AttendanceRecord> = HashMap::new();
    for record in attendance {
        attendance_by_id.entry(record.employee_id).or_insert(record);
    }

    employees
        .iter()
        .map(|employee| {
            let id = employee.employee_id;
            CombinedEmployeeView {
                employee: employee.clone(),
                payroll: payroll_by_id
                    .get(&id)
                    .map(|p| (*p).clone())
                    .unwrap_or_else(|| PayrollRecord::empty(id)),
                attendance: attendance_by_id
                    .get(&id)
                    .map(|a| (*a).clone())
                    .unwrap_or_else(|| AttendanceRecord::empty(id)),
            }
        })
        .collect()
}

/// Headcount, payroll cost and pending leave over all views.
pub fn summarize(views: &[CombinedEmployeeView]) -> SummaryStatistics {
    SummaryStatistics::from_views(views)
}

/// Count present and absent employees for each date, in input order.
///
/// Employees with no entry for a date, or with any other status, are not
/// counted.
pub fn bucket_attendance_by_date(
    views: &[CombinedEmployeeView],
    dates: &[NaiveDate],
) -> Vec<DayCount> {
    dates
        .iter()
        .map(|&date| {
            let mut bucket = DayCount {
                date,
                present: 0,
                absent: 0,
            };

            for view in views {
                match view.attendance.status_on(date) {
                    Some(AttendanceStatus::Present) => bucket.present += 1,
                    Some(AttendanceStatus::Absent) => bucket.absent += 1,
                    _ => {}
                }
            }

            bucket
        })
        .collect()
}

/// The `days` consecutive dates ending at `end`, oldest first.
///
/// The window stops at the earliest representable date.
pub fn date_window(end: NaiveDate, days: usize) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = (0..days)
        .map_while(|offset| {
            let offset = Duration::try_days(i64::try_from(offset).ok()?)?;
            end.checked_sub_signed(offset)
        })
        .collect();
    dates.reverse();
    dates
}

/// Each employee's status on `date`, in view order.
///
/// Employees with no entry for that date are left out.
pub fn attendance_on(views: &[CombinedEmployeeView], date: NaiveDate) -> Vec<DailyAttendance> {
    views
        .iter()
        .filter_map(|view| {
            view.attendance.status_on(date).map(|status| DailyAttendance {
                employee_id: view.employee_id(),
                name: view.employee.name.clone(),
                date,
                status: status.clone(),
            })
        })
        .collect()
}

/// Every recorded day of one employee, in fixture order.
pub fn attendance_history(view: &CombinedEmployeeView) -> Vec<DailyAttendance> {
    view.attendance
        .attendance
        .iter()
        .map(|day| DailyAttendance {
            employee_id: view.employee_id(),
            name: view.employee.name.clone(),
            date: day.date,
            status: day.status.clone(),
        })
        .collect()
}

/// Most recent attendance date across all views.
pub fn latest_attendance_date(views: &[CombinedEmployeeView]) -> Option<NaiveDate> {
    views
        .iter()
        .flat_map(|v| &v.attendance.attendance)
        .map(|day| day.date)
        .max()
}

/// Employees per department, largest first.
pub fn department_headcount(views: &[CombinedEmployeeView]) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for view in views {
        let department = if view.employee.department.is_empty() {
            "Unassigned".to_string()
        } else {
            view.employee.department.clone()
        };
        *counts.entry(department).or_default() += 1;
    }

    let mut departments: Vec<_> = counts.into_iter().collect();
    departments.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    departments
}
