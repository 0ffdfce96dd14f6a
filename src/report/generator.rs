//! Markdown and JSON report generation.

use super::{
    AttendanceSection, DashboardReport, DepartmentCount, EmployeeRow, LeaveRow, ReportMetadata,
};
use crate::config::ReportConfig;
use crate::models::{AttendanceStatus, DayCount, LeaveStatus, Payslip, SummaryStatistics};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &DashboardReport, options: &ReportConfig) -> String {
    let currency = &report.metadata.currency;
    let mut output = String::new();

    // Title
    output.push_str("# Staff Dashboard\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.summary, currency));

    if !report.departments.is_empty() {
        output.push_str(&generate_departments_section(&report.departments));
    }

    if options.include_chart {
        output.push_str(&generate_chart_section(&report.attendance_chart));
    }

    if options.include_attendance {
        output.push_str(&generate_attendance_section(&report.attendance));
    }

    if options.include_employees {
        output.push_str(&generate_employees_section(&report.employees, currency));
    }

    if options.include_leave_requests {
        output.push_str(&generate_leave_section(&report.leave_requests));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Employees:** `{}`\n", metadata.sources.employees));
    section.push_str(&format!("- **Payroll:** `{}`\n", metadata.sources.payroll));
    section.push_str(&format!("- **Attendance:** `{}`\n", metadata.sources.attendance));
    section.push_str(&format!("- **Pay Period:** {}\n", metadata.pay_period));
    section.push_str(&format!("- **Status Filter:** {}\n", metadata.status_filter));
    if let Some(ref query) = metadata.search {
        section.push_str(&format!("- **Search:** {}\n", query));
    }
    section.push('\n');

    section
}

fn generate_summary_section(summary: &SummaryStatistics, currency: &str) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Employees | Total Payroll | Pending Leave |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} |\n\n",
        summary.headcount,
        format_amount(currency, summary.total_payroll),
        summary.pending_leave
    ));

    section
}

fn generate_departments_section(departments: &[DepartmentCount]) -> String {
    let mut section = String::new();

    section.push_str("### Employees by Department\n\n");
    section.push_str("| Department | Employees |\n");
    section.push_str("|:---|:---:|\n");
    for department in departments {
        section.push_str(&format!(
            "| {} | {} |\n",
            department.department, department.employees
        ));
    }
    section.push('\n');

    section
}

/// Generate the attendance chart as a table with bars.
fn generate_chart_section(chart: &[DayCount]) -> String {
    let mut section = String::new();

    section.push_str("## Attendance Overview\n\n");

    if chart.is_empty() {
        section.push_str("No attendance dates selected.\n\n");
        return section;
    }

    section.push_str("| Date | Present | Absent | |\n");
    section.push_str("|:---|:---:|:---:|:---|\n");
    for day in chart {
        section.push_str(&format!(
            "| {} | {} | {} | {}{} |\n",
            day.date.format("%Y-%m-%d"),
            day.present,
            day.absent,
            "🟩".repeat(day.present),
            "🟥".repeat(day.absent)
        ));
    }
    section.push('\n');

    section
}

/// Generate the daily attendance table and, after a search, the history.
fn generate_attendance_section(attendance: &AttendanceSection) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "## Attendance on {}\n\n",
        attendance.date.format("%Y-%m-%d")
    ));

    if attendance.on_date.is_empty() {
        section.push_str("No attendance recorded.\n\n");
    } else {
        section.push_str("| ID | Name | Status |\n");
        section.push_str("|:---:|:---|:---|\n");
        for day in &attendance.on_date {
            section.push_str(&format!(
                "| {} | {} | {} |\n",
                day.employee_id,
                or_dash(&day.name),
                attendance_badge(&day.status)
            ));
        }
        section.push('\n');
    }

    if let Some(first) = attendance.history.first() {
        section.push_str(&format!("### Attendance History: {}\n\n", or_dash(&first.name)));
        section.push_str("| Date | Status |\n");
        section.push_str("|:---|:---|\n");
        for day in &attendance.history {
            section.push_str(&format!(
                "| {} | {} |\n",
                day.date.format("%Y-%m-%d"),
                attendance_badge(&day.status)
            ));
        }
        section.push('\n');
    }

    section
}

fn attendance_badge(status: &AttendanceStatus) -> String {
    match status {
        AttendanceStatus::Present => "🟩 Present".to_string(),
        AttendanceStatus::Absent => "🟥 Absent".to_string(),
        AttendanceStatus::Other(s) => s.clone(),
    }
}

fn generate_employees_section(rows: &[EmployeeRow], currency: &str) -> String {
    let mut section = String::new();

    section.push_str("## Employees\n\n");

    if rows.is_empty() {
        section.push_str("No employee found.\n\n");
        return section;
    }

    section.push_str(
        "| ID | Name | Position | Department | Salary | Status | Leave Used | Leave Left | Pending |\n",
    );
    section.push_str("|:---:|:---|:---|:---|---:|:---:|:---:|:---:|:---:|\n");
    for row in rows {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
            row.employee_id,
            or_dash(&row.name),
            or_dash(&row.position),
            or_dash(&row.department),
            format_amount(currency, row.salary),
            row.status,
            format_number(row.leave.used),
            format_number(row.leave.remaining),
            row.leave.pending
        ));
    }
    section.push('\n');

    section
}

fn generate_leave_section(rows: &[LeaveRow]) -> String {
    let mut section = String::new();

    section.push_str("## Leave Requests\n\n");

    if rows.is_empty() {
        section.push_str("No data.\n\n");
        return section;
    }

    section.push_str("| Request | Employee | Date | Reason | Days | Status |\n");
    section.push_str("|:---:|:---|:---|:---|:---:|:---|\n");
    for row in rows {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            row.request_id.map_or_else(|| "—".to_string(), |id| id.to_string()),
            or_dash(&row.name),
            row.date
                .map_or_else(|| "—".to_string(), |d| d.format("%Y-%m-%d").to_string()),
            or_dash(&row.reason),
            row.days.map_or_else(|| "—".to_string(), format_number),
            status_badge(&row.status)
        ));
    }
    section.push('\n');

    section
}

fn status_badge(status: &LeaveStatus) -> String {
    match status {
        LeaveStatus::Approved => "🟢 Approved".to_string(),
        LeaveStatus::Pending => "🟡 Pending".to_string(),
        LeaveStatus::Denied => "🔴 Denied".to_string(),
        LeaveStatus::Other(s) => s.clone(),
    }
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by staffboard v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Render a payslip as Markdown.
pub fn generate_payslip_markdown(payslip: &Payslip, currency: &str) -> String {
    let mut output = String::new();

    output.push_str("# Payslip\n\n");
    output.push_str("*This is a computer-generated payslip.*\n\n");

    output.push_str(&format!("- **Employee Name:** {}\n", or_dash(&payslip.name)));
    output.push_str(&format!("- **Employee ID:** {}\n", payslip.employee_id));
    output.push_str(&format!("- **Department:** {}\n", or_dash(&payslip.department)));
    output.push_str(&format!("- **Position:** {}\n", or_dash(&payslip.position)));
    output.push_str(&format!("- **Period:** {}\n", payslip.period));
    output.push_str(&format!(
        "- **Join Date:** {}\n\n",
        payslip.join_date.as_deref().unwrap_or("—")
    ));

    output.push_str("| | Amount |\n");
    output.push_str("|:---|---:|\n");
    output.push_str(&format!(
        "| Gross Salary | {} |\n",
        format_amount(currency, payslip.gross_salary)
    ));
    output.push_str(&format!(
        "| Leave Deductions | {} |\n",
        format_amount(currency, payslip.leave_deductions)
    ));
    output.push_str(&format!(
        "| **Net Pay** | **{}** |\n\n",
        format_amount(currency, payslip.net_pay)
    ));

    output.push_str("No signature required.\n");

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &DashboardReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Generate a JSON payslip.
pub fn generate_payslip_json(payslip: &Payslip) -> Result<String> {
    serde_json::to_string_pretty(payslip).map_err(Into::into)
}

/// Format an amount with thousands separators, e.g. `R12,345.50`.
///
/// Whole amounts omit the decimals. Non-finite values render as zero.
pub fn format_amount(currency: &str, value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let cents = (value.abs() * 100.0).round() as u64;
    let negative = value < 0.0 && cents > 0;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(currency);
    out.push_str(&group_thousands(cents / 100));
    if cents % 100 != 0 {
        out.push_str(&format!(".{:02}", cents % 100));
    }

    out
}

/// Format a plain quantity (days, hours) without trailing zeros.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "—"
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyAttendance, EmploymentStatus, LeaveBalance};
    use crate::source::SourceLocations;
    use chrono::{NaiveDate, Utc};

    fn create_test_report() -> DashboardReport {
        let date = NaiveDate::from_ymd_opt(2025, 7, 25).unwrap();

        DashboardReport {
            metadata: ReportMetadata {
                sources: SourceLocations {
                    employees: "data/employee_info.json".to_string(),
                    payroll: "data/payroll_data.json".to_string(),
                    attendance: "data/attendance.json".to_string(),
                },
                generated_at: Utc::now(),
                currency: "R".to_string(),
                pay_period: "July 2025".to_string(),
                status_filter: "All".to_string(),
                search: Some("sib".to_string()),
            },
            summary: SummaryStatistics {
                headcount: 1,
                total_payroll: 69500.0,
                pending_leave: 1,
            },
            departments: vec![DepartmentCount {
                department: "Development".to_string(),
                employees: 1,
            }],
            attendance_chart: vec![DayCount {
                date,
                present: 2,
                absent: 1,
            }],
            attendance: AttendanceSection {
                date,
                on_date: vec![DailyAttendance {
                    employee_id: 1,
                    name: "Sibongile Nkosi".to_string(),
                    date,
                    status: AttendanceStatus::Absent,
                }],
                history: vec![
                    DailyAttendance {
                        employee_id: 1,
                        name: "Sibongile Nkosi".to_string(),
                        date: NaiveDate::from_ymd_opt(2025, 7, 24).unwrap(),
                        status: AttendanceStatus::Present,
                    },
                    DailyAttendance {
                        employee_id: 1,
                        name: "Sibongile Nkosi".to_string(),
                        date,
                        status: AttendanceStatus::Absent,
                    },
                ],
            },
            employees: vec![EmployeeRow {
                employee_id: 1,
                name: "Sibongile Nkosi".to_string(),
                position: "Software Engineer".to_string(),
                department: "Development".to_string(),
                contact: "sibongile@example.com".to_string(),
                salary: 69500.0,
                hours_worked: Some(160.0),
                leave_deductions: Some(8.0),
                status: EmploymentStatus::Active,
                leave: LeaveBalance {
                    entitlement: 20.0,
                    used: 2.0,
                    remaining: 18.0,
                    pending: 1,
                },
            }],
            leave_requests: vec![LeaveRow {
                request_id: Some(102),
                employee_id: 1,
                name: "Sibongile Nkosi".to_string(),
                date: Some(date),
                reason: "Personal".to_string(),
                days: Some(3.0),
                status: LeaveStatus::Pending,
            }],
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("# Staff Dashboard"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Summary"));
        assert!(markdown.contains("| 1 | R69,500 | 1 |"));
        assert!(markdown.contains("## Attendance Overview"));
        assert!(markdown.contains("| 2025-07-25 | 2 | 1 | 🟩🟩🟥 |"));
        assert!(markdown.contains("Sibongile Nkosi"));
        assert!(markdown.contains("🟡 Pending"));
        assert!(markdown.contains("- **Search:** sib"));
    }

    #[test]
    fn test_attendance_section() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("## Attendance on 2025-07-25"));
        assert!(markdown.contains("| 1 | Sibongile Nkosi | 🟥 Absent |"));
        assert!(markdown.contains("### Attendance History: Sibongile Nkosi"));
        assert!(markdown.contains("| 2025-07-24 | 🟩 Present |"));
        assert!(markdown.contains("| 2025-07-25 | 🟥 Absent |"));
    }

    #[test]
    fn test_attendance_section_without_search() {
        let mut report = create_test_report();
        report.attendance.on_date.clear();
        report.attendance.history.clear();
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("No attendance recorded."));
        assert!(!markdown.contains("### Attendance History"));
    }

    #[test]
    fn test_sections_can_be_disabled() {
        let report = create_test_report();
        let options = ReportConfig {
            include_chart: false,
            include_attendance: false,
            include_employees: false,
            include_leave_requests: false,
        };
        let markdown = generate_markdown_report(&report, &options);

        assert!(markdown.contains("## Summary"));
        assert!(!markdown.contains("## Attendance Overview"));
        assert!(!markdown.contains("## Attendance on"));
        assert!(!markdown.contains("## Employees\n"));
        assert!(!markdown.contains("## Leave Requests"));
    }

    #[test]
    fn test_empty_tables() {
        let mut report = create_test_report();
        report.employees.clear();
        report.leave_requests.clear();
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("No employee found."));
        assert!(markdown.contains("No data."));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"summary\""));
        assert!(json.contains("\"attendance_chart\""));
        assert!(json.contains("\"on_date\""));
        assert!(json.contains("\"pending_leave\": 1"));
        assert!(json.contains("\"status\": \"Pending\""));
    }

    #[test]
    fn test_generate_payslip_markdown() {
        let payslip = Payslip {
            employee_id: 1,
            name: "Sibongile Nkosi".to_string(),
            department: "Development".to_string(),
            position: "Software Engineer".to_string(),
            period: "July 2025".to_string(),
            join_date: Some("2015".to_string()),
            gross_salary: 70000.0,
            leave_deductions: 8.0,
            net_pay: 69500.0,
        };

        let markdown = generate_payslip_markdown(&payslip, "R");
        assert!(markdown.contains("- **Employee ID:** 1"));
        assert!(markdown.contains("- **Join Date:** 2015"));
        assert!(markdown.contains("| Gross Salary | R70,000 |"));
        assert!(markdown.contains("| **Net Pay** | **R69,500** |"));

        let json = generate_payslip_json(&payslip).unwrap();
        assert!(json.contains("\"net_pay\": 69500.0"));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount("R", 0.0), "R0");
        assert_eq!(format_amount("R", 999.0), "R999");
        assert_eq!(format_amount("R", 1200.0), "R1,200");
        assert_eq!(format_amount("$", 12345.5), "$12,345.50");
        assert_eq!(format_amount("R", 1234567.891), "R1,234,567.89");
        assert_eq!(format_amount("R", -1000.0), "-R1,000");
        assert_eq!(format_amount("R", f64::NAN), "R0");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(18.0), "18");
        assert_eq!(format_number(1.5), "1.5");
    }
}
