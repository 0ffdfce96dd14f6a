//! Leave approvals, balances and payslips.

use crate::error::AggregateError;
use crate::models::{
    CombinedEmployeeView, EmployeeId, LeaveBalance, LeaveDecision, LeaveRequestId, LeaveStatus,
    Payslip,
};
use tracing::{debug, info};

/// Apply an approve/deny decision to the leave request with `request_id`.
///
/// Returns the identifier of the employee who filed it. Repeating the same
/// decision is a no-op that still succeeds; a request that was already
/// decided the other way is left untouched.
pub fn set_leave_request_status(
    views: &mut [CombinedEmployeeView],
    request_id: LeaveRequestId,
    decision: LeaveDecision,
) -> Result<EmployeeId, AggregateError> {
    let (employee_id, request) = views
        .iter_mut()
        .find_map(|view| {
            let employee_id = view.employee_id();
            view.attendance
                .leave_requests
                .iter_mut()
                .find(|r| r.id == Some(request_id))
                .map(|r| (employee_id, r))
        })
        .ok_or(AggregateError::NotFound(request_id))?;

    match request.status.decision() {
        Some(current) if current == decision => {
            debug!("Leave request {} already {}", request_id, decision);
        }
        Some(current) => {
            return Err(AggregateError::AlreadyDecided {
                id: request_id,
                current,
                requested: decision,
            });
        }
        None => {
            request.status = LeaveStatus::from(decision);
            info!(
                "Leave request {} {} for employee {}",
                request_id, decision, employee_id
            );
        }
    }

    Ok(employee_id)
}

/// Leave usage for one employee.
///
/// The entitlement comes from the attendance record, falling back to
/// `default_entitlement`. Only approved requests count as used.
pub fn leave_balance(view: &CombinedEmployeeView, default_entitlement: f64) -> LeaveBalance {
    let entitlement = view
        .attendance
        .total_leave
        .unwrap_or(default_entitlement);

    let used: f64 = view
        .attendance
        .leave_requests
        .iter()
        .filter(|r| r.status == LeaveStatus::Approved)
        .map(|r| r.days.unwrap_or(0.0))
        .sum();

    LeaveBalance {
        entitlement,
        used,
        remaining: entitlement - used,
        pending: view.pending_leave_count(),
    }
}

/// Payslip figures for `view` over the pay period labelled `period`.
pub fn payslip(view: &CombinedEmployeeView, period: &str) -> Payslip {
    let employee = &view.employee;

    Payslip {
        employee_id: employee.employee_id,
        name: employee.name.clone(),
        department: employee.department.clone(),
        position: employee.position.clone(),
        period: period.to_string(),
        join_date: join_date(&employee.employment_history),
        gross_salary: employee.salary.unwrap_or(0.0),
        leave_deductions: view.payroll.leave_deductions.unwrap_or(0.0),
        net_pay: view.resolved_salary(),
    }
}

/// First segment of an employment history note, without "Joined in".
fn join_date(history: &str) -> Option<String> {
    let first = history.split(',').next()?.trim();
    let date = first.strip_prefix("Joined in ").unwrap_or(first).trim();

    if date.is_empty() {
        None
    } else {
        Some(date.to_string())
    }
}
