//! Status filtering and employee search over combined views.

use crate::models::{CombinedEmployeeView, StatusFilter};

/// Keep only attendance days and leave requests whose status matches.
///
/// `StatusFilter::All` returns the views unchanged. Employees are never
/// dropped, only their entries.
pub fn filter_by_status(
    views: &[CombinedEmployeeView],
    filter: &StatusFilter,
) -> Vec<CombinedEmployeeView> {
    if *filter == StatusFilter::All {
        return views.to_vec();
    }

    views
        .iter()
        .map(|view| {
            let mut filtered = view.clone();
            filtered
                .attendance
                .attendance
                .retain(|day| filter.matches(day.status.as_str()));
            filtered
                .attendance
                .leave_requests
                .retain(|request| filter.matches(request.status.as_str()));
            filtered
        })
        .collect()
}

fn matches_query(view: &CombinedEmployeeView, query: &str) -> bool {
    view.employee.name.to_lowercase().contains(query)
        || view.employee_id().to_string().contains(query)
}

/// First employee whose name or identifier matches `query`.
///
/// Only the first match is returned; use [`search_all`] when every match
/// is needed. A blank query matches nothing.
pub fn search<'a>(views: &'a [CombinedEmployeeView], query: &str) -> Option<&'a CombinedEmployeeView> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    views.iter().find(|view| matches_query(view, &query))
}

/// Every employee whose name or identifier matches `query`, in input order.
pub fn search_all<'a>(views: &'a [CombinedEmployeeView], query: &str) -> Vec<&'a CombinedEmployeeView> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    views.iter().filter(|view| matches_query(view, &query)).collect()
}
