//! Caller-owned dashboard state.
//!
//! The analysis functions are pure; this module holds the single mutable
//! "current view" a front end works against, and routes approve/deny
//! commands to it by identifier.

use crate::analysis::{combine, set_leave_request_status, summarize};
use crate::error::{AggregateError, LoadError};
use crate::models::{
    CombinedEmployeeView, EmployeeId, LeaveDecision, LeaveRequestId, LeaveStatus,
    SummaryStatistics,
};
use crate::source::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

/// An action a front end can trigger on the current views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    ApproveLeave(LeaveRequestId),
    DenyLeave(LeaveRequestId),
}

impl Command {
    pub fn request_id(&self) -> LeaveRequestId {
        match self {
            Command::ApproveLeave(id) | Command::DenyLeave(id) => *id,
        }
    }

    pub fn decision(&self) -> LeaveDecision {
        match self {
            Command::ApproveLeave(_) => LeaveDecision::Approved,
            Command::DenyLeave(_) => LeaveDecision::Denied,
        }
    }
}

/// Result of a successfully handled command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub employee_id: EmployeeId,
    pub request_id: LeaveRequestId,
    pub status: LeaveStatus,
}

/// The current set of combined views plus identifier lookups.
#[derive(Debug, Clone, Default)]
pub struct DashboardSession {
    views: Vec<CombinedEmployeeView>,
    /// Employee id to position in `views` (first occurrence).
    employees: HashMap<EmployeeId, usize>,
}

impl DashboardSession {
    /// Combine a freshly loaded dataset into a new session.
    pub fn new(dataset: &Dataset) -> Self {
        let mut session = Self::default();
        session.replace(dataset);
        session
    }

    pub fn views(&self) -> &[CombinedEmployeeView] {
        &self.views
    }

    /// Recomputed on every call.
    pub fn summary(&self) -> SummaryStatistics {
        summarize(&self.views)
    }

    pub fn employee(&self, id: EmployeeId) -> Option<&CombinedEmployeeView> {
        self.employees.get(&id).map(|&index| &self.views[index])
    }

    /// Apply a command to the in-memory views.
    pub fn handle(&mut self, command: Command) -> Result<CommandOutcome, AggregateError> {
        let request_id = command.request_id();
        let decision = command.decision();

        let employee_id = set_leave_request_status(&mut self.views, request_id, decision)
            .inspect_err(|e| warn!("Command {:?} rejected: {}", command, e))?;

        Ok(CommandOutcome {
            employee_id,
            request_id,
            status: decision.into(),
        })
    }

    /// Replace the views with a new load result.
    ///
    /// On failure the current views are kept and the error is returned.
    pub fn refresh(&mut self, loaded: Result<Dataset, LoadError>) -> Result<(), LoadError> {
        match loaded {
            Ok(dataset) => {
                self.replace(&dataset);
                info!("Session refreshed with {} employees", self.views.len());
                Ok(())
            }
            Err(e) => {
                warn!("Refresh failed, keeping previous data: {}", e);
                Err(e)
            }
        }
    }

    fn replace(&mut self, dataset: &Dataset) {
        self.views = combine(&dataset.employees, &dataset.payroll, &dataset.attendance);
        self.employees.clear();
        for (index, view) in self.views.iter().enumerate() {
            self.employees.entry(view.employee_id()).or_insert(index);
        }
    }
}
