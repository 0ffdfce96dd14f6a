//! Staffboard - employee, payroll and attendance aggregation.
//!
//! Loads the three dashboard fixtures, joins them by employee id and
//! derives the figures a dashboard shows: combined views, headline
//! statistics, attendance chart buckets, leave balances and payslips.
//!
//! The analysis functions are pure and work on explicitly passed
//! collections; [`session::DashboardSession`] is the one place that holds
//! mutable state, on behalf of the caller.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod session;
pub mod source;

pub use error::{AggregateError, LoadError};
pub use session::{Command, CommandOutcome, DashboardSession};
pub use source::{load_dataset, Dataset, SourceLoader, SourceLocations};
