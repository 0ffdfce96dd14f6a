//! Error types for loading and aggregating dashboard data.

use crate::models::{LeaveDecision, LeaveRequestId};
use thiserror::Error;

/// Failure while retrieving or decoding one of the fixtures.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch {location}: status {status}. Response starts: {snippet}")]
    Status {
        location: String,
        status: u16,
        snippet: String,
    },

    #[error("expected JSON from {location} but got '{content_type}'. Response starts: {snippet}")]
    Format {
        location: String,
        content_type: String,
        snippet: String,
    },

    #[error("request to {location} failed: {source}")]
    Transport {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Location of the fixture that failed.
    pub fn location(&self) -> &str {
        match self {
            LoadError::Status { location, .. }
            | LoadError::Format { location, .. }
            | LoadError::Transport { location, .. }
            | LoadError::Io { location, .. }
            | LoadError::Parse { location, .. } => location,
        }
    }

    /// True for failures caused by the payload shape rather than retrieval.
    pub fn is_format(&self) -> bool {
        matches!(self, LoadError::Format { .. } | LoadError::Parse { .. })
    }
}

/// Failure of an operation on the in-memory views.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("leave request {0} not found")]
    NotFound(LeaveRequestId),

    #[error("leave request {id} is already {current} and cannot be {requested}")]
    AlreadyDecided {
        id: LeaveRequestId,
        current: LeaveDecision,
        requested: LeaveDecision,
    },
}
