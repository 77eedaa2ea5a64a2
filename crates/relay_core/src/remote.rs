use std::fmt;

use serde_json::Value;

/// One extraction record from a completed job payload. `file_name` is the
/// identity field correlating the entry to a submitted item; everything else
/// is opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEntry {
    pub file_name: String,
    pub fields: Value,
}

/// What one status query observed.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusOutcome {
    InProgress { progress: Option<u8> },
    Completed { entries: Vec<ResultEntry> },
    Failed { message: Option<String> },
    /// The service answered with an explicit error field instead of a status.
    ServiceError { message: String },
}

/// Why the initial submission produced no job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitFailure {
    Network(String),
    Rejected { status: u16, body: String },
}

impl fmt::Display for SubmitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitFailure::Network(message) => write!(f, "upload failed: {message}"),
            SubmitFailure::Rejected { status, body } => {
                write!(f, "server rejected upload ({status}): {body}")
            }
        }
    }
}

/// A single status query that failed without resolving the job. Transient:
/// the loop keeps its cadence and the deadline is the backstop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollFailure {
    Network(String),
    Timeout,
    HttpStatus(u16),
    InvalidResponse(String),
}

impl fmt::Display for PollFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollFailure::Network(message) => write!(f, "network error: {message}"),
            PollFailure::Timeout => write!(f, "status query timed out"),
            PollFailure::HttpStatus(code) => write!(f, "http status {code}"),
            PollFailure::InvalidResponse(message) => write!(f, "invalid response: {message}"),
        }
    }
}
