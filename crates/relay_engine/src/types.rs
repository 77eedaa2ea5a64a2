use serde_json::Value;
use thiserror::Error;

pub type JobId = u64;

/// One item of a batch submission with its payload resolved.
#[derive(Debug, Clone)]
pub struct UploadPart {
    pub display_name: String,
    pub body: UploadBody,
}

#[derive(Debug, Clone)]
pub enum UploadBody {
    Bytes(bytes::Bytes),
    Text(String),
}

impl From<Vec<u8>> for UploadBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes.into())
    }
}

/// One extraction record of a completed job, keyed by the file name the
/// service echoes back. Everything beyond the identity field is opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEntry {
    pub file_name: String,
    pub fields: Value,
}

/// Parsed job status response.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusReport {
    InProgress { progress: Option<u8> },
    Completed { entries: Vec<ResultEntry> },
    Failed { message: Option<String> },
    /// The body carried an explicit error field instead of a status.
    ServiceError { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("server rejected submission ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("status query timed out")]
    Timeout,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Engine-to-app notifications, one per finished command.
#[derive(Debug)]
pub enum EngineEvent {
    SubmitFinished {
        job_id: JobId,
        result: Result<String, SubmitError>,
    },
    StatusFetched {
        job_id: JobId,
        result: Result<StatusReport, StatusError>,
    },
}
