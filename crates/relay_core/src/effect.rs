use std::time::Duration;

use crate::{ItemRowView, JobId, PayloadRef};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Bundle the parts into one multipart request and submit them.
    SubmitBatch { job_id: JobId, parts: Vec<UploadPart> },
    /// Issue a single status query for a live job.
    QueryStatus { job_id: JobId, remote_id: String },
    /// Ask the timer service to deliver `Msg::PollDue` after `delay`.
    SchedulePoll { job_id: JobId, delay: Duration },
    /// Write the current table to disk.
    ExportRows { rows: Vec<ItemRowView> },
}

/// One item of a submission request, payload still unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPart {
    pub display_name: String,
    pub payload: PayloadRef,
}
