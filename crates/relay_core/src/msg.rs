use crate::{Attachment, JobId, PollFailure, RecordId, StatusOutcome, SubmitFailure, Timestamp, UserProfile};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User submitted the sign-in form.
    SignInSubmitted { email: String, password: String },
    /// Restore a previously persisted sign-in session.
    SessionRestored(UserProfile),
    /// User clicked sign out.
    SignOutClicked,
    /// User attached files or text blobs in the upload dialog.
    FilesAttached(Vec<Attachment>),
    /// User removed one staged attachment before submitting.
    AttachmentRemoved { index: usize },
    /// User confirmed the upload dialog; the staged attachments become one batch.
    UploadSubmitted { now: Timestamp },
    /// Transport finished the initial submission request.
    SubmitFinished {
        job_id: JobId,
        result: Result<String, SubmitFailure>,
        now: Timestamp,
    },
    /// A scheduled poll tick came due.
    PollDue { job_id: JobId, now: Timestamp },
    /// Transport finished one status query.
    StatusFetched {
        job_id: JobId,
        result: Result<StatusOutcome, PollFailure>,
        now: Timestamp,
    },
    /// User asked to re-process the selected rows (or all unprocessed ones).
    ReprocessRequested { now: Timestamp },
    /// User toggled one row's selection checkbox.
    RowSelectionToggled { record_id: RecordId },
    /// User toggled the select-all checkbox.
    AllRowsToggled,
    /// User deleted one row.
    RecordRemoved { record_id: RecordId },
    /// User cleared the whole table; live poll loops are abandoned.
    RecordsCleared,
    /// User asked for a CSV export of the table.
    ExportClicked,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
