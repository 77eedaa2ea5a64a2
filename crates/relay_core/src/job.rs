use std::time::Duration;

use crate::RecordId;

pub type JobId = u64;

/// Milliseconds since an arbitrary epoch. The platform stamps these onto
/// messages; the core never reads a clock itself.
pub type Timestamp = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    /// Submission request sent, job id not yet assigned by the service.
    Submitting,
    /// Status queries running on the poll cadence.
    Polling,
    Completed,
    Failed,
    TimedOut,
}

impl JobPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobPhase::Completed | JobPhase::Failed | JobPhase::TimedOut)
    }
}

/// One row covered by a job, used to map the result payload back onto the
/// store. Correlation with the remote payload is by display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobMember {
    pub record_id: RecordId,
    pub display_name: String,
}

/// One remote asynchronous batch-processing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    /// Assigned by the service once the submission is accepted.
    pub remote_id: Option<String>,
    pub phase: JobPhase,
    pub members: Vec<JobMember>,
    pub submitted_at: Timestamp,
    /// Hard ceiling for the whole poll loop, independent of tick count.
    pub deadline: Timestamp,
    /// At most one status query may be outstanding per job.
    pub query_in_flight: bool,
    pub last_progress: Option<u8>,
}

/// Poll cadence and overall ceiling. The source service used 5 s / 5 min as
/// demo constants; they are configuration here, not contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub overall_timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            overall_timeout: Duration::from_secs(300),
        }
    }
}
