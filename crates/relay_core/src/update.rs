use crate::materialize::materialize;
use crate::{
    verify_credentials, AppState, Effect, ItemStatus, JobId, JobMember, JobPhase, Msg, RecordId,
    StatusOutcome, UploadPart,
};

/// Message shown on rows whose job hit the overall polling ceiling.
pub const TIMEOUT_MESSAGE: &str = "processing timed out";
/// Message shown on rows whose job the service reported failed without detail.
pub const FAILED_MESSAGE: &str = "processing failed";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SignInSubmitted { email, password } => {
            match verify_credentials(&email, &password) {
                Some(profile) => {
                    state.session.sign_in(profile);
                    state.auth_error = None;
                }
                None => {
                    state.auth_error = Some("invalid credentials".to_string());
                }
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::SessionRestored(profile) => {
            if !state.session.is_signed_in() {
                state.session.sign_in(profile);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SignOutClicked => {
            if state.session.is_signed_in() {
                state.session.sign_out();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::FilesAttached(attachments) => {
            if !state.session.is_signed_in() || attachments.is_empty() {
                return (state, Vec::new());
            }
            state.staged.extend(attachments);
            state.mark_dirty();
            Vec::new()
        }
        Msg::AttachmentRemoved { index } => {
            if index < state.staged.len() {
                state.staged.remove(index);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::UploadSubmitted { now } => {
            if !state.session.is_signed_in() || state.staged.is_empty() {
                return (state, Vec::new());
            }
            let attachments = std::mem::take(&mut state.staged);
            let parts: Vec<UploadPart> = attachments
                .iter()
                .map(|attachment| UploadPart {
                    display_name: attachment.display_name.clone(),
                    payload: attachment.payload.clone(),
                })
                .collect();
            // Pending rows appear before the submission result is known.
            let ids = state.store.insert_pending(attachments);
            let members = members_for(&state, &ids);
            let job_id = state.allocate_job(members, now);
            state.mark_dirty();
            vec![Effect::SubmitBatch { job_id, parts }]
        }
        Msg::SubmitFinished { job_id, result, now } => {
            if state.job_phase(job_id) != Some(JobPhase::Submitting) {
                return (state, Vec::new());
            }
            match result {
                Ok(remote_id) => {
                    let deadline =
                        now.saturating_add(state.poll.overall_timeout.as_millis() as u64);
                    let interval = state.poll.interval;
                    if let Some(job) = state.jobs.get_mut(&job_id) {
                        job.remote_id = Some(remote_id);
                        job.phase = JobPhase::Polling;
                        job.deadline = deadline;
                    }
                    state.mark_dirty();
                    vec![Effect::SchedulePoll {
                        job_id,
                        delay: interval,
                    }]
                }
                Err(failure) => {
                    // Every row of the batch fails; no job, no poll loop.
                    let message = failure.to_string();
                    let ids = member_record_ids(&state, job_id);
                    state.jobs.remove(&job_id);
                    state.store.mark_error(&ids, &message);
                    state.mark_dirty();
                    Vec::new()
                }
            }
        }
        Msg::PollDue { job_id, now } => {
            let (in_flight, deadline, remote_id) = match state.jobs.get(&job_id) {
                Some(job) if job.phase == JobPhase::Polling => {
                    (job.query_in_flight, job.deadline, job.remote_id.clone())
                }
                _ => return (state, Vec::new()),
            };
            if now > deadline {
                expire_job(&mut state, job_id);
                return (state, Vec::new());
            }
            if in_flight {
                // The previous query has not answered yet; keep single flight.
                return (state, Vec::new());
            }
            match remote_id {
                Some(remote_id) => {
                    if let Some(job) = state.jobs.get_mut(&job_id) {
                        job.query_in_flight = true;
                    }
                    vec![Effect::QueryStatus { job_id, remote_id }]
                }
                None => Vec::new(),
            }
        }
        Msg::StatusFetched { job_id, result, now } => {
            if state.job_phase(job_id) != Some(JobPhase::Polling) {
                // Job cleared or already terminal; a late response is discarded.
                return (state, Vec::new());
            }
            if let Some(job) = state.jobs.get_mut(&job_id) {
                job.query_in_flight = false;
            }
            match result {
                Ok(StatusOutcome::Completed { entries }) => {
                    let members = state
                        .jobs
                        .get(&job_id)
                        .map(|job| job.members.clone())
                        .unwrap_or_default();
                    materialize(&mut state.store, &members, &entries);
                    if let Some(job) = state.jobs.get_mut(&job_id) {
                        job.phase = JobPhase::Completed;
                    }
                    state.mark_dirty();
                    Vec::new()
                }
                Ok(StatusOutcome::Failed { message }) => {
                    fail_job(&mut state, job_id, message.as_deref().unwrap_or(FAILED_MESSAGE));
                    Vec::new()
                }
                Ok(StatusOutcome::ServiceError { message }) => {
                    fail_job(&mut state, job_id, &message);
                    Vec::new()
                }
                Ok(StatusOutcome::InProgress { progress }) => {
                    let deadline = state
                        .jobs
                        .get(&job_id)
                        .map(|job| job.deadline)
                        .unwrap_or_default();
                    if now > deadline {
                        expire_job(&mut state, job_id);
                        return (state, Vec::new());
                    }
                    if let Some(job) = state.jobs.get_mut(&job_id) {
                        if job.last_progress != progress {
                            job.last_progress = progress;
                            state.dirty = true;
                        }
                    }
                    vec![Effect::SchedulePoll {
                        job_id,
                        delay: state.poll.interval,
                    }]
                }
                Err(_failure) => {
                    // A single failed query is transient; the deadline is the
                    // only thing that resolves a job without a server answer.
                    let deadline = state
                        .jobs
                        .get(&job_id)
                        .map(|job| job.deadline)
                        .unwrap_or_default();
                    if now > deadline {
                        expire_job(&mut state, job_id);
                        return (state, Vec::new());
                    }
                    vec![Effect::SchedulePoll {
                        job_id,
                        delay: state.poll.interval,
                    }]
                }
            }
        }
        Msg::ReprocessRequested { now } => {
            if !state.session.is_signed_in() {
                return (state, Vec::new());
            }
            let selected = state.store.selected_ids();
            let candidates: Vec<RecordId> = if selected.is_empty() {
                state
                    .store
                    .iter()
                    .filter(|record| record.status == ItemStatus::Unprocessed)
                    .map(|record| record.id)
                    .collect()
            } else {
                selected
                    .into_iter()
                    .filter(|id| {
                        state
                            .store
                            .get(*id)
                            .map(|record| {
                                matches!(record.status, ItemStatus::Unprocessed | ItemStatus::Error)
                            })
                            .unwrap_or(false)
                    })
                    .collect()
            };
            if candidates.is_empty() {
                return (state, Vec::new());
            }
            let parts: Vec<UploadPart> = candidates
                .iter()
                .filter_map(|id| state.store.get(*id))
                .map(|record| UploadPart {
                    display_name: record.display_name.clone(),
                    payload: record.payload.clone(),
                })
                .collect();
            let members = members_for(&state, &candidates);
            state.store.mark_pending(&candidates);
            state.store.clear_selection();
            let job_id = state.allocate_job(members, now);
            state.mark_dirty();
            vec![Effect::SubmitBatch { job_id, parts }]
        }
        Msg::RowSelectionToggled { record_id } => {
            if state.store.toggle_selected(record_id) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::AllRowsToggled => {
            if !state.store.is_empty() {
                state.store.toggle_all();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RecordRemoved { record_id } => {
            if state.store.remove(record_id) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RecordsCleared => {
            if state.store.is_empty() && state.jobs.is_empty() {
                return (state, Vec::new());
            }
            // Dropping the jobs stops their loops: later ticks and in-flight
            // responses find no job and are discarded.
            state.store.clear();
            state.jobs.clear();
            state.mark_dirty();
            Vec::new()
        }
        Msg::ExportClicked => {
            if state.store.is_empty() {
                Vec::new()
            } else {
                vec![Effect::ExportRows {
                    rows: state.view().rows,
                }]
            }
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn members_for(state: &AppState, ids: &[RecordId]) -> Vec<JobMember> {
    ids.iter()
        .filter_map(|id| state.store.get(*id))
        .map(|record| JobMember {
            record_id: record.id,
            display_name: record.display_name.clone(),
        })
        .collect()
}

fn member_record_ids(state: &AppState, job_id: JobId) -> Vec<RecordId> {
    state
        .jobs
        .get(&job_id)
        .map(|job| job.members.iter().map(|member| member.record_id).collect())
        .unwrap_or_default()
}

/// The overall deadline elapsed: rows still pending become error rows and the
/// loop stops. Rows another job already resolved are left alone.
fn expire_job(state: &mut AppState, job_id: JobId) {
    let ids = member_record_ids(state, job_id);
    if let Some(job) = state.jobs.get_mut(&job_id) {
        job.phase = JobPhase::TimedOut;
        job.query_in_flight = false;
    }
    state.store.mark_error_if_pending(&ids, TIMEOUT_MESSAGE);
    state.mark_dirty();
}

/// The service reported the job terminally failed: the failure fans out to
/// every member row.
fn fail_job(state: &mut AppState, job_id: JobId, message: &str) {
    let ids = member_record_ids(state, job_id);
    if let Some(job) = state.jobs.get_mut(&job_id) {
        job.phase = JobPhase::Failed;
        job.query_in_flight = false;
    }
    state.store.mark_error(&ids, message);
    state.mark_dirty();
}
