use std::collections::BTreeMap;

use crate::auth::{SessionGate, UserProfile};
use crate::view_model::{AppViewModel, ItemRowView};
use crate::{Attachment, ItemStatus, ItemStore, Job, JobId, JobMember, JobPhase, PollSettings, Timestamp};

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub(crate) session: SessionGate,
    pub(crate) auth_error: Option<String>,
    /// Attachments collected in the upload dialog, consumed on submit.
    pub(crate) staged: Vec<Attachment>,
    pub(crate) store: ItemStore,
    pub(crate) jobs: BTreeMap<JobId, Job>,
    pub(crate) next_job_id: JobId,
    pub(crate) poll: PollSettings,
    pub(crate) dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_poll_settings(PollSettings::default())
    }

    pub fn with_poll_settings(poll: PollSettings) -> Self {
        Self {
            session: SessionGate::default(),
            auth_error: None,
            staged: Vec::new(),
            store: ItemStore::default(),
            jobs: BTreeMap::new(),
            next_job_id: 1,
            poll,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let rows: Vec<ItemRowView> = self
            .store
            .iter()
            .map(|record| ItemRowView {
                record_id: record.id,
                display_name: record.display_name.clone(),
                status: record.status,
                selected: self.store.is_selected(record.id),
                error: record.error.clone(),
                primary: record.result.as_ref().map(|result| result.primary.clone()),
                line_item_count: record
                    .result
                    .as_ref()
                    .map(|result| result.line_items.len())
                    .unwrap_or(0),
            })
            .collect();
        let unprocessed_count = rows
            .iter()
            .filter(|row| matches!(row.status, ItemStatus::Unprocessed | ItemStatus::Error))
            .count();

        AppViewModel {
            signed_in: self.session.is_signed_in(),
            user_name: self.session.user().map(|user| user.name.clone()),
            auth_error: self.auth_error.clone(),
            staged: self
                .staged
                .iter()
                .map(|attachment| attachment.display_name.clone())
                .collect(),
            selected_count: self.store.selected_count(),
            unprocessed_count,
            active_jobs: self
                .jobs
                .values()
                .filter(|job| !job.phase.is_terminal())
                .count(),
            rows,
            dirty: self.dirty,
        }
    }

    /// Read-only snapshot for presentation and tests.
    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn current_user(&self) -> Option<&UserProfile> {
        self.session.user()
    }

    pub fn job_phase(&self, job_id: JobId) -> Option<JobPhase> {
        self.jobs.get(&job_id).map(|job| job.phase)
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Registers a new job in the `Submitting` phase. The deadline is
    /// provisional; it is restarted when polling begins.
    pub(crate) fn allocate_job(&mut self, members: Vec<JobMember>, now: Timestamp) -> JobId {
        let id = self.next_job_id;
        self.next_job_id += 1;
        let deadline = now.saturating_add(self.poll.overall_timeout.as_millis() as u64);
        self.jobs.insert(
            id,
            Job {
                id,
                remote_id: None,
                phase: JobPhase::Submitting,
                members,
                submitted_at: now,
                deadline,
                query_in_flight: false,
                last_progress: None,
            },
        );
        id
    }
}
