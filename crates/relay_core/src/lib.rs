//! Relay core: pure batch-submission state machine and view-model helpers.
mod auth;
mod effect;
mod job;
mod materialize;
mod msg;
mod remote;
mod state;
mod store;
mod update;
mod view_model;

pub use auth::{verify_credentials, SessionGate, UserProfile};
pub use effect::{Effect, UploadPart};
pub use job::{Job, JobId, JobMember, JobPhase, PollSettings, Timestamp};
pub use materialize::{materialize, NO_RESULT_MESSAGE};
pub use msg::Msg;
pub use remote::{PollFailure, ResultEntry, StatusOutcome, SubmitFailure};
pub use state::AppState;
pub use store::{Attachment, ItemRecord, ItemResult, ItemStatus, ItemStore, PayloadRef, RecordId};
pub use update::{update, FAILED_MESSAGE, TIMEOUT_MESSAGE};
pub use view_model::{AppViewModel, ItemRowView};
