//! Relay engine: HTTP transport to the remote agent service and effect execution.
mod client;
mod engine;
mod export;
mod persist;
mod types;

pub use client::{AgentClient, ReqwestAgentClient, ServiceSettings};
pub use engine::EngineHandle;
pub use export::{build_csv_export, ExportError, ExportOptions, ExportRow, ExportSummary};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use types::{
    EngineEvent, JobId, ResultEntry, StatusError, StatusReport, SubmitError, UploadBody, UploadPart,
};
