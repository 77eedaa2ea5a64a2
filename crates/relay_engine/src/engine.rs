use std::sync::{mpsc, Arc};
use std::thread;

use crate::client::{AgentClient, ReqwestAgentClient, ServiceSettings};
use crate::{EngineEvent, JobId, UploadPart};

enum EngineCommand {
    SubmitBatch { job_id: JobId, parts: Vec<UploadPart> },
    QueryStatus { job_id: JobId, remote_id: String },
}

/// Command side of the engine. A dedicated thread owns a tokio runtime and
/// runs each command as its own task; results come back as `EngineEvent`s on
/// the receiver returned by the constructor.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: ServiceSettings) -> (Self, mpsc::Receiver<EngineEvent>) {
        Self::with_client(Arc::new(ReqwestAgentClient::new(settings)))
    }

    /// Injection point for tests and alternative transports.
    pub fn with_client(client: Arc<dyn AgentClient>) -> (Self, mpsc::Receiver<EngineEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(client.as_ref(), command, event_tx).await;
                });
            }
        });

        (Self { cmd_tx }, event_rx)
    }

    pub fn submit_batch(&self, job_id: JobId, parts: Vec<UploadPart>) {
        let _ = self.cmd_tx.send(EngineCommand::SubmitBatch { job_id, parts });
    }

    pub fn query_status(&self, job_id: JobId, remote_id: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::QueryStatus {
            job_id,
            remote_id: remote_id.into(),
        });
    }
}

async fn handle_command(
    client: &dyn AgentClient,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::SubmitBatch { job_id, parts } => {
            let result = client.submit_batch(&parts).await;
            let _ = event_tx.send(EngineEvent::SubmitFinished { job_id, result });
        }
        EngineCommand::QueryStatus { job_id, remote_id } => {
            let result = client.job_status(&remote_id).await;
            let _ = event_tx.send(EngineEvent::StatusFetched { job_id, result });
        }
    }
}
