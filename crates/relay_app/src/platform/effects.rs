use std::fs;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use relay_core::{Effect, ItemRowView, Msg, PayloadRef, PollFailure, StatusOutcome, SubmitFailure};
use relay_engine::{
    build_csv_export, EngineEvent, EngineHandle, ExportOptions, ExportRow, ServiceSettings,
};
use relay_logging::{relay_debug, relay_error, relay_info, relay_warn};

use super::render::status_label;
use super::scheduler::{schedule_poll, wall_clock_now};

/// Executes core effects against the engine and turns engine events back into
/// timestamped messages.
pub struct EffectRunner {
    engine: EngineHandle,
    msg_tx: mpsc::Sender<Msg>,
    output_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(msg_tx: mpsc::Sender<Msg>, settings: ServiceSettings, output_dir: PathBuf) -> Self {
        let (engine, event_rx) = EngineHandle::new(settings);
        spawn_event_pump(event_rx, msg_tx.clone());
        Self {
            engine,
            msg_tx,
            output_dir,
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitBatch { job_id, parts } => self.submit_batch(job_id, parts),
                Effect::QueryStatus { job_id, remote_id } => {
                    relay_debug!("QueryStatus job_id={} remote_id={}", job_id, remote_id);
                    self.engine.query_status(job_id, remote_id);
                }
                Effect::SchedulePoll { job_id, delay } => {
                    schedule_poll(self.msg_tx.clone(), job_id, delay);
                }
                Effect::ExportRows { rows } => self.export_rows(rows),
            }
        }
    }

    fn submit_batch(&self, job_id: u64, parts: Vec<relay_core::UploadPart>) {
        relay_info!("SubmitBatch job_id={} parts={}", job_id, parts.len());
        let mut resolved = Vec::with_capacity(parts.len());
        for part in parts {
            match resolve_payload(&part) {
                Ok(body) => resolved.push(relay_engine::UploadPart {
                    display_name: part.display_name,
                    body,
                }),
                Err(err) => {
                    relay_warn!("Failed to read {}: {}", part.display_name, err);
                    let message = format!("failed to read {}: {err}", part.display_name);
                    let _ = self.msg_tx.send(Msg::SubmitFinished {
                        job_id,
                        result: Err(SubmitFailure::Network(message)),
                        now: wall_clock_now(),
                    });
                    return;
                }
            }
        }
        self.engine.submit_batch(job_id, resolved);
    }

    fn export_rows(&self, rows: Vec<ItemRowView>) {
        let export_rows: Vec<ExportRow> = rows
            .iter()
            .map(|row| ExportRow {
                display_name: row.display_name.clone(),
                status: status_label(row.status).to_string(),
                error: row.error.clone(),
                primary: row.primary.clone(),
                line_item_count: row.line_item_count,
            })
            .collect();
        match build_csv_export(&self.output_dir, &export_rows, ExportOptions::default()) {
            Ok(summary) => relay_info!(
                "Exported {} rows to {:?}",
                summary.row_count,
                summary.output_path
            ),
            Err(err) => relay_error!("CSV export failed: {}", err),
        }
    }
}

fn resolve_payload(part: &relay_core::UploadPart) -> std::io::Result<relay_engine::UploadBody> {
    match &part.payload {
        PayloadRef::File(path) => Ok(fs::read(path)?.into()),
        PayloadRef::Text(text) => Ok(relay_engine::UploadBody::Text(text.clone())),
    }
}

fn spawn_event_pump(event_rx: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            let msg = match event {
                EngineEvent::SubmitFinished { job_id, result } => Msg::SubmitFinished {
                    job_id,
                    result: result.map_err(map_submit_error),
                    now: wall_clock_now(),
                },
                EngineEvent::StatusFetched { job_id, result } => Msg::StatusFetched {
                    job_id,
                    result: result.map(map_status_report).map_err(map_poll_failure),
                    now: wall_clock_now(),
                },
            };
            if msg_tx.send(msg).is_err() {
                break;
            }
        }
    });
}

fn map_submit_error(err: relay_engine::SubmitError) -> SubmitFailure {
    match err {
        relay_engine::SubmitError::Rejected { status, body } => {
            SubmitFailure::Rejected { status, body }
        }
        other => SubmitFailure::Network(other.to_string()),
    }
}

fn map_poll_failure(err: relay_engine::StatusError) -> PollFailure {
    match err {
        relay_engine::StatusError::Timeout => PollFailure::Timeout,
        relay_engine::StatusError::HttpStatus(code) => PollFailure::HttpStatus(code),
        relay_engine::StatusError::InvalidResponse(message) => {
            PollFailure::InvalidResponse(message)
        }
        other => PollFailure::Network(other.to_string()),
    }
}

fn map_status_report(report: relay_engine::StatusReport) -> StatusOutcome {
    match report {
        relay_engine::StatusReport::InProgress { progress } => {
            StatusOutcome::InProgress { progress }
        }
        relay_engine::StatusReport::Completed { entries } => StatusOutcome::Completed {
            entries: entries
                .into_iter()
                .map(|entry| relay_core::ResultEntry {
                    file_name: entry.file_name,
                    fields: entry.fields,
                })
                .collect(),
        },
        relay_engine::StatusReport::Failed { message } => StatusOutcome::Failed { message },
        relay_engine::StatusReport::ServiceError { message } => {
            StatusOutcome::ServiceError { message }
        }
    }
}
