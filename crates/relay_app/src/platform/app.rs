use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use relay_core::{update, AppState, Attachment, Msg, PayloadRef, PollSettings};
use relay_engine::ServiceSettings;
use thiserror::Error;

use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::render;
use super::scheduler::wall_clock_now;
use super::session;

#[derive(Debug, Clone)]
pub struct AppOptions {
    pub files: Vec<PathBuf>,
    pub base_url: String,
    pub interval: Duration,
    pub overall_timeout: Duration,
    pub output_dir: PathBuf,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("sign-in failed: {0}")]
    SignIn(String),
    #[error("no input files given")]
    NoInputs,
}

pub fn run_app(options: AppOptions) -> Result<(), AppError> {
    logging::initialize(LogDestination::File);

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(
        msg_tx.clone(),
        ServiceSettings {
            base_url: options.base_url.clone(),
            ..ServiceSettings::default()
        },
        options.output_dir.clone(),
    );

    let mut state = AppState::with_poll_settings(PollSettings {
        interval: options.interval,
        overall_timeout: options.overall_timeout,
    });

    // Restore the persisted session, or sign in with the given credentials.
    match session::load_session(&options.output_dir) {
        Some(profile) => dispatch(&mut state, &runner, Msg::SessionRestored(profile)),
        None => dispatch(
            &mut state,
            &runner,
            Msg::SignInSubmitted {
                email: options.email.clone(),
                password: options.password.clone(),
            },
        ),
    }
    let view = state.view();
    if !view.signed_in {
        return Err(AppError::SignIn(
            view.auth_error.unwrap_or_else(|| "unknown".to_string()),
        ));
    }
    if let Some(profile) = state.current_user() {
        session::save_session(&options.output_dir, profile);
    }

    let attachments: Vec<Attachment> = options
        .files
        .iter()
        .map(|path| Attachment {
            display_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            payload: PayloadRef::File(path.clone()),
        })
        .collect();
    if attachments.is_empty() {
        return Err(AppError::NoInputs);
    }

    dispatch(&mut state, &runner, Msg::FilesAttached(attachments));
    dispatch(&mut state, &runner, Msg::UploadSubmitted { now: wall_clock_now() });

    // Message loop: fold incoming messages through the core until every job
    // has resolved.
    while state.view().active_jobs > 0 {
        match msg_rx.recv_timeout(Duration::from_millis(250)) {
            Ok(msg) => dispatch(&mut state, &runner, msg),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    dispatch(&mut state, &runner, Msg::ExportClicked);
    render::render_summary(&state.view());
    Ok(())
}

fn dispatch(state: &mut AppState, runner: &EffectRunner, msg: Msg) {
    let current = std::mem::take(state);
    let (mut next, effects) = update(current, msg);
    if next.consume_dirty() {
        render::render_table(&next.view());
    }
    *state = next;
    runner.run(effects);
}
