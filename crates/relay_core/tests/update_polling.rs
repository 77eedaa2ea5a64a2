use std::time::Duration;

use relay_core::{
    update, AppState, Attachment, Effect, ItemStatus, JobId, JobPhase, Msg, PayloadRef,
    PollFailure, PollSettings, ResultEntry, StatusOutcome, NO_RESULT_MESSAGE, TIMEOUT_MESSAGE,
};
use serde_json::json;

fn init_logging() {
    relay_logging::initialize_for_tests();
}

fn attachment(name: &str) -> Attachment {
    Attachment {
        display_name: name.to_string(),
        payload: PayloadRef::Text(format!("payload for {name}")),
    }
}

fn short_poll() -> PollSettings {
    PollSettings {
        interval: Duration::from_secs(5),
        overall_timeout: Duration::from_secs(60),
    }
}

/// Signs in, submits `names` as one batch at `now` and accepts the
/// submission, leaving the job in the polling phase.
fn start_polling(names: &[&str], now: u64) -> (AppState, JobId) {
    let state = AppState::with_poll_settings(short_poll());
    let (state, _) = update(
        state,
        Msg::SignInSubmitted {
            email: "demo@example.com".to_string(),
            password: "demo123".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::FilesAttached(names.iter().map(|name| attachment(name)).collect()),
    );
    let (state, effects) = update(state, Msg::UploadSubmitted { now });
    let job_id = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::SubmitBatch { job_id, .. } => Some(*job_id),
            _ => None,
        })
        .expect("submit effect");
    let (state, _) = update(
        state,
        Msg::SubmitFinished {
            job_id,
            result: Ok("remote-1".to_string()),
            now,
        },
    );
    (state, job_id)
}

fn entry(name: &str, fields: serde_json::Value) -> ResultEntry {
    ResultEntry {
        file_name: name.to_string(),
        fields,
    }
}

#[test]
fn poll_due_issues_exactly_one_query_at_a_time() {
    init_logging();
    let (state, job_id) = start_polling(&["a.pdf"], 0);

    let (state, effects) = update(state, Msg::PollDue { job_id, now: 5_000 });
    assert_eq!(
        effects,
        vec![Effect::QueryStatus {
            job_id,
            remote_id: "remote-1".to_string(),
        }]
    );

    // A second tick while the query is still in flight must stay silent.
    let (_state, effects) = update(state, Msg::PollDue { job_id, now: 10_000 });
    assert!(effects.is_empty());
}

#[test]
fn in_progress_response_schedules_the_next_tick() {
    init_logging();
    let (state, job_id) = start_polling(&["a.pdf"], 0);
    let (state, _) = update(state, Msg::PollDue { job_id, now: 5_000 });

    let (state, effects) = update(
        state,
        Msg::StatusFetched {
            job_id,
            result: Ok(StatusOutcome::InProgress { progress: Some(40) }),
            now: 5_100,
        },
    );
    assert_eq!(
        effects,
        vec![Effect::SchedulePoll {
            job_id,
            delay: Duration::from_secs(5),
        }]
    );

    // The in-flight flag is released, so the next tick queries again.
    let (_state, effects) = update(state, Msg::PollDue { job_id, now: 10_100 });
    assert_eq!(effects.len(), 1);
    assert!(matches!(effects[0], Effect::QueryStatus { .. }));
}

#[test]
fn transient_query_failure_keeps_the_loop_and_the_rows() {
    init_logging();
    let (state, job_id) = start_polling(&["a.pdf"], 0);
    let (state, _) = update(state, Msg::PollDue { job_id, now: 5_000 });

    let (state, effects) = update(
        state,
        Msg::StatusFetched {
            job_id,
            result: Err(PollFailure::Timeout),
            now: 5_200,
        },
    );

    assert_eq!(
        effects,
        vec![Effect::SchedulePoll {
            job_id,
            delay: Duration::from_secs(5),
        }]
    );
    assert_eq!(state.view().rows[0].status, ItemStatus::Pending);
    assert_eq!(state.job_phase(job_id), Some(JobPhase::Polling));
}

#[test]
fn deadline_expires_the_job_and_stops_queries() {
    init_logging();
    let (state, job_id) = start_polling(&["a.pdf", "b.pdf"], 0);

    // Deadline is 60 s after acceptance.
    let (state, effects) = update(state, Msg::PollDue { job_id, now: 61_000 });
    assert!(effects.is_empty());

    let view = state.view();
    assert!(view
        .rows
        .iter()
        .all(|row| row.status == ItemStatus::Error
            && row.error.as_deref() == Some(TIMEOUT_MESSAGE)));
    assert_eq!(state.job_phase(job_id), Some(JobPhase::TimedOut));
    assert_eq!(view.active_jobs, 0);

    // The loop is dead; later ticks are ignored.
    let (_state, effects) = update(state, Msg::PollDue { job_id, now: 66_000 });
    assert!(effects.is_empty());
}

#[test]
fn deadline_applies_when_a_slow_response_reports_still_processing() {
    init_logging();
    let (state, job_id) = start_polling(&["a.pdf"], 0);
    let (state, _) = update(state, Msg::PollDue { job_id, now: 59_000 });

    let (state, effects) = update(
        state,
        Msg::StatusFetched {
            job_id,
            result: Ok(StatusOutcome::InProgress { progress: None }),
            now: 61_000,
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.job_phase(job_id), Some(JobPhase::TimedOut));
    assert_eq!(state.view().rows[0].error.as_deref(), Some(TIMEOUT_MESSAGE));
}

#[test]
fn completed_payload_resolves_every_member() {
    init_logging();
    let (state, job_id) = start_polling(&["a.pdf", "b.pdf"], 0);
    let (state, _) = update(state, Msg::PollDue { job_id, now: 5_000 });

    let (state, effects) = update(
        state,
        Msg::StatusFetched {
            job_id,
            result: Ok(StatusOutcome::Completed {
                entries: vec![
                    entry("a.pdf", json!({"Total": "10.00"})),
                    entry("b.pdf", json!({"Total": "20.00"})),
                ],
            }),
            now: 5_100,
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.job_phase(job_id), Some(JobPhase::Completed));
    let view = state.view();
    assert!(view.rows.iter().all(|row| row.status == ItemStatus::Processed));
    assert!(!view.rows.iter().any(|row| row.status == ItemStatus::Pending));
}

#[test]
fn completed_payload_with_gaps_errors_only_the_missing_member() {
    init_logging();
    let (state, job_id) = start_polling(&["a.pdf", "b.pdf", "c.pdf"], 0);
    let (state, _) = update(state, Msg::PollDue { job_id, now: 5_000 });

    let (state, _) = update(
        state,
        Msg::StatusFetched {
            job_id,
            result: Ok(StatusOutcome::Completed {
                entries: vec![
                    entry("a.pdf", json!({"Total": "1"})),
                    entry("c.pdf", json!({"Total": "3"})),
                ],
            }),
            now: 5_100,
        },
    );

    let view = state.view();
    assert_eq!(view.rows[0].status, ItemStatus::Processed);
    assert_eq!(view.rows[1].status, ItemStatus::Error);
    assert_eq!(view.rows[1].error.as_deref(), Some(NO_RESULT_MESSAGE));
    assert_eq!(view.rows[2].status, ItemStatus::Processed);
}

#[test]
fn reported_failure_fans_out_the_server_message() {
    init_logging();
    let (state, job_id) = start_polling(&["a.pdf", "b.pdf"], 0);
    let (state, _) = update(state, Msg::PollDue { job_id, now: 5_000 });

    let (state, _) = update(
        state,
        Msg::StatusFetched {
            job_id,
            result: Ok(StatusOutcome::Failed {
                message: Some("model unavailable".to_string()),
            }),
            now: 5_100,
        },
    );

    assert_eq!(state.job_phase(job_id), Some(JobPhase::Failed));
    let view = state.view();
    assert!(view
        .rows
        .iter()
        .all(|row| row.error.as_deref() == Some("model unavailable")));
}

#[test]
fn explicit_error_field_resolves_like_a_failure() {
    init_logging();
    let (state, job_id) = start_polling(&["a.pdf"], 0);
    let (state, _) = update(state, Msg::PollDue { job_id, now: 5_000 });

    let (state, _) = update(
        state,
        Msg::StatusFetched {
            job_id,
            result: Ok(StatusOutcome::ServiceError {
                message: "job not found".to_string(),
            }),
            now: 5_100,
        },
    );

    assert_eq!(state.job_phase(job_id), Some(JobPhase::Failed));
    assert_eq!(state.view().rows[0].error.as_deref(), Some("job not found"));
}

#[test]
fn terminal_response_observed_after_the_deadline_still_wins() {
    init_logging();
    let (state, job_id) = start_polling(&["a.pdf"], 0);
    let (state, _) = update(state, Msg::PollDue { job_id, now: 59_000 });

    let (state, _) = update(
        state,
        Msg::StatusFetched {
            job_id,
            result: Ok(StatusOutcome::Completed {
                entries: vec![entry("a.pdf", json!({"Total": "5"}))],
            }),
            now: 61_000,
        },
    );

    assert_eq!(state.job_phase(job_id), Some(JobPhase::Completed));
    assert_eq!(state.view().rows[0].status, ItemStatus::Processed);
}

#[test]
fn clearing_records_abandons_the_loop_and_discards_late_responses() {
    init_logging();
    let (state, job_id) = start_polling(&["a.pdf"], 0);
    let (state, _) = update(state, Msg::PollDue { job_id, now: 5_000 });

    let (state, _) = update(state, Msg::RecordsCleared);
    assert_eq!(state.view().rows.len(), 0);
    assert_eq!(state.job_phase(job_id), None);

    // The in-flight response lands after the clear; nothing to mutate.
    let (state, effects) = update(
        state,
        Msg::StatusFetched {
            job_id,
            result: Ok(StatusOutcome::Completed {
                entries: vec![entry("a.pdf", json!({"Total": "5"}))],
            }),
            now: 5_100,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().rows.len(), 0);

    let (_state, effects) = update(state, Msg::PollDue { job_id, now: 10_000 });
    assert!(effects.is_empty());
}

#[test]
fn status_for_an_unknown_job_is_ignored() {
    init_logging();
    let (state, _job_id) = start_polling(&["a.pdf"], 0);

    let (state, effects) = update(
        state,
        Msg::StatusFetched {
            job_id: 999,
            result: Ok(StatusOutcome::Failed { message: None }),
            now: 5_000,
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.view().rows[0].status, ItemStatus::Pending);
}
