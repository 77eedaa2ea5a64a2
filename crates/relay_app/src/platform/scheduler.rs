//! Timer service: delivers poll ticks on their own threads. The core decides
//! what a tick means; a tick for a job that terminated in the meantime is
//! simply discarded there.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use relay_core::{JobId, Msg, Timestamp};

/// Current wall-clock time in milliseconds, as stamped onto messages.
pub fn wall_clock_now() -> Timestamp {
    Utc::now().timestamp_millis().max(0) as Timestamp
}

/// Sleeps `delay`, then reports the tick with a fresh timestamp.
pub fn schedule_poll(msg_tx: mpsc::Sender<Msg>, job_id: JobId, delay: Duration) {
    thread::spawn(move || {
        thread::sleep(delay);
        let _ = msg_tx.send(Msg::PollDue {
            job_id,
            now: wall_clock_now(),
        });
    });
}
