//! The writer process: drains the queue and runs one write task per event.
//!
//! Write tasks are spawned without waiting for earlier ones, but each waits
//! for its predecessor before entering the append-and-rotate section, so
//! lines land in hand-off order and no write overlaps a rotation.
//!
//! The task set is unbounded: if the disk is slower than producers, parked
//! write tasks accumulate here rather than stalling `submit`.

use std::sync::Arc;

use chrono::Local;
use tokio::sync::{Mutex, oneshot};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, error, info};

use crate::dispatch::Consumer;
use crate::error::report;
use crate::event::LogEvent;
use crate::rotation::RotatingFile;
use crate::stats::Stats;

pub(crate) type SharedFile = Arc<Mutex<RotatingFile>>;

pub(crate) fn spawn(
    queue: Consumer,
    file: SharedFile,
    stats: Arc<Stats>,
    time_format: &'static str,
) -> JoinHandle<()> {
    tokio::spawn(run(queue, file, stats, time_format))
}

async fn run(mut queue: Consumer, file: SharedFile, stats: Arc<Stats>, time_format: &'static str) {
    info!("Log writer started");

    let mut in_flight = JoinSet::new();
    let mut predecessor: Option<oneshot::Receiver<()>> = None;

    while let Some(event) = queue.next().await {
        stats.record_accepted();

        let (done, next_turn) = oneshot::channel();
        let turn = predecessor.replace(next_turn);
        in_flight.spawn(write_task(
            event,
            turn,
            done,
            Arc::clone(&file),
            Arc::clone(&stats),
            time_format,
        ));

        while let Some(joined) = in_flight.try_join_next() {
            check_join(joined);
        }
    }

    debug!(in_flight = in_flight.len(), "Queue closed, draining write tasks");
    while let Some(joined) = in_flight.join_next().await {
        check_join(joined);
    }

    info!("Log writer stopped");
}

async fn write_task(
    event: LogEvent,
    turn: Option<oneshot::Receiver<()>>,
    done: oneshot::Sender<()>,
    file: SharedFile,
    stats: Arc<Stats>,
    time_format: &'static str,
) {
    if let Some(turn) = turn {
        // Err means the predecessor died; our turn has come either way.
        let _ = turn.await;
    }

    let mut file = file.lock().await;
    let line = event.format_line(&Local::now().naive_local(), time_format);
    persist(&mut file, line.as_bytes(), &stats).await;
    drop(file);

    let _ = done.send(());
}

/// Append one line, then run the rotation check if the write succeeded.
pub(crate) async fn persist(file: &mut RotatingFile, line: &[u8], stats: &Stats) {
    if let Err(e) = file.write(line).await {
        stats.record_write_failure();
        report(&e);
        return;
    }
    stats.record_written();

    match file.rotate_if_needed().await {
        Ok(true) => stats.record_rotation(),
        Ok(false) => {}
        Err(e) => {
            stats.record_rotation_failure();
            report(&e);
        }
    }
}

fn check_join(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        error!(error = %e, "Write task failed");
    }
}
