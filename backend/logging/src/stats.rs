use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Pipeline counters shared by the writer and its write tasks.
#[derive(Debug, Default)]
pub struct Stats {
    accepted: AtomicU64,
    written: AtomicU64,
    write_failures: AtomicU64,
    rotations: AtomicU64,
    rotation_failures: AtomicU64,
}

/// Point-in-time copy of [`Stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    /// Events dequeued by the writer.
    pub accepted: u64,
    pub written: u64,
    pub write_failures: u64,
    pub rotations: u64,
    pub rotation_failures: u64,
}

impl Stats {
    pub(crate) fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_written(&self) {
        self.written.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rotation(&self) {
        self.rotations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rotation_failure(&self) {
        self.rotation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            written: self.written.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
            rotations: self.rotations.load(Ordering::Relaxed),
            rotation_failures: self.rotation_failures.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    /// Accepted events whose write has finished, successfully or not.
    pub fn settled(&self) -> u64 {
        self.written + self.write_failures
    }

    /// Accepted events still waiting for their write task.
    pub fn in_flight(&self) -> u64 {
        self.accepted.saturating_sub(self.settled())
    }
}
