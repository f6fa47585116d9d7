use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::LoggerConfig;
use crate::dispatch::{self, Producer};
use crate::error::{Error, Result, report};
use crate::event::{LogEvent, TIME_FORMAT};
use crate::level::Level;
use crate::rotation::{RotatingFile, RotationPolicy};
use crate::stats::{Stats, StatsSnapshot};
use crate::writer;

/// Handle to a running log pipeline.
///
/// Clones share the same queue, file and writer. Dropping the last handle
/// closes the queue; the writer then finishes pending writes in the
/// background. Use [`Logger::shutdown`] to wait for that.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

struct Inner {
    level: Level,
    time_format: &'static str,
    path: PathBuf,
    policy: RotationPolicy,
    producer: RwLock<Option<Producer>>,
    writer: Mutex<Option<JoinHandle<()>>>,
    stats: Arc<Stats>,
}

impl Logger {
    /// Validate `config`, open its file and start the writer.
    pub async fn start(config: &LoggerConfig) -> Result<Self> {
        config.validate()?;
        Self::open(config.level, &config.path, config.rotation_policy()).await
    }

    /// Open `path` for appending and start the writer.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn open(level: Level, path: impl Into<PathBuf>, policy: RotationPolicy) -> Result<Self> {
        let path = path.into();
        let file = RotatingFile::open(&path, policy).await?;
        let stats = Arc::new(Stats::default());

        let (producer, consumer) = dispatch::channel();
        let writer = writer::spawn(
            consumer,
            Arc::new(Mutex::new(file)),
            Arc::clone(&stats),
            TIME_FORMAT,
        );

        info!(
            path = %path.display(),
            level = %level,
            max_file_size = policy.max_file_size,
            max_backups = policy.max_backups,
            "Logger started"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                level,
                time_format: TIME_FORMAT,
                path,
                policy,
                producer: RwLock::new(Some(producer)),
                writer: Mutex::new(Some(writer)),
                stats,
            }),
        })
    }

    pub fn level(&self) -> Level {
        self.inner.level
    }

    pub fn time_format(&self) -> &'static str {
        self.inner.time_format
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    pub fn policy(&self) -> RotationPolicy {
        self.inner.policy
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot()
    }

    /// Whether events at `level` pass the minimum level.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.inner.level
    }

    /// Submit `message` at `level`, waiting until the writer has taken it.
    ///
    /// Events below the minimum level are dropped silently. Nothing is
    /// returned: failures are reported on stderr.
    pub async fn log(&self, level: Level, message: impl Into<String>) {
        if !self.enabled(level) {
            return;
        }
        let producer = self.inner.producer.read().await.clone();
        let Some(producer) = producer else {
            report(&Error::Closed);
            return;
        };
        if let Err(e) = producer.submit(LogEvent::new(level, message)).await {
            report(&e);
        }
    }

    /// [`Logger::log`] for plain threads. Panics inside an async context.
    pub fn blocking_log(&self, level: Level, message: impl Into<String>) {
        if !self.enabled(level) {
            return;
        }
        let producer = self.inner.producer.blocking_read().clone();
        let Some(producer) = producer else {
            report(&Error::Closed);
            return;
        };
        if let Err(e) = producer.blocking_submit(LogEvent::new(level, message)) {
            report(&e);
        }
    }

    pub async fn debug(&self, message: impl Into<String>) {
        self.log(Level::Debug, message).await
    }

    pub async fn info(&self, message: impl Into<String>) {
        self.log(Level::Info, message).await
    }

    pub async fn warning(&self, message: impl Into<String>) {
        self.log(Level::Warning, message).await
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.log(Level::Error, message).await
    }

    /// Close the queue and wait until every accepted event has been written
    /// or reported as failed.
    ///
    /// Later submissions are dropped with a `logger is closed` report.
    /// Concurrent callers all wait for the same drain; calls after it has
    /// finished return immediately.
    pub async fn shutdown(&self) -> StatsSnapshot {
        let producer = self.inner.producer.write().await.take();
        if producer.is_none() {
            debug!("Logger already shut down");
        }
        drop(producer);

        // Held until the writer is joined so a second caller cannot return early.
        let mut writer = self.inner.writer.lock().await;
        if let Some(handle) = writer.take() {
            if let Err(e) = handle.await {
                error!(error = %e, "Log writer failed");
            }
        }
        drop(writer);

        let stats = self.stats();
        info!(
            accepted = stats.accepted,
            written = stats.written,
            write_failures = stats.write_failures,
            rotations = stats.rotations,
            "Logger shut down"
        );
        stats
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.inner.level)
            .field("path", &self.inner.path)
            .field("policy", &self.inner.policy)
            .finish_non_exhaustive()
    }
}
