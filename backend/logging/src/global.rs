//! Process-wide logger with exactly-once initialization.
//!
//! Prefer passing a [`Logger`] around explicitly; this module exists for call
//! sites that cannot be reached that way.
//!
//! # Caveat
//!
//! Initialization runs once per process. If the first attempt fails (invalid
//! settings, or the file cannot be opened), the failure is permanent: every later call returns
//! [`Error::InitFailed`] without trying again.

use std::path::PathBuf;

use tokio::sync::OnceCell;
use tracing::debug;

use crate::config::LoggerConfig;
use crate::error::{Error, Result, report};
use crate::level::Level;
use crate::logger::Logger;

static INSTANCE: OnceCell<Option<Logger>> = OnceCell::const_new();

/// Return the process-wide logger, creating it on the first call.
///
/// Only the first call's arguments are used; later callers get the same
/// instance whatever they pass. Concurrent first calls construct exactly one
/// logger. The arguments are validated like a [`LoggerConfig`], so a zero
/// `max_size_mb` fails with [`Error::Config`].
pub async fn get_logger(
    level: Level,
    path: impl Into<PathBuf>,
    max_size_mb: u64,
    max_backups: usize,
) -> Result<Logger> {
    let config = LoggerConfig {
        level,
        path: path.into(),
        max_size_mb,
        max_backups,
    };
    init(&config).await
}

/// [`get_logger`] driven by a [`LoggerConfig`].
pub async fn init(config: &LoggerConfig) -> Result<Logger> {
    install(|| Logger::start(config)).await
}

async fn install<F, Fut>(start: F) -> Result<Logger>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Logger>>,
{
    let mut failure = None;
    let slot = &mut failure;
    let instance = INSTANCE
        .get_or_init(|| async move {
            match start().await {
                Ok(logger) => Some(logger),
                Err(e) => {
                    *slot = Some(e);
                    None
                }
            }
        })
        .await;

    match instance {
        Some(logger) => Ok(logger.clone()),
        None => Err(failure.unwrap_or(Error::InitFailed)),
    }
}

/// The process-wide logger, if initialization succeeded.
pub fn logger() -> Option<Logger> {
    INSTANCE.get().and_then(Option::clone)
}

pub async fn log(level: Level, message: impl Into<String>) {
    match logger() {
        Some(logger) => logger.log(level, message).await,
        None => report(&Error::NotInitialized),
    }
}

pub async fn debug(message: impl Into<String>) {
    log(Level::Debug, message).await
}

pub async fn info(message: impl Into<String>) {
    log(Level::Info, message).await
}

pub async fn warning(message: impl Into<String>) {
    log(Level::Warning, message).await
}

pub async fn error(message: impl Into<String>) {
    log(Level::Error, message).await
}

/// Drain the process-wide logger, if there is one.
pub async fn shutdown() {
    match logger() {
        Some(logger) => {
            logger.shutdown().await;
        }
        None => debug!("No global logger to shut down"),
    }
}
