use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the log facility.
///
/// Only construction and configuration errors reach callers. Failures after
/// an event has been accepted are reported on stderr and counted in
/// [`crate::Stats`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("error opening log file {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("logger initialization failed earlier and is not retried")]
    InitFailed,

    #[error("logger not initialized")]
    NotInitialized,

    #[error("error writing log file: {0}")]
    Write(#[source] io::Error),

    #[error("error checking log file size: {0}")]
    Stat(#[source] io::Error),

    #[error("error rotating {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("error reopening log file {}: {source}", path.display())]
    Reopen { path: PathBuf, source: io::Error },

    #[error("logger is closed")]
    Closed,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to read config file {}: {source}", path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("failed to parse config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Report a non-fatal failure.
///
/// Goes to the host's tracing subscriber when one is installed, otherwise
/// to stderr as `rotalog: <error>`. Never both.
pub(crate) fn report(err: &Error) {
    if subscriber_installed() {
        tracing::error!(error = %err, "Log facility error");
    } else {
        eprintln!("rotalog: {err}");
    }
}

fn subscriber_installed() -> bool {
    tracing::dispatcher::get_default(|dispatch| !dispatch.is::<tracing::subscriber::NoSubscriber>())
}
