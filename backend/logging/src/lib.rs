//! Asynchronous leveled file logging with size-based rotation.
//!
//! Producers hand events to a single writer task through a rendezvous queue.
//! The writer appends each event as `[YYYY-MM-DD HH:MM:SS] LEVEL: message`
//! and rotates the file through `path.1 ..= path.N` once it reaches the size
//! threshold.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod file;
pub mod global;
pub mod level;
pub mod logger;
mod macros;
pub mod rotation;
pub mod stats;
mod writer;

pub use config::LoggerConfig;
pub use error::{Error, Result};
pub use event::{LogEvent, TIME_FORMAT};
pub use level::{Level, ParseLevelError};
pub use logger::Logger;
pub use rotation::{RotatingFile, RotationPolicy, backup_path};
pub use stats::{Stats, StatsSnapshot};
