use chrono::NaiveDateTime;

use crate::level::Level;

/// Timestamp layout of every log line: `YYYY-MM-DD HH:MM:SS`.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single submission, already formatted by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    level: Level,
    message: String,
}

impl LogEvent {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Render the on-disk line: `[<timestamp>] <LEVEL>: <message>\n`.
    pub fn format_line(&self, at: &NaiveDateTime, time_format: &str) -> String {
        format!("[{}] {}: {}\n", at.format(time_format), self.level, self.message)
    }
}
