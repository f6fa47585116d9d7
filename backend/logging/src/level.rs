//! Log levels and their on-disk names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of a log event. Ordered: `Debug < Info < Warning < Error`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Level {
    Debug = 0,
    #[default]
    Info = 1,
    #[serde(alias = "warn")]
    Warning = 2,
    Error = 3,
}

/// Name written for an ordinal that maps to no known level.
pub const UNKNOWN_LEVEL: &str = "UNKNOWN";

impl Level {
    pub const ALL: [Level; 4] = [Level::Debug, Level::Info, Level::Warning, Level::Error];

    /// Upper-case name used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }

    /// Level for a raw ordinal, if any.
    pub fn from_ordinal(raw: u8) -> Option<Level> {
        Level::ALL.into_iter().find(|level| *level as u8 == raw)
    }

    /// Line name for a raw ordinal; `UNKNOWN` outside the enum.
    pub fn name_of(raw: u8) -> &'static str {
        Level::from_ordinal(raw).map_or(UNKNOWN_LEVEL, |level| level.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level {0:?} (expected debug, info, warning or error)")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warning" | "warn" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_totally_ordered() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warning);
        assert!(Level::Warning < Level::Error);
        let mut shuffled = vec![Level::Error, Level::Debug, Level::Warning, Level::Info];
        shuffled.sort();
        assert_eq!(shuffled, Level::ALL.to_vec());
    }

    #[test]
    fn test_line_names() {
        let names: Vec<_> = Level::ALL.iter().map(Level::as_str).collect();
        assert_eq!(names, ["DEBUG", "INFO", "WARNING", "ERROR"]);
        assert_eq!(Level::Warning.to_string(), "WARNING");
    }

    #[test]
    fn test_unknown_ordinal() {
        assert_eq!(Level::name_of(2), "WARNING");
        assert_eq!(Level::name_of(9), "UNKNOWN");
        assert_eq!(Level::from_ordinal(4), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("INFO".parse::<Level>().unwrap(), Level::Info);
        assert_eq!(" warn ".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!("Error".parse::<Level>().unwrap(), Level::Error);
        assert!("trace".parse::<Level>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let level: Level = serde_yaml::from_str("warn").unwrap();
        assert_eq!(level, Level::Warning);
        assert_eq!(serde_yaml::to_string(&Level::Debug).unwrap().trim(), "debug");
    }
}
