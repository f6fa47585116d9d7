//! Logger configuration: YAML file, environment overrides, validation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::level::Level;
use crate::rotation::RotationPolicy;

pub const DEFAULT_PATH: &str = "rotalog.log";
pub const DEFAULT_MAX_SIZE_MB: u64 = 10;
pub const DEFAULT_MAX_BACKUPS: usize = 5;

pub const ENV_LEVEL: &str = "ROTALOG_LEVEL";
pub const ENV_FILE: &str = "ROTALOG_FILE";
pub const ENV_MAX_SIZE_MB: &str = "ROTALOG_MAX_SIZE_MB";
pub const ENV_MAX_BACKUPS: &str = "ROTALOG_MAX_BACKUPS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggerConfig {
    /// Minimum level written to the file.
    pub level: Level,
    /// Active log file; backups are written next to it.
    pub path: PathBuf,
    /// Size in MiB at which the active file is rotated.
    pub max_size_mb: u64,
    /// Number of backup generations kept.
    pub max_backups: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            path: PathBuf::from(DEFAULT_PATH),
            max_size_mb: DEFAULT_MAX_SIZE_MB,
            max_backups: DEFAULT_MAX_BACKUPS,
        }
    }
}

impl LoggerConfig {
    /// Load a YAML config file. Missing keys keep their defaults.
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .await
            .map_err(|source| Error::ConfigRead {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_yaml(&raw).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded logger config");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    pub fn to_yaml(&self) -> std::result::Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Apply `ROTALOG_*` environment overrides.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a custom lookup (useful for testing).
    pub fn apply_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = lookup(ENV_LEVEL) {
            self.level = raw
                .parse()
                .map_err(|e| Error::Config(format!("{ENV_LEVEL}: {e}")))?;
        }
        if let Some(raw) = lookup(ENV_FILE) {
            self.path = PathBuf::from(raw);
        }
        if let Some(raw) = lookup(ENV_MAX_SIZE_MB) {
            self.max_size_mb = parse_number(ENV_MAX_SIZE_MB, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_BACKUPS) {
            self.max_backups = parse_number(ENV_MAX_BACKUPS, &raw)?;
        }
        debug!(config = ?self, "Applied environment overrides");
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::Config("path must not be empty".into()));
        }
        if self.max_size_mb == 0 {
            return Err(Error::Config("maxSizeMb must be at least 1".into()));
        }
        Ok(())
    }

    pub fn rotation_policy(&self) -> RotationPolicy {
        RotationPolicy::from_megabytes(self.max_size_mb, self.max_backups)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{key}: expected a non-negative integer, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.level, Level::Info);
        assert_eq!(config.path, PathBuf::from("rotalog.log"));
        assert_eq!(config.rotation_policy().max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.rotation_policy().max_backups, 5);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = LoggerConfig::from_yaml("level: warning\nmaxBackups: 2\n").unwrap();
        assert_eq!(config.level, Level::Warning);
        assert_eq!(config.max_backups, 2);
        assert_eq!(config.max_size_mb, DEFAULT_MAX_SIZE_MB);
    }

    #[test]
    fn test_yaml_roundtrip_uses_camel_case() {
        let yaml = LoggerConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("maxSizeMb: 10"));
        assert!(yaml.contains("level: info"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_LEVEL, "debug"),
            (ENV_FILE, "/tmp/other.log"),
            (ENV_MAX_SIZE_MB, "3"),
            (ENV_MAX_BACKUPS, "0"),
        ]
        .into_iter()
        .collect();
        let config = LoggerConfig::default()
            .apply_env_with(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.level, Level::Debug);
        assert_eq!(config.path, PathBuf::from("/tmp/other.log"));
        assert_eq!(config.max_size_mb, 3);
        assert_eq!(config.max_backups, 0);
    }

    #[test]
    fn test_env_rejects_garbage() {
        let err = LoggerConfig::default()
            .apply_env_with(|key| (key == ENV_MAX_SIZE_MB).then(|| "lots".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_MAX_SIZE_MB));

        let err = LoggerConfig::default()
            .apply_env_with(|key| (key == ENV_LEVEL).then(|| "loud".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validate() {
        assert!(LoggerConfig::default().validate().is_ok());
        let empty_path = LoggerConfig {
            path: PathBuf::new(),
            ..LoggerConfig::default()
        };
        assert!(empty_path.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_reports_missing_file() {
        let path = std::env::temp_dir().join(format!("rotalog-missing-{}.yaml", uuid::Uuid::new_v4()));
        let err = LoggerConfig::load(&path).await.unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[tokio::test]
    async fn test_load_file() {
        let path = std::env::temp_dir().join(format!("rotalog-config-{}.yaml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "path: /var/log/app.log\nmaxSizeMb: 1\n").unwrap();
        let config = LoggerConfig::load(&path).await.unwrap();
        assert_eq!(config.path, PathBuf::from("/var/log/app.log"));
        assert_eq!(config.max_size_mb, 1);
        std::fs::remove_file(path).unwrap();
    }
}
