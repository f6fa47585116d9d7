use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use rotalog::{Level, LoggerConfig};
use tracing::debug;

/// Config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Settings shared by every subcommand. Flags win over the environment,
/// which wins over the config file.
#[derive(Debug, Default, Args)]
pub struct Settings {
    /// YAML config file (default: $ROTALOG_CONFIG or ~/.rotalog/config.yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Minimum level written to the file
    #[arg(long)]
    pub level: Option<Level>,

    /// Log file path
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Rotate once the file reaches this many MiB
    #[arg(long)]
    pub max_size_mb: Option<u64>,

    /// Number of backup generations to keep
    #[arg(long)]
    pub max_backups: Option<usize>,
}

/// Resolve the default config file.
/// Priority: `ROTALOG_CONFIG` env > `~/.rotalog/config.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("ROTALOG_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".rotalog").join(CONFIG_FILE_NAME))
}

impl Settings {
    /// Build the effective logger configuration.
    pub async fn resolve(&self) -> Result<LoggerConfig> {
        let base = match &self.config {
            Some(path) => load(path).await?,
            None => match default_config_path() {
                Some(path) if path.exists() => load(&path).await?,
                _ => {
                    debug!("No config file; using defaults");
                    LoggerConfig::default()
                }
            },
        };

        let config = self.apply(base.apply_env()?);
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of `config`.
    pub fn apply(&self, mut config: LoggerConfig) -> LoggerConfig {
        if let Some(level) = self.level {
            config.level = level;
        }
        if let Some(file) = &self.file {
            config.path = file.clone();
        }
        if let Some(max_size_mb) = self.max_size_mb {
            config.max_size_mb = max_size_mb;
        }
        if let Some(max_backups) = self.max_backups {
            config.max_backups = max_backups;
        }
        config
    }
}

async fn load(path: &Path) -> Result<LoggerConfig> {
    LoggerConfig::load(path)
        .await
        .with_context(|| format!("Failed to load config: {}", path.display()))
}
