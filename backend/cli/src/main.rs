mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use rotalog::{Level, LoggerConfig};

use config::Settings;

#[derive(Parser)]
#[command(name = "rotalog")]
#[command(about = "Append stdin to a size-rotated log file")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log every line read from stdin, then drain and exit
    Write {
        #[command(flatten)]
        settings: Settings,

        /// Level each line is logged at
        #[arg(long = "as", default_value = "info")]
        as_level: Level,
    },
    /// Print the effective configuration as YAML
    ShowConfig {
        #[command(flatten)]
        settings: Settings,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr; stdout carries command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Write { settings, as_level } => {
            let config = settings.resolve().await?;
            write_stdin(config, as_level).await?;
        }
        Commands::ShowConfig { settings } => {
            let config = settings.resolve().await?;
            print!("{}", config.to_yaml().context("Failed to render config")?);
        }
    }

    Ok(())
}

async fn write_stdin(config: LoggerConfig, level: Level) -> Result<()> {
    let logger = rotalog::global::init(&config)
        .await
        .with_context(|| format!("Failed to start logger for {}", config.path.display()))?;

    info!(
        path = %config.path.display(),
        level = %level,
        "Logging stdin"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(line) => logger.log(level, line).await,
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted, draining pending writes");
                break;
            }
        }
    }

    let stats = logger.shutdown().await;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
