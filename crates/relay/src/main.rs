//! Relay - forwards structured records to a Riemann-style collector
//!
//! Reads newline-delimited JSON records from stdin, transforms each into
//! a normalized monitoring event, and forwards it over TCP or UDP.
//!
//! # Usage
//!
//! ```bash
//! relay --config configs/relay.toml < events.jsonl
//! tail -F app.jsonl | relay --log-level debug
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use relay_config::{Config, LogConfig, LogFormat, LogOutput};
use relay_forwarder::Forwarder;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Forward newline-delimited JSON records from stdin to a monitoring collector
#[derive(Parser, Debug)]
#[command(name = "relay")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "configs/relay.toml")]
    config: PathBuf,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_file(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    let level = cli
        .log_level
        .as_deref()
        .unwrap_or_else(|| config.log.level.as_str());
    init_logging(level, &config.log)?;

    tracing::info!(
        collector = %config.forwarder.target(),
        protocol = config.forwarder.protocol.as_str(),
        resend_on_failure = config.forwarder.resend_on_failure,
        "starting relay"
    );

    // For TCP this blocks until the collector accepts
    let mut forwarder = Forwarder::connect(&config.forwarder).await;

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(record) => forwarder.deliver(&record).await,
            Err(e) => tracing::warn!(error = %e, "skipping malformed record"),
        }
    }

    let snapshot = forwarder.snapshot();
    tracing::info!(
        received = snapshot.events_received,
        rejected = snapshot.events_rejected,
        sent = snapshot.events_sent,
        dropped = snapshot.events_dropped,
        bytes = snapshot.bytes_sent,
        reconnects = snapshot.reconnects,
        "input exhausted, shutting down"
    );

    Ok(())
}

/// Initialize the tracing subscriber for logging
fn init_logging(level: &str, config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let writer = match &config.output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr),
        LogOutput::File(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("opening log file {}", path))?;
            BoxMakeWriter::new(Arc::new(file))
        }
    };

    let layer = fmt::layer().with_target(true).with_writer(writer);
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Console => registry.with(layer).init(),
        LogFormat::Json => registry.with(layer.json()).init(),
    }

    Ok(())
}
