//! Latchkey daemon binary.
//!
//! This file is intentionally thin: it sets up tracing, loads and validates
//! the controller configuration, wires the mock device suite, and runs the
//! control loop until ctrl-c. Until real reader hardware is wired in, tag
//! scans are presented interactively: each line of hex on stdin is placed in
//! the mock reader's field.
//!
//! # Usage
//!
//! ```bash
//! # Run with the built-in bench-unit configuration
//! latchkeyd
//!
//! # Run with a config file and verbose logging
//! latchkeyd --config latchkey.json --log-level debug
//!
//! # Then present a tag by typing its UID
//! 85CEDBD1
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use latchkey_controller::{ControlLoop, ControllerConfig};
use latchkey_hardware::mock::{
    MockIndicatorPanel, MockLockServo, MockProximityReader, MockReaderHandle,
};

/// Latchkey lock controller daemon
#[derive(Parser, Debug)]
#[command(name = "latchkeyd")]
#[command(about = "NFC safe-lock controller")]
#[command(version)]
struct Args {
    /// Path to a JSON configuration file (defaults to the built-in config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let config = load_config(args.config.as_deref())?;
    if config.allow_list()?.is_empty() {
        warn!("allow-list is empty: every scan will be rejected");
    }
    info!(
        "controller config: {} enrolled tag(s), open for {}ms, polling every {}ms",
        config.allowed_tags.len(),
        config.open_duration_ms,
        config.poll_interval_ms
    );

    let (reader, reader_handle) = MockProximityReader::new();
    let (servo, _servo_handle) = MockLockServo::new();
    let (panel, _panel_handle) = MockIndicatorPanel::new();

    let mut controller = ControlLoop::new(&config, reader, servo, panel)
        .context("failed to assemble control loop")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut controller_task = tokio::spawn(async move { controller.run(shutdown_rx).await });
    let scan_task = tokio::spawn(scan_input_loop(reader_handle));

    info!("latchkeyd running, type a tag UID in hex to scan it (ctrl-c to stop)");

    tokio::select! {
        result = &mut controller_task => {
            scan_task.abort();
            result.context("control loop task panicked")??;
            anyhow::bail!("control loop stopped without a shutdown signal");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("ctrl-c received, shutting down");
            shutdown_tx.send(true).ok();
            scan_task.abort();
            controller_task.await.context("control loop task panicked")??;
        }
    }

    info!("latchkeyd stopped");
    Ok(())
}

/// Load configuration from `path`, or the built-in defaults without one.
fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<ControllerConfig> {
    let config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => ControllerConfig::default(),
    };
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Feed hex UIDs typed on stdin into the mock reader's field.
///
/// Any even number of hex digits is accepted, including lengths the matcher
/// will reject, so wrong-length behavior can be exercised from the console.
async fn scan_input_loop(handle: MockReaderHandle) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_hex_uid(line) {
            Ok(uid) => {
                if let Err(e) = handle.present_tag(uid).await {
                    error!("mock reader is gone: {}", e);
                    return;
                }
            }
            Err(message) => warn!("ignoring input {:?}: {}", line, message),
        }
    }
}

/// Parse a hex string into raw UID bytes of any length.
fn parse_hex_uid(s: &str) -> Result<Vec<u8>, String> {
    if !s.is_ascii() {
        return Err("not ASCII hex".to_string());
    }
    if s.len() % 2 != 0 {
        return Err("odd number of hex digits".to_string());
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&s[i..i + 2], 16)
                .map_err(|_| format!("invalid hex byte {:?}", &s[i..i + 2]))
        })
        .collect()
}
