//! `monsync` -- sync monitoring rules from a threshold table.
//!
//! Reads the threshold table, compiles the desired monitors and reconciles
//! them with the monitors configured on Datadog.
//!
//! # Configuration
//!
//! See [`monsync::config`]. Credentials usually come from the environment:
//!
//! | Variable                   | Required | Default                     |
//! |----------------------------|----------|-----------------------------|
//! | `MONSYNC_DATADOG__API_KEY` | yes      | --                          |
//! | `MONSYNC_DATADOG__APP_KEY` | yes      | --                          |
//! | `MONSYNC_DATADOG__ENDPOINT`| no       | `https://api.datadoghq.com` |
//! | `MONSYNC_INPUT`            | no       | `threshold_sample.csv`      |

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use monsync::{Settings, SyncMode};

#[derive(Parser, Debug)]
#[command(name = "monsync", version)]
#[command(about = "Sync Datadog monitors with a threshold table")]
struct Args {
    /// Path to a TOML config file (default: ./monsync.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Threshold table to read, overriding the configured one
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Print the planned changes without applying them
    #[arg(long)]
    dry_run: bool,

    /// Print the final report as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "monsync=info,monsync_adapters=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut settings = Settings::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(input) = args.input {
        settings.input = input;
    }

    let mode = if args.dry_run {
        SyncMode::DryRun
    } else {
        SyncMode::Apply
    };

    let report = monsync::run(&settings, mode)
        .await
        .with_context(|| format!("syncing monitors from {}", settings.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if report.has_failures() {
        tracing::warn!(
            failed = report.failures().count(),
            "Some monitors could not be synced"
        );
    }

    Ok(())
}
