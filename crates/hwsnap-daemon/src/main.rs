//! hwsnap daemon
//!
//! Samples CPU, GPU and RAM sensors once per interval and writes a plain
//! text report to the terminal.

mod config;
mod display;
mod monitor;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hwsnap_core::{FixtureSource, HardwareSource, ReportBuilder, ReportProfile, SystemSource};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use display::TerminalSurface;
use monitor::Monitor;

#[derive(Parser)]
#[command(name = "hwsnapd")]
#[command(about = "Samples hardware sensors and prints a CPU/GPU/RAM report")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults apply when it does not exist)
    #[arg(short, long, default_value = "config/default.toml")]
    config: PathBuf,

    /// Report profile: standard, legacy
    #[arg(long)]
    profile: Option<String>,

    /// Replay a snapshot file instead of reading the machine
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Sampling interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Print one report and exit
    #[arg(long)]
    once: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one raw snapshot as JSON
    Snapshot,
    /// Write the effective configuration (file plus flags) as TOML
    WriteConfig {
        /// Destination file
        path: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout is reserved for reports
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .init();

    // Load configuration
    let mut config = Config::load_or_default(&cli.config).context("Failed to load configuration")?;
    apply_overrides(&mut config, &cli)?;

    if let Some(Commands::WriteConfig { path }) = &cli.command {
        config.save(path)?;
        info!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    let mut source = create_source(&config);

    if let Some(Commands::Snapshot) = cli.command {
        source.open()?;
        source.refresh()?;
        let json = serde_json::to_string_pretty(&source.snapshot())
            .context("Failed to serialize snapshot")?;
        println!("{}", json);
        source.close();
        return Ok(());
    }

    let builder = ReportBuilder::new(config.report_profile()?);
    let surface = TerminalSurface::stdout(config.display.clear && !cli.once);
    let mut monitor = Monitor::new(source, builder, Box::new(surface));
    monitor.start()?;

    if cli.once {
        let result = monitor.run_once();
        monitor.stop();
        return result;
    }

    info!("Sampling every {} ms", config.interval_ms);
    monitor
        .run(Duration::from_millis(config.interval_ms), shutdown_signal())
        .await;

    info!("Stopped");
    Ok(())
}

/// Applies command line flags on top of the configuration file.
fn apply_overrides(config: &mut Config, cli: &Cli) -> Result<()> {
    if let Some(profile) = &cli.profile {
        profile
            .parse::<ReportProfile>()
            .context("Invalid --profile")?;
        config.report.profile = profile.clone();
    }
    if let Some(fixture) = &cli.fixture {
        config.source.fixture = Some(fixture.clone());
    }
    if let Some(interval) = cli.interval_ms {
        config.interval_ms = interval;
    }
    config.validate()
}

fn create_source(config: &Config) -> Box<dyn HardwareSource> {
    match &config.source.fixture {
        Some(path) => {
            let source = FixtureSource::new(path);
            info!("Replaying snapshots from {}", source.path().display());
            Box::new(source)
        }
        None => Box::new(SystemSource::with_drm_root(&config.source.drm_root)),
    }
}

/// Completes on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let mut sigterm =
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(signal) => signal,
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
                info!("Received SIGINT, shutting down");
                return;
            }
        };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received SIGINT, shutting down");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
