//! # MADS Replay
//!
//! Replays a recorded drive trace (JSON lines of per-cycle input frames)
//! through one arbitration session and reports how the lateral decision
//! behaved: cycles allowed, grants, withdrawals per reason, supervisory
//! echo mismatches and invariant violations.
//!
//! Exits with status 1 on any load/parse failure or invariant violation.

use clap::Parser;
use mads_common::config::{ConfigError, LogLevel};
use mads_common::consts::DEFAULT_CONFIG_PATH;
use mads_common::mads::config::MadsConfig;
use mads_core::Mads;
use mads_core::config::load_config;
use mads_core::replay::{ReplayStats, replay_trace};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// MADS Replay: run a drive trace through the lateral arbitration core
#[derive(Parser, Debug)]
#[command(name = "mads_replay")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Replay a drive trace through the MADS lateral-control arbitration core")]
struct Args {
    /// Path to the JSON-lines trace (one input frame per line).
    trace: PathBuf,

    /// Path to the MADS configuration TOML.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override `session.enabled` from the config file.
    #[arg(long)]
    enabled: Option<bool>,

    /// Override `session.disengage_on_brake` from the config file.
    #[arg(long)]
    disengage_on_brake: Option<bool>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,

    /// Print the final statistics as JSON on stdout.
    #[arg(long)]
    stats_json: bool,
}

fn main() {
    let args = Args::parse();
    let config = load_config(&args.config);
    setup_tracing(&args, config.as_ref().ok().map(|c| c.shared.log_level));

    info!("MADS Replay v{} starting...", env!("CARGO_PKG_VERSION"));

    match run(&args, config) {
        Ok(stats) if stats.passed() => info!("Replay passed"),
        Ok(stats) => {
            error!(
                "Replay failed: {} invariant violation(s)",
                stats.invariant_violations
            );
            process::exit(1);
        }
        Err(e) => {
            error!("FATAL: {e}");
            process::exit(1);
        }
    }
}

fn run(
    args: &Args,
    config: Result<MadsConfig, ConfigError>,
) -> Result<ReplayStats, Box<dyn std::error::Error>> {
    let mut config = config.map_err(|e| format!("{}: {e}", args.config.display()))?;
    if let Some(enabled) = args.enabled {
        config.session.enabled = enabled;
    }
    if let Some(on) = args.disengage_on_brake {
        config.session.disengage_on_brake = on;
    }

    info!(
        "Config OK: service={}, enabled={}, disengage_on_brake={}, scheme={:?}",
        config.shared.service_name,
        config.session.enabled,
        config.session.disengage_on_brake,
        config.session.button_scheme,
    );
    if !config.session.enabled {
        warn!("Session disabled: lateral control will never be allowed");
    }

    let trace = File::open(&args.trace)
        .map_err(|e| format!("failed to open {}: {e}", args.trace.display()))?;
    let stats = replay_trace(Mads::from_config(&config), BufReader::new(trace))?;

    report(&stats);
    if args.stats_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }
    Ok(stats)
}

fn report(stats: &ReplayStats) {
    info!("total cycles: {}", stats.cycles);
    info!("cycles with lateral allowed: {}", stats.lat_allowed_cycles);
    info!("lateral grants: {}", stats.grants);
    for (reason, count) in &stats.withdrawals {
        info!("withdrawn ({reason}): {count}");
    }
    if stats.echo_mismatch_cycles > 0 {
        warn!(
            "controls allowed but lateral denied for {} cycle(s)",
            stats.echo_mismatch_cycles
        );
    }
    info!("invariant violations: {}", stats.invariant_violations);
}

/// Setup tracing subscriber based on CLI arguments and the config log level.
fn setup_tracing(args: &Args, configured: Option<LogLevel>) {
    let directive = if args.verbose {
        LogLevel::Debug.as_directive()
    } else {
        configured.unwrap_or_default().as_directive()
    };

    let filter = EnvFilter::from_default_env().add_directive(
        directive
            .parse()
            .unwrap_or_else(|_| tracing::Level::INFO.into()),
    );

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
