// SPDX-License-Identifier: MIT
//
// Jitterpool: Blocking Entropy Pool Fed by Network Round-Trip Jitter
//
// https://github.com/yourusername/jitterpool

//! Jitterpool Stream - Continuous Entropy Driver
//!
//! Emits an unbounded stream of whitened entropy digests on stdout, in the
//! manner of `cat /dev/random`. Each iteration draws a fixed number of bits
//! from the entropy pool (blocking on network probes while the pool refills),
//! whitens them through the configured hash, and writes the raw digest block.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    sample     ┌──────────────┐    random()    ┌──────────────┐
//! │     ping     │ ─────────────>│ EntropyPool  │ ──────────────>│    stdout    │
//! │    probe     │   (latency)   │ (accumulate) │    (digest)    │  (consumer)  │
//! └──────────────┘               └──────────────┘                └──────────────┘
//! ```
//!
//! # Features
//!
//! - Blocking accumulation driven by probe round-trip jitter
//! - SHA-1 (default) or SHA-256 output whitening
//! - Raw binary or `--hex` text output
//! - Graceful SIGINT/SIGTERM shutdown with a final stats line
//! - All logging on stderr; stdout carries only the entropy stream

use anyhow::{Context, Result};
use clap::Parser;
use jitterpool_core::{
    config::StreamConfig,
    metrics::Metrics,
    pool::EntropyPool,
    source::{PingProbe, ProbeConfig},
    whiten::{encode_hex, Whitener},
};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "jitterpool-stream")]
#[command(about = "Streams whitened entropy digests fed by network jitter", long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Emit lowercase hex lines instead of raw digest bytes
    #[arg(long)]
    hex: bool,
}

/// Emit a stats line every this many digests
const STATS_EVERY: u64 = 32;

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = args
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);

    // stdout carries the entropy stream, so logs go to stderr
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Jitterpool Stream v{}", env!("CARGO_PKG_VERSION"));

    let config =
        StreamConfig::from_env().context("Failed to load configuration from environment")?;

    let whitener = Whitener::new(config.whitener);
    info!("Probe host: {}", config.probe_host);
    info!("Probe timeout: {:?}", config.probe_timeout());
    info!(
        "Whitener: {:?} ({}-byte digests)",
        config.whitener,
        whitener.digest_len()
    );
    info!("Request size: {} bits per digest", config.request_bits);
    info!("Emit interval: {:?}", config.emit_interval());

    let shutdown = Arc::new(AtomicBool::new(false));
    register_shutdown(&shutdown)?;

    let metrics = Metrics::new();
    let probe = PingProbe::new(
        ProbeConfig {
            host: config.probe_host.clone(),
            timeout: config.probe_timeout(),
        },
        metrics.clone(),
    );
    let pool = EntropyPool::new(Box::new(probe), whitener, metrics.clone());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut emitted: u64 = 0;

    while !shutdown.load(Ordering::Relaxed) {
        let digest = pool
            .random(Some(config.request_bits))
            .context("Failed to draw whitened output")?;

        if args.hex {
            writeln!(out, "{}", encode_hex(&digest)).context("Failed to write to stdout")?;
        } else {
            out.write_all(&digest).context("Failed to write to stdout")?;
        }
        out.flush().context("Failed to flush stdout")?;

        emitted += 1;
        if emitted % STATS_EVERY == 0 {
            log_stats(&metrics);
        }

        // Keeps the process responsive to the shutdown flag between draws
        std::thread::sleep(config.emit_interval());
    }

    info!("Shutdown signal received");
    log_stats(&metrics);
    info!("Stream shut down gracefully");
    Ok(())
}

fn log_stats(metrics: &Metrics) {
    info!(
        digests = metrics.digests_total(),
        rounds = metrics.rounds_total(),
        samples = metrics.samples_total(),
        failures = metrics.samples_failed(),
        bits_extracted = metrics.bits_extracted(),
        probe_p50_us = metrics.latency_p50().unwrap_or(0),
        probe_p95_us = metrics.latency_p95().unwrap_or(0),
        uptime_s = metrics.uptime_seconds(),
        "stream stats"
    );
}

#[cfg(unix)]
fn register_shutdown(flag: &Arc<AtomicBool>) -> Result<()> {
    use signal_hook::consts::signal::{SIGINT, SIGTERM};

    signal_hook::flag::register(SIGINT, Arc::clone(flag))
        .context("Failed to register SIGINT handler")?;
    signal_hook::flag::register(SIGTERM, Arc::clone(flag))
        .context("Failed to register SIGTERM handler")?;
    Ok(())
}

#[cfg(windows)]
fn register_shutdown(flag: &Arc<AtomicBool>) -> Result<()> {
    let flag = Arc::clone(flag);
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed))
        .context("Failed to register Ctrl+C handler")?;
    Ok(())
}
