mod demo;

use anyhow::{Context, Result};
use clap::Parser;
use framepump_scheduler::{MainLoopScheduler, MonotonicClock, SchedulerConfig};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "framepump")]
#[command(about = "Pump a scheduler from a fixed-rate frame loop", long_about = None)]
struct Cli {
    /// Frames per second of the simulated host loop
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
    fps: u32,

    /// Number of frames to run
    #[arg(long, default_value_t = 180)]
    frames: u64,

    /// Heartbeat interval in milliseconds
    #[arg(long, default_value_t = 250)]
    heartbeat_ms: u64,

    /// Stop the heartbeat after this many milliseconds
    #[arg(long, default_value_t = 2000)]
    stop_after_ms: u64,

    /// Maximum actions run per frame (unbounded when omitted)
    #[arg(long)]
    budget: Option<usize>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log: String,
}

fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .with_context(|| format!("invalid log filter '{default_filter}'"))?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log)?;

    let config = SchedulerConfig {
        max_actions_per_drain: cli.budget,
    };
    let scheduler = MainLoopScheduler::with_config(MonotonicClock, config);
    let stats = Arc::new(demo::Stats::default());

    let heartbeat = demo::install(
        &scheduler,
        &stats,
        Duration::from_millis(cli.heartbeat_ms),
        Duration::from_millis(cli.stop_after_ms),
    );

    let frame_time = Duration::from_secs(1) / cli.fps;
    let started = Instant::now();
    let mut invoked = 0;

    tracing::info!(fps = cli.fps, frames = cli.frames, "host loop starting");

    for frame in 0..cli.frames {
        let frame_start = Instant::now();

        let report = scheduler
            .drain()
            .with_context(|| format!("drain failed on frame {frame}"))?;
        invoked += report.invoked;
        if report.invoked > 0 {
            tracing::debug!(frame, ?report, "frame drained");
        }

        // The host paces itself; the scheduler never sleeps.
        if let Some(rest) = frame_time.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    let pending = scheduler.len();
    tracing::info!(
        elapsed = ?started.elapsed(),
        invoked,
        pending,
        heartbeat_stopped = heartbeat.is_disposed(),
        "host loop finished"
    );

    println!(
        "frames: {}, actions run: {}, heartbeats: {}, waves: {}, cancelled timers fired: {}, still pending: {}",
        cli.frames,
        invoked,
        stats.heartbeats.load(Ordering::Relaxed),
        stats.waves.load(Ordering::Relaxed),
        stats.cancelled_fired.load(Ordering::Relaxed),
        pending,
    );

    Ok(())
}
