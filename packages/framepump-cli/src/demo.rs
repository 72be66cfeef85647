use framepump_scheduler::{ActionResult, Disposable, MainLoopScheduler, Scheduler};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Counters shared by the demo actions.
#[derive(Debug, Default)]
pub struct Stats {
    pub heartbeats: AtomicUsize,
    pub waves: AtomicUsize,
    pub cancelled_fired: AtomicUsize,
}

#[derive(Debug, Clone)]
pub struct Heartbeat {
    pub stats: Arc<Stats>,
    pub interval: Duration,
}

fn beat(scheduler: &MainLoopScheduler, heartbeat: Heartbeat) -> ActionResult {
    let count = heartbeat.stats.heartbeats.fetch_add(1, Ordering::Relaxed) + 1;
    tracing::info!(count, "heartbeat");
    let interval = heartbeat.interval;
    Ok(Some(scheduler.schedule_after(interval, heartbeat, beat)))
}

/// Installs the demo workload and returns the heartbeat handle.
///
/// - a heartbeat that reschedules itself every `interval`
/// - a few one-shot "waves" at staggered delays
/// - a timer that is cancelled before it can fire
/// - a timer that stops the heartbeat chain after `stop_after`
pub fn install(
    scheduler: &MainLoopScheduler,
    stats: &Arc<Stats>,
    interval: Duration,
    stop_after: Duration,
) -> Disposable {
    let heartbeat = scheduler.schedule(
        Heartbeat {
            stats: stats.clone(),
            interval,
        },
        beat,
    );

    for wave in 1..=3u32 {
        scheduler.schedule_after(interval * wave * 2, (stats.clone(), wave), |_, (stats, wave)| {
            stats.waves.fetch_add(1, Ordering::Relaxed);
            tracing::info!(wave, "wave spawned");
            Ok(None)
        });
    }

    let doomed = scheduler.schedule_after(interval, stats.clone(), |_, stats| {
        stats.cancelled_fired.fetch_add(1, Ordering::Relaxed);
        tracing::error!("cancelled timer fired");
        Ok(None)
    });
    doomed.dispose();

    scheduler.schedule_after(stop_after, heartbeat.clone(), |_, heartbeat| {
        tracing::info!("stopping heartbeat");
        heartbeat.dispose();
        Ok(None)
    });

    heartbeat
}
