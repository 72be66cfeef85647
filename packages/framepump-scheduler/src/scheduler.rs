use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;

use crate::clock::{Clock, MonotonicClock};
use crate::disposable::Disposable;
use crate::error::SchedulerError;
use crate::item::ScheduledItem;
use crate::queue::PriorityQueue;
use crate::sync::lock;
use crate::{ActionResult, Scheduler};

type Queue<C> = Mutex<PriorityQueue<ScheduledItem<MainLoopScheduler<C>>>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Upper bound on actions invoked by one `drain` call. Due work past the
    /// limit stays queued for the next call. `None` drains everything due.
    pub max_actions_per_drain: Option<usize>,
}

/// Counts from one `drain` pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Actions that ran.
    pub invoked: usize,
    /// Due entries dropped because their handle was disposed.
    pub skipped: usize,
    /// Due entries scheduled after the pass started, left for the next pass.
    pub deferred: usize,
}

/// Scheduler pumped by a host loop.
///
/// Nothing runs on its own: the host calls [`MainLoopScheduler::drain`] (for
/// example once per frame) and every entry whose due time has passed runs on
/// the calling thread, in due-time order. Scheduling is safe from any thread,
/// and from inside a running action.
///
/// Dropping the scheduler discards pending entries without running them.
pub struct MainLoopScheduler<C: Clock = MonotonicClock> {
    clock: C,
    config: SchedulerConfig,
    queue: Queue<C>,
    next_sequence: AtomicU64,
}

impl MainLoopScheduler<MonotonicClock> {
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock)
    }
}

impl Default for MainLoopScheduler<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MainLoopScheduler<C> {
    pub fn with_clock(clock: C) -> Self {
        Self::with_config(clock, SchedulerConfig::default())
    }

    pub fn with_config(clock: C, config: SchedulerConfig) -> Self {
        Self {
            clock,
            config,
            queue: Mutex::new(PriorityQueue::new()),
            next_sequence: AtomicU64::new(0),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> SchedulerConfig {
        self.config
    }

    /// Number of pending entries, cancelled ones included until drained.
    pub fn len(&self) -> usize {
        lock(&self.queue).len()
    }

    pub fn is_idle(&self) -> bool {
        lock(&self.queue).is_empty()
    }

    /// Due time of the earliest pending entry. Hosts that can sleep between
    /// frames may use it to decide how long.
    pub fn next_due(&self) -> Option<C::Instant> {
        lock(&self.queue).peek().ok().map(ScheduledItem::due_time)
    }

    /// Discards every pending entry without running it. Returns how many were
    /// dropped.
    pub fn clear(&self) -> usize {
        let mut queue = lock(&self.queue);
        let discarded = queue.len();
        queue.clear();
        tracing::debug!(discarded, "MainLoopScheduler::clear");
        discarded
    }

    /// Runs every entry that is due now, then returns.
    ///
    /// Never waits for future entries. The queue lock is released around each
    /// invocation, so actions may schedule more work (including themselves).
    /// Work scheduled after this call started is left for the next call.
    ///
    /// An action error stops the pass and is returned; entries that already
    /// ran stay consumed and everything else stays queued.
    pub fn drain(&self) -> Result<DrainReport, SchedulerError> {
        let watermark = self.next_sequence.load(Ordering::Acquire);
        let mut report = DrainReport::default();
        let mut deferred = Deferred {
            queue: &self.queue,
            items: SmallVec::new(),
        };

        loop {
            if self
                .config
                .max_actions_per_drain
                .is_some_and(|limit| report.invoked >= limit)
            {
                tracing::trace!(invoked = report.invoked, "drain budget exhausted");
                break;
            }

            let item = {
                let mut queue = lock(&self.queue);
                let Ok(next) = queue.peek() else {
                    break;
                };
                if next.due_time() > self.clock.now() {
                    break;
                }
                let Ok(item) = queue.dequeue() else {
                    break;
                };
                item
            };

            if item.sequence() >= watermark {
                report.deferred += 1;
                deferred.items.push(item);
                continue;
            }

            if item.is_cancelled() {
                tracing::debug!(sequence = item.sequence(), "skipping cancelled entry");
                report.skipped += 1;
                continue;
            }

            let sequence = item.sequence();
            tracing::trace!(sequence, due_time = ?item.due_time(), "invoking entry");
            report.invoked += 1;

            if let Err(source) = item.invoke(self) {
                tracing::warn!(sequence, error = %source, "scheduled action failed");
                return Err(SchedulerError::Action { sequence, source });
            }
        }

        if report != DrainReport::default() {
            tracing::debug!(
                invoked = report.invoked,
                skipped = report.skipped,
                deferred = report.deferred,
                "drain pass complete"
            );
        }

        Ok(report)
    }
}

impl<C: Clock> Scheduler for MainLoopScheduler<C> {
    type Instant = C::Instant;

    fn now(&self) -> C::Instant {
        self.clock.now()
    }

    fn schedule_at<T, F>(&self, due_time: C::Instant, state: T, action: F) -> Disposable
    where
        T: Send + 'static,
        F: FnOnce(&Self, T) -> ActionResult + Send + 'static,
    {
        let sequence = self.next_sequence.fetch_add(1, Ordering::AcqRel);
        let item = ScheduledItem::new(due_time, sequence, state, action);
        let disposable = item.disposable().clone();

        tracing::debug!(sequence, due_time = ?due_time, "MainLoopScheduler::schedule_at");
        lock(&self.queue).enqueue(item);

        disposable
    }
}

impl<C: Clock + fmt::Debug> fmt::Debug for MainLoopScheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MainLoopScheduler")
            .field("clock", &self.clock)
            .field("config", &self.config)
            .field("pending", &self.len())
            .field("next_sequence", &self.next_sequence.load(Ordering::Relaxed))
            .finish()
    }
}

/// Entries pulled out of the queue but held back for a later pass.
/// Returned to the queue on drop, so an error or a panicking action does not
/// lose them.
struct Deferred<'a, C: Clock> {
    queue: &'a Queue<C>,
    items: SmallVec<[ScheduledItem<MainLoopScheduler<C>>; 4]>,
}

impl<C: Clock> Drop for Deferred<'_, C> {
    fn drop(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let mut queue = lock(self.queue);
        for item in self.items.drain(..) {
            queue.enqueue(item);
        }
    }
}
