pub mod clock;
pub mod disposable;
pub mod error;
pub mod item;
pub mod queue;
pub mod scheduler;
pub mod time;

mod sync;

pub use clock::{Clock, ManualClock, MonotonicClock, SystemClock, Timestamp};
pub use disposable::Disposable;
pub use error::{ActionError, QueueError, SchedulerError};
pub use item::ScheduledItem;
pub use queue::PriorityQueue;
pub use scheduler::{DrainReport, MainLoopScheduler, SchedulerConfig};
pub use time::{Delay, normalize};

/// What an action hands back: optionally the handle of work it scheduled
/// (usually itself, rescheduled), or an error that aborts the current drain.
pub type ActionResult = Result<Option<Disposable>, ActionError>;

/// The scheduling seam.
///
/// Implementors supply a time source and `schedule_at`; immediate and
/// relative scheduling are derived from those two.
pub trait Scheduler: Sized + 'static {
    type Instant: Timestamp;

    /// Current time. Every due-time comparison uses this source.
    fn now(&self) -> Self::Instant;

    /// Schedule `action` to run with `state` once `due_time` has passed.
    /// Due times in the past are legal and run on the next drain.
    fn schedule_at<T, F>(&self, due_time: Self::Instant, state: T, action: F) -> Disposable
    where
        T: Send + 'static,
        F: FnOnce(&Self, T) -> ActionResult + Send + 'static;

    /// Schedule `action` to run as soon as possible.
    fn schedule<T, F>(&self, state: T, action: F) -> Disposable
    where
        T: Send + 'static,
        F: FnOnce(&Self, T) -> ActionResult + Send + 'static,
    {
        self.schedule_at(self.now(), state, action)
    }

    /// Schedule `action` to run after `delay`. Negative delays behave like
    /// [`Scheduler::schedule`].
    fn schedule_after<D, T, F>(&self, delay: D, state: T, action: F) -> Disposable
    where
        D: Into<Delay>,
        T: Send + 'static,
        F: FnOnce(&Self, T) -> ActionResult + Send + 'static,
    {
        let due_time = self.now().saturating_add(normalize(delay));
        self.schedule_at(due_time, state, action)
    }
}
