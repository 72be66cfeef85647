use std::cmp::Ordering;
use std::fmt;

use crate::disposable::Disposable;
use crate::error::ActionError;
use crate::{ActionResult, Scheduler};

type Invocation<S> = Box<dyn FnOnce(&S) -> ActionResult + Send>;

/// One pending unit of work.
///
/// Items are ordered by due time, then by sequence number, so items due at the
/// same instant run in the order they were scheduled.
pub struct ScheduledItem<S: Scheduler> {
    due_time: S::Instant,
    sequence: u64,
    invocation: Invocation<S>,
    disposable: Disposable,
}

impl<S: Scheduler> ScheduledItem<S> {
    pub fn new<T, F>(due_time: S::Instant, sequence: u64, state: T, action: F) -> Self
    where
        T: Send + 'static,
        F: FnOnce(&S, T) -> ActionResult + Send + 'static,
    {
        Self {
            due_time,
            sequence,
            invocation: Box::new(move |scheduler: &S| action(scheduler, state)),
            disposable: Disposable::new(),
        }
    }

    pub fn due_time(&self) -> S::Instant {
        self.due_time
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn disposable(&self) -> &Disposable {
        &self.disposable
    }

    pub fn is_cancelled(&self) -> bool {
        self.disposable.is_disposed()
    }

    /// Runs the action. A handle returned by the action is chained onto this
    /// item's handle, so disposing the original also stops the follow-up.
    pub fn invoke(self, scheduler: &S) -> Result<(), ActionError> {
        let ScheduledItem {
            invocation,
            disposable,
            ..
        } = self;

        if let Some(next) = invocation(scheduler)? {
            disposable.chain(next);
        }
        Ok(())
    }
}

impl<S: Scheduler> PartialEq for ScheduledItem<S> {
    fn eq(&self, other: &Self) -> bool {
        self.due_time == other.due_time && self.sequence == other.sequence
    }
}

impl<S: Scheduler> Eq for ScheduledItem<S> {}

impl<S: Scheduler> PartialOrd for ScheduledItem<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: Scheduler> Ord for ScheduledItem<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due_time
            .cmp(&other.due_time)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl<S: Scheduler> fmt::Debug for ScheduledItem<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledItem")
            .field("due_time", &self.due_time)
            .field("sequence", &self.sequence)
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}
