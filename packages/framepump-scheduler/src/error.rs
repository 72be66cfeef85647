use thiserror::Error;

/// Error type returned by a failing action.
pub type ActionError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("priority queue is empty")]
    Empty,
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    /// An action returned an error. The drain pass that ran it stopped there.
    #[error("scheduled action #{sequence} failed")]
    Action {
        sequence: u64,
        #[source]
        source: ActionError,
    },
}
