//! Runner state machine and cancellation outcomes.

use serde::{Deserialize, Serialize};

/// Lifecycle of a [`BackgroundTaskRunner`](crate::BackgroundTaskRunner).
///
/// `Idle -> Running -> Completed`, or `Running -> CancelConfirmed -> Completed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunnerState {
    /// No task has been started yet.
    #[default]
    Idle,
    /// A worker is bound and executing.
    Running,
    /// Cancellation was confirmed; the worker has not returned yet.
    CancelConfirmed,
    /// The last task finished. A new task may be started.
    Completed,
}

impl RunnerState {
    /// Returns true while a worker is bound to the runner.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running | Self::CancelConfirmed)
    }

    /// Returns true if a new task may be started.
    pub fn can_start(&self) -> bool {
        !self.is_running()
    }
}

/// Result of [`request_cancel`](crate::BackgroundTaskRunner::request_cancel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelDecision {
    /// No task is running (never started, or already completed).
    NotRunning,
    /// Confirmation was refused; the task keeps running.
    Declined,
    /// Confirmation granted; the cancellation flag is now raised.
    Requested,
    /// Cancellation had already been confirmed for this task.
    AlreadyRequested,
}

impl CancelDecision {
    /// Returns true if the cancellation flag is raised after this decision.
    pub fn is_requested(&self) -> bool {
        matches!(self, Self::Requested | Self::AlreadyRequested)
    }
}
