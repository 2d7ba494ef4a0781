//! Runner and task errors.

use campaign_core::TaskId;
use thiserror::Error;

/// Errors returned to the caller driving a [`BackgroundTaskRunner`].
///
/// [`BackgroundTaskRunner`]: crate::BackgroundTaskRunner
#[derive(Debug, Error)]
pub enum RunnerError {
    /// `start` was called while another task is still bound to the runner.
    #[error("Runner is busy with task {task_id}; wait for completion before starting another")]
    AlreadyRunning { task_id: TaskId },

    /// The worker thread could not be spawned.
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

impl RunnerError {
    /// Returns true if the caller broke the runner's usage contract.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::AlreadyRunning { .. })
    }
}

/// Failure raised by the work itself.
///
/// Never leaves the worker thread as an error; the runner turns it into a
/// failed [`TaskOutcome`](crate::TaskOutcome).
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("{0}")]
    Failed(String),

    #[error("Invalid task argument: {0}")]
    InvalidArgument(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TaskError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
