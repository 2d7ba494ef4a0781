//! Campaign Live background task runner.
//!
//! Runs one long unit of work on a dedicated thread while the caller's
//! control context stays the only writer of the task's [`ProgressTaskModel`].
//! The worker talks back over a FIFO channel; cancellation is cooperative and
//! gated behind a yes/no confirmation.

pub mod confirm;
pub mod context;
pub mod error;
pub mod model;
pub mod progress;
pub mod runner;
pub mod status;

pub use confirm::{AutoConfirm, CancelConfirmation, DeclineAll};
pub use context::TaskContext;
pub use error::{RunnerError, TaskError};
pub use model::{ProgressSnapshot, ProgressTaskModel, TaskOutcome};
pub use progress::{ProgressReport, RESET_BOUNDS};
pub use runner::{BackgroundTaskRunner, RunnerEvent, TaskObserver};
pub use status::{CancelDecision, RunnerState};
