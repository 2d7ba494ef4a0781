//! Capabilities handed to the work running on the worker thread.

use campaign_core::TaskId;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use crate::progress::ProgressReport;
use crate::TaskOutcome;

/// Message from the worker thread to the control context.
#[derive(Debug)]
pub(crate) enum WorkerMessage {
    Progress(ProgressReport),
    Finished(TaskOutcome),
}

/// Worker-side handle: cancellation polling and progress emission.
///
/// The work never sees the model; everything it reports is queued and applied
/// by the control context in emission order.
pub struct TaskContext {
    task_id: TaskId,
    token: CancellationToken,
    tx: mpsc::UnboundedSender<WorkerMessage>,
    argument: Option<Value>,
}

impl TaskContext {
    pub(crate) fn new(
        task_id: TaskId,
        token: CancellationToken,
        tx: mpsc::UnboundedSender<WorkerMessage>,
        argument: Option<Value>,
    ) -> Self {
        Self {
            task_id,
            token,
            tx,
            argument,
        }
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Argument taken from the model's context slot at start.
    pub fn argument(&self) -> Option<&Value> {
        self.argument.as_ref()
    }

    /// True once cancellation has been confirmed. Poll this at safe points
    /// and return early when it flips.
    pub fn is_cancellation_requested(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Report the current progress value and status line.
    pub fn report(&self, value: u32, status: impl Into<String>) {
        self.send(ProgressReport::Status {
            value: i64::from(value),
            status: status.into(),
        });
    }

    /// Replace the progress bounds and rewind the value to zero.
    pub fn reset_bounds(&self, minimum: u32, maximum: u32) {
        self.send(ProgressReport::reset_bounds(minimum, maximum));
    }

    /// Report a raw `(value, text)` pair as produced by host-side code.
    ///
    /// Negative values other than [`RESET_BOUNDS`](crate::RESET_BOUNDS) are
    /// dropped.
    pub fn report_raw(&self, value: i64, text: impl Into<String>) {
        match ProgressReport::decode(value, text) {
            Some(report) => self.send(report),
            None => warn!(task_id = %self.task_id, value, "Dropping progress with invalid value"),
        }
    }

    fn send(&self, report: ProgressReport) {
        if self.tx.send(WorkerMessage::Progress(report)).is_err() {
            trace!(task_id = %self.task_id, "Progress receiver dropped");
        }
    }
}
