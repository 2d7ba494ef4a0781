//! Background task runner bound to one progress model at a time.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use campaign_core::TaskId;
use serde_json::Value;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::confirm::CancelConfirmation;
use crate::context::{TaskContext, WorkerMessage};
use crate::{
    CancelDecision, ProgressSnapshot, ProgressTaskModel, RunnerError, RunnerState, TaskError,
    TaskOutcome,
};

/// Notification produced while the control context applies worker messages.
#[derive(Debug, Clone, PartialEq)]
pub enum RunnerEvent {
    /// The model changed after a progress message.
    ProgressChanged(ProgressSnapshot),
    /// The task finished. Emitted exactly once per task.
    Completed {
        task_id: TaskId,
        outcome: TaskOutcome,
        canceled: bool,
    },
}

/// Observer notified from the control context, in event order.
pub trait TaskObserver: Send {
    fn on_progress(&mut self, _snapshot: &ProgressSnapshot) {}

    fn on_completed(&mut self, _task_id: &TaskId, _outcome: &TaskOutcome, _canceled: bool) {}
}

/// Worker currently bound to the runner.
struct ActiveTask {
    task_id: TaskId,
    token: CancellationToken,
    rx: mpsc::UnboundedReceiver<WorkerMessage>,
    handle: Option<JoinHandle<()>>,
}

/// Runs one unit of work at a time on a dedicated thread.
///
/// The runner lives on the control context and is the only writer of its
/// [`ProgressTaskModel`]. Worker messages are applied by [`next_event`] or
/// [`pump`], in the order the worker sent them. Cancellation raises a flag the
/// work polls through [`TaskContext::is_cancellation_requested`]; the thread is
/// never interrupted.
///
/// [`next_event`]: Self::next_event
/// [`pump`]: Self::pump
pub struct BackgroundTaskRunner {
    state: RunnerState,
    model: ProgressTaskModel,
    confirmation: Box<dyn CancelConfirmation>,
    cancel_confirmed: bool,
    active: Option<ActiveTask>,
    observers: Vec<Box<dyn TaskObserver>>,
}

impl BackgroundTaskRunner {
    /// Create an idle runner that asks `confirmation` before canceling.
    pub fn new(confirmation: impl CancelConfirmation + 'static) -> Self {
        Self {
            state: RunnerState::Idle,
            model: ProgressTaskModel::default(),
            confirmation: Box::new(confirmation),
            cancel_confirmed: false,
            active: None,
            observers: Vec::new(),
        }
    }

    /// Replace the confirmation policy used by later cancel requests.
    pub fn set_confirmation(&mut self, confirmation: impl CancelConfirmation + 'static) {
        self.confirmation = Box::new(confirmation);
    }

    /// Register an observer for progress and completion events.
    pub fn subscribe(&mut self, observer: impl TaskObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn model(&self) -> &ProgressTaskModel {
        &self.model
    }

    /// Id of the bound task, if one is running.
    pub fn task_id(&self) -> Option<&TaskId> {
        self.active.as_ref().map(|active| &active.task_id)
    }

    /// Start `work` on a new thread, bound to `model`.
    ///
    /// Fails with [`RunnerError::AlreadyRunning`] if a task is still bound;
    /// the running task is left untouched.
    pub fn start<W>(&mut self, work: W, mut model: ProgressTaskModel) -> Result<TaskId, RunnerError>
    where
        W: FnOnce(TaskContext) -> Result<Value, TaskError> + Send + 'static,
    {
        if let Some(active) = &self.active {
            error!(
                task_id = %active.task_id,
                state = ?self.state,
                "start called while a task is running"
            );
            return Err(RunnerError::AlreadyRunning {
                task_id: active.task_id.clone(),
            });
        }

        let task_id = TaskId::generate();
        let token = CancellationToken::new();
        let (tx, rx) = mpsc::unbounded_channel();

        model.begin();
        let ctx = TaskContext::new(
            task_id.clone(),
            token.clone(),
            tx.clone(),
            model.context().cloned(),
        );

        let handle = thread::Builder::new()
            .name(format!("campaign-task-{}", short_id(&task_id)))
            .spawn(move || run_worker(work, ctx, tx))?;

        info!(task_id = %task_id, title = %model.title(), "Background task started");

        self.model = model;
        self.cancel_confirmed = false;
        self.state = RunnerState::Running;
        self.active = Some(ActiveTask {
            task_id: task_id.clone(),
            token,
            rx,
            handle: Some(handle),
        });

        Ok(task_id)
    }

    /// Ask for the running task to stop.
    ///
    /// The confirmation policy is consulted at most once per task; after a
    /// confirmed request, further calls re-raise the flag without asking.
    pub fn request_cancel(&mut self) -> CancelDecision {
        let Some(active) = &self.active else {
            debug!(state = ?self.state, "Cancel requested with no running task");
            return CancelDecision::NotRunning;
        };
        if self.model.is_completed() {
            return CancelDecision::NotRunning;
        }

        let token = active.token.clone();
        let task_id = active.task_id.clone();

        if self.cancel_confirmed {
            token.cancel();
            return CancelDecision::AlreadyRequested;
        }

        if !self.confirmation.confirm(&self.model) {
            info!(task_id = %task_id, "Cancellation declined, task continues");
            return CancelDecision::Declined;
        }

        self.cancel_confirmed = true;
        token.cancel();
        self.model.mark_canceled();
        self.state = RunnerState::CancelConfirmed;
        info!(task_id = %task_id, "Cancellation confirmed");

        CancelDecision::Requested
    }

    /// Ask whether the owner may close while a task might be running.
    ///
    /// Closing a running task counts as a cancel request. Returns false while
    /// confirmation is refused; once confirmed the close may proceed and the
    /// worker has been asked to stop.
    pub fn request_close(&mut self) -> bool {
        match self.request_cancel() {
            CancelDecision::Declined => {
                info!("Close rejected while task is running");
                false
            }
            CancelDecision::NotRunning
            | CancelDecision::Requested
            | CancelDecision::AlreadyRequested => true,
        }
    }

    /// Wait for the next worker message, apply it and return the event.
    ///
    /// Returns `None` when no task is bound.
    pub async fn next_event(&mut self) -> Option<RunnerEvent> {
        loop {
            let active = self.active.as_mut()?;
            match active.rx.recv().await {
                Some(message) => {
                    if let Some(event) = self.apply(message) {
                        return Some(event);
                    }
                }
                None => return self.worker_vanished(),
            }
        }
    }

    /// Apply every queued worker message without waiting.
    pub fn pump(&mut self) -> Vec<RunnerEvent> {
        let mut events = Vec::new();
        while let Some(active) = self.active.as_mut() {
            match active.rx.try_recv() {
                Ok(message) => events.extend(self.apply(message)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    events.extend(self.worker_vanished());
                    break;
                }
            }
        }
        events
    }

    /// Drive events until the bound task completes and return its outcome.
    ///
    /// With no task bound, returns the outcome of the last task, if any.
    pub async fn wait_for_completion(&mut self) -> Option<TaskOutcome> {
        while let Some(event) = self.next_event().await {
            if let RunnerEvent::Completed { outcome, .. } = event {
                return Some(outcome);
            }
        }
        self.model.result().cloned()
    }

    fn apply(&mut self, message: WorkerMessage) -> Option<RunnerEvent> {
        match message {
            WorkerMessage::Progress(report) => {
                self.model.apply_report(report);
                let snapshot = self.model.snapshot();
                for observer in &mut self.observers {
                    observer.on_progress(&snapshot);
                }
                Some(RunnerEvent::ProgressChanged(snapshot))
            }
            WorkerMessage::Finished(outcome) => self.complete(outcome),
        }
    }

    fn complete(&mut self, outcome: TaskOutcome) -> Option<RunnerEvent> {
        if !self.model.mark_completed(outcome.clone()) {
            return None;
        }

        let mut active = self.active.take()?;
        // Join only a finished worker; one still returning from `run_worker`
        // is detached.
        if let Some(handle) = active.handle.take() {
            if !handle.is_finished() {
                debug!(task_id = %active.task_id, "Worker thread still unwinding, detached");
            } else if handle.join().is_err() {
                warn!(task_id = %active.task_id, "Worker thread panicked after reporting");
            }
        }

        self.state = RunnerState::Completed;
        let canceled = self.model.is_canceled();
        info!(
            task_id = %active.task_id,
            success = outcome.is_success(),
            canceled,
            "Background task completed"
        );

        for observer in &mut self.observers {
            observer.on_completed(&active.task_id, &outcome, canceled);
        }

        Some(RunnerEvent::Completed {
            task_id: active.task_id,
            outcome,
            canceled,
        })
    }

    fn worker_vanished(&mut self) -> Option<RunnerEvent> {
        warn!("Worker channel closed without a result");
        self.complete(TaskOutcome::Failure(
            "worker exited without reporting a result".to_string(),
        ))
    }
}

impl Drop for BackgroundTaskRunner {
    fn drop(&mut self) {
        if let Some(active) = &self.active {
            warn!(task_id = %active.task_id, "Runner dropped while a task is still running");
        }
    }
}

/// Body of the worker thread. Every exit path reports exactly one outcome.
fn run_worker<W>(work: W, ctx: TaskContext, tx: mpsc::UnboundedSender<WorkerMessage>)
where
    W: FnOnce(TaskContext) -> Result<Value, TaskError>,
{
    let task_id = ctx.task_id().clone();

    let outcome = match panic::catch_unwind(AssertUnwindSafe(move || work(ctx))) {
        Ok(Ok(value)) => TaskOutcome::Success(value),
        Ok(Err(e)) => {
            warn!(task_id = %task_id, error = %e, "Task failed");
            TaskOutcome::Failure(e.to_string())
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(task_id = %task_id, panic = %message, "Task panicked");
            TaskOutcome::Failure(format!("task panicked: {}", message))
        }
    };

    if tx.send(WorkerMessage::Finished(outcome)).is_err() {
        debug!(task_id = %task_id, "Runner gone before completion was delivered");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn short_id(task_id: &TaskId) -> &str {
    let id = task_id.as_str();
    id.get(..8).unwrap_or(id)
}
