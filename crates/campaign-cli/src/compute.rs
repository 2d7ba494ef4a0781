//! Demo campaign computation driven through the background task runner.

use std::thread;
use std::time::Duration;

use campaign_runner::{
    AutoConfirm, BackgroundTaskRunner, DeclineAll, ProgressTaskModel, RunnerEvent, TaskContext,
    TaskError, TaskOutcome,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::output::{JsonEventType, Output};
use crate::prompt;

/// Argument of [`plan_turns`].
#[derive(Debug, Deserialize)]
struct PlanArgs {
    steps: u32,
    #[serde(default)]
    step_ms: u64,
}

/// Plan campaign turns one by one, stopping early when canceled.
///
/// Expects `{"steps": u32, "step_ms": u64}` as argument.
pub fn plan_turns(ctx: TaskContext) -> Result<Value, TaskError> {
    let argument = ctx
        .argument()
        .cloned()
        .ok_or_else(|| TaskError::InvalidArgument("missing argument".to_string()))?;
    let PlanArgs { steps, step_ms } = serde_json::from_value(argument)?;

    ctx.reset_bounds(0, steps);
    for turn in 1..=steps {
        if ctx.is_cancellation_requested() {
            return Ok(json!({ "planned_turns": turn - 1, "stopped_early": true }));
        }
        thread::sleep(Duration::from_millis(step_ms));
        ctx.report(turn, format!("Planned turn {}/{}", turn, steps));
    }

    Ok(json!({ "planned_turns": steps, "stopped_early": false }))
}

/// Wait for the pending terminal answer, or forever when none is pending.
async fn prompt_answer(pending: &mut Option<oneshot::Receiver<bool>>) -> bool {
    match pending.as_mut() {
        Some(rx) => rx.await.unwrap_or(false),
        None => std::future::pending().await,
    }
}

/// Run [`plan_turns`] with Ctrl-C wired to a confirmed close request.
///
/// Without `auto_confirm` the question is asked on a prompt thread while
/// progress keeps flowing; the answer becomes the runner's confirmation.
pub async fn run_compute(config: &Config, output: Output) -> Result<TaskOutcome, Box<dyn std::error::Error>> {
    let (interrupt_tx, mut interrupt_rx) = mpsc::unbounded_channel::<()>();
    ctrlc::set_handler(move || {
        let _ = interrupt_tx.send(());
    })?;

    let mut runner = if config.auto_confirm {
        BackgroundTaskRunner::new(AutoConfirm)
    } else {
        BackgroundTaskRunner::new(DeclineAll)
    };
    let mut pending: Option<oneshot::Receiver<bool>> = None;

    let model = ProgressTaskModel::new("Plan campaign turns").with_context(json!({
        "steps": config.steps,
        "step_ms": config.step_ms,
    }));
    let task_id = runner.start(plan_turns, model)?;
    output.emit(
        format!("Started task {} ({} turns)", task_id, config.steps),
        JsonEventType::TaskStarted,
        json!({ "task_id": task_id, "steps": config.steps }),
    );

    loop {
        tokio::select! {
            event = runner.next_event() => match event {
                Some(RunnerEvent::ProgressChanged(snapshot)) => {
                    output.emit(
                        format!("[{:>4}] {}", snapshot.percent, snapshot.status),
                        JsonEventType::Progress,
                        json!(snapshot),
                    );
                }
                Some(RunnerEvent::Completed { task_id, outcome, canceled }) => {
                    let text = match &outcome {
                        TaskOutcome::Success(value) if canceled => format!("Task canceled: {}", value),
                        TaskOutcome::Success(value) => format!("Task finished: {}", value),
                        TaskOutcome::Failure(message) => format!("Task failed: {}", message),
                    };
                    output.emit(
                        text,
                        JsonEventType::Completed,
                        json!({ "task_id": task_id, "outcome": outcome, "canceled": canceled }),
                    );
                    return Ok(outcome);
                }
                None => break,
            },
            Some(()) = interrupt_rx.recv() => {
                if config.auto_confirm {
                    close(&mut runner, output);
                } else if pending.is_some() {
                    debug!("Interrupt while the prompt is open, ignored");
                } else {
                    pending = Some(prompt::ask(runner.model()));
                }
            }
            answer = prompt_answer(&mut pending), if pending.is_some() => {
                pending = None;
                runner.set_confirmation(move |_model: &ProgressTaskModel| answer);
                close(&mut runner, output);
            }
        }
    }

    warn!("Runner stopped without a completion event");
    runner
        .model()
        .result()
        .cloned()
        .ok_or_else(|| "task ended without a result".into())
}

fn close(runner: &mut BackgroundTaskRunner, output: Output) {
    if runner.request_close() {
        info!("Interrupt confirmed, waiting for the task to stop");
        output.emit(
            "Cancellation requested, waiting for the task to stop...",
            JsonEventType::CancelRequested,
            json!({ "task_id": runner.task_id() }),
        );
    } else {
        info!("Interrupt declined, task continues");
    }
}
