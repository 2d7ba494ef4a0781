use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc as std_mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use campaign_core::TaskId;
use campaign_runner::{
    AutoConfirm, BackgroundTaskRunner, CancelDecision, DeclineAll, ProgressSnapshot,
    ProgressTaskModel, RunnerEvent, RunnerState, TaskContext, TaskError, TaskObserver, TaskOutcome,
};
use serde_json::{json, Value};

/// Work that spins until canceled or released through `release`.
fn wait_for_stop(release: std_mpsc::Receiver<()>) -> impl FnOnce(TaskContext) -> Result<Value, TaskError> {
    move |ctx| {
        ctx.report(1, "waiting");
        loop {
            if ctx.is_cancellation_requested() {
                return Ok(json!("stopped early"));
            }
            if release.recv_timeout(Duration::from_millis(5)).is_ok() {
                return Ok(json!("released"));
            }
        }
    }
}

#[tokio::test]
async fn test_progress_applied_in_emission_order() {
    let mut runner = BackgroundTaskRunner::new(AutoConfirm);
    runner
        .start(
            |ctx| {
                for i in 1..=50 {
                    ctx.report(i, format!("step {}", i));
                }
                Ok(json!({ "steps": 50 }))
            },
            ProgressTaskModel::new("ordered"),
        )
        .unwrap();

    let mut values = Vec::new();
    let mut completions = 0;
    while let Some(event) = runner.next_event().await {
        match event {
            RunnerEvent::ProgressChanged(snapshot) => {
                assert_eq!(snapshot.status, format!("step {}", snapshot.value));
                values.push(snapshot.value);
            }
            RunnerEvent::Completed { outcome, canceled, .. } => {
                completions += 1;
                assert!(!canceled);
                assert_eq!(outcome, TaskOutcome::Success(json!({ "steps": 50 })));
            }
        }
    }

    assert_eq!(values, (1..=50).collect::<Vec<i64>>());
    assert_eq!(completions, 1);
    assert_eq!(runner.state(), RunnerState::Completed);
    assert!(runner.model().is_completed());
    assert!(!runner.model().is_canceled());
    assert_eq!(runner.model().value(), 50);
    assert_eq!(runner.model().percent(), "50%");
}

#[tokio::test]
async fn test_bounds_reset_through_worker() {
    let mut runner = BackgroundTaskRunner::new(AutoConfirm);
    runner
        .start(
            |ctx| {
                ctx.reset_bounds(10, 50);
                ctx.report(20, "twenty");
                ctx.report_raw(-1, "50|10");
                ctx.report_raw(-1, "abc");
                ctx.report_raw(-3, "ignored");
                Ok(Value::Null)
            },
            ProgressTaskModel::new("bounds"),
        )
        .unwrap();

    let mut bounds = Vec::new();
    while let Some(event) = runner.next_event().await {
        if let RunnerEvent::ProgressChanged(s) = event {
            bounds.push((s.minimum, s.maximum, s.value));
        }
    }

    assert_eq!(
        bounds,
        vec![(10, 50, 0), (10, 50, 20), (0, 100, 0), (0, 100, 0)]
    );
}

#[tokio::test]
async fn test_extreme_bounds_keep_control_context_alive() {
    let mut runner = BackgroundTaskRunner::new(AutoConfirm);
    runner
        .start(
            |ctx| {
                ctx.report_raw(-1, "0|9223372036854775807");
                ctx.report(7, "still going");
                Ok(json!("done"))
            },
            ProgressTaskModel::new("extreme"),
        )
        .unwrap();

    let mut snapshots = Vec::new();
    let mut outcome = None;
    while let Some(event) = runner.next_event().await {
        match event {
            RunnerEvent::ProgressChanged(s) => snapshots.push((s.maximum, s.value, s.percent)),
            RunnerEvent::Completed { outcome: o, .. } => outcome = Some(o),
        }
    }

    assert_eq!(
        snapshots,
        vec![
            (i64::MAX, 0, "0%".to_string()),
            (i64::MAX, 7, "0%".to_string()),
        ]
    );
    assert_eq!(outcome, Some(TaskOutcome::Success(json!("done"))));
    assert_eq!(runner.state(), RunnerState::Completed);
}

#[tokio::test]
async fn test_declined_cancel_leaves_task_running() {
    let (release_tx, release_rx) = std_mpsc::channel();
    let mut runner = BackgroundTaskRunner::new(DeclineAll);
    runner
        .start(wait_for_stop(release_rx), ProgressTaskModel::new("decline"))
        .unwrap();

    assert_eq!(runner.request_cancel(), CancelDecision::Declined);
    assert_eq!(runner.state(), RunnerState::Running);
    assert!(!runner.model().is_canceled());
    assert!(!runner.request_close());

    release_tx.send(()).unwrap();
    let outcome = runner.wait_for_completion().await.unwrap();
    assert_eq!(outcome, TaskOutcome::Success(json!("released")));
    assert!(!runner.model().is_canceled());
}

#[tokio::test]
async fn test_confirmed_cancel_reaches_completed() {
    let (_release_tx, release_rx) = std_mpsc::channel();
    let mut runner = BackgroundTaskRunner::new(AutoConfirm);
    runner
        .start(wait_for_stop(release_rx), ProgressTaskModel::new("cancel"))
        .unwrap();

    assert_eq!(runner.request_cancel(), CancelDecision::Requested);
    assert_eq!(runner.state(), RunnerState::CancelConfirmed);
    assert!(runner.model().is_canceled());
    assert!(!runner.model().is_completed());

    match runner.next_event().await {
        Some(RunnerEvent::ProgressChanged(s)) => assert_eq!(s.status, "waiting"),
        other => panic!("expected progress, got {:?}", other),
    }
    match runner.next_event().await {
        Some(RunnerEvent::Completed {
            outcome, canceled, ..
        }) => {
            assert!(canceled);
            assert_eq!(outcome, TaskOutcome::Success(json!("stopped early")));
        }
        other => panic!("expected completion, got {:?}", other),
    }

    assert_eq!(runner.state(), RunnerState::Completed);
    assert!(runner.model().is_completed());
    assert_eq!(runner.request_cancel(), CancelDecision::NotRunning);
    assert!(runner.next_event().await.is_none());
}

#[tokio::test]
async fn test_confirmation_asked_once_per_task() {
    let asked = Arc::new(AtomicUsize::new(0));
    let counter = asked.clone();
    let mut runner = BackgroundTaskRunner::new(move |_model: &ProgressTaskModel| {
        counter.fetch_add(1, Ordering::SeqCst);
        true
    });

    let (_keep, release_rx) = std_mpsc::channel();
    runner
        .start(wait_for_stop(release_rx), ProgressTaskModel::new("once"))
        .unwrap();

    assert_eq!(runner.request_cancel(), CancelDecision::Requested);
    assert_eq!(runner.request_cancel(), CancelDecision::AlreadyRequested);
    assert!(runner.request_close());
    assert_eq!(asked.load(Ordering::SeqCst), 1);

    runner.wait_for_completion().await.unwrap();

    let (_keep2, release_rx) = std_mpsc::channel();
    runner
        .start(wait_for_stop(release_rx), ProgressTaskModel::new("again"))
        .unwrap();
    assert_eq!(runner.request_cancel(), CancelDecision::Requested);
    assert_eq!(asked.load(Ordering::SeqCst), 2);
    runner.wait_for_completion().await.unwrap();
}

#[tokio::test]
async fn test_close_confirmed_after_prompt_changes_mind() {
    let answers = Arc::new(Mutex::new(vec![true, false]));
    let source = answers.clone();
    let mut runner = BackgroundTaskRunner::new(move |_model: &ProgressTaskModel| {
        source.lock().unwrap().pop().unwrap_or(false)
    });

    let (_keep, release_rx) = std_mpsc::channel();
    runner
        .start(wait_for_stop(release_rx), ProgressTaskModel::new("close"))
        .unwrap();

    assert!(!runner.request_close());
    assert_eq!(runner.state(), RunnerState::Running);
    assert!(runner.request_close());
    assert_eq!(runner.state(), RunnerState::CancelConfirmed);

    let outcome = runner.wait_for_completion().await.unwrap();
    assert_eq!(outcome, TaskOutcome::Success(json!("stopped early")));
}

#[tokio::test]
async fn test_start_while_running_is_contract_violation() {
    let (release_tx, release_rx) = std_mpsc::channel();
    let mut runner = BackgroundTaskRunner::new(AutoConfirm);
    let first = runner
        .start(wait_for_stop(release_rx), ProgressTaskModel::new("first"))
        .unwrap();

    let err = runner
        .start(|_ctx| Ok(Value::Null), ProgressTaskModel::new("second"))
        .unwrap_err();
    assert!(err.is_contract_violation());
    assert!(matches!(
        err,
        campaign_runner::RunnerError::AlreadyRunning { ref task_id } if *task_id == first
    ));
    assert_eq!(runner.model().title(), "first");
    assert_eq!(runner.task_id(), Some(&first));

    release_tx.send(()).unwrap();
    runner.wait_for_completion().await.unwrap();

    let second = runner
        .start(|_ctx| Ok(json!(2)), ProgressTaskModel::new("second"))
        .unwrap();
    assert_ne!(first, second);
    assert_eq!(
        runner.wait_for_completion().await,
        Some(TaskOutcome::Success(json!(2)))
    );
}

#[tokio::test]
async fn test_task_error_becomes_failure_outcome() {
    let mut runner = BackgroundTaskRunner::new(AutoConfirm);
    runner
        .start(
            |_ctx| Err(TaskError::failed("mission template missing")),
            ProgressTaskModel::new("failing"),
        )
        .unwrap();

    let outcome = runner.wait_for_completion().await.unwrap();
    assert_eq!(
        outcome,
        TaskOutcome::Failure("mission template missing".to_string())
    );
    assert_eq!(runner.state(), RunnerState::Completed);
    assert_eq!(runner.model().result(), Some(&outcome));
}

#[tokio::test]
async fn test_panicking_work_is_isolated() {
    let mut runner = BackgroundTaskRunner::new(AutoConfirm);
    runner
        .start(
            |_ctx| -> Result<Value, TaskError> { panic!("division by zero in planner") },
            ProgressTaskModel::new("panics"),
        )
        .unwrap();

    match runner.wait_for_completion().await {
        Some(TaskOutcome::Failure(message)) => {
            assert!(message.contains("division by zero in planner"))
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(runner.model().is_completed());
}

#[tokio::test]
async fn test_work_receives_model_context() {
    let mut runner = BackgroundTaskRunner::new(AutoConfirm);
    runner
        .start(
            |ctx| {
                let turns = ctx
                    .argument()
                    .and_then(|v| v.get("turns"))
                    .and_then(Value::as_u64)
                    .ok_or_else(|| TaskError::InvalidArgument("turns".into()))?;
                Ok(json!(turns * 2))
            },
            ProgressTaskModel::new("ctx").with_context(json!({ "turns": 21 })),
        )
        .unwrap();

    assert_eq!(
        runner.wait_for_completion().await,
        Some(TaskOutcome::Success(json!(42)))
    );
}

#[derive(Clone, Default)]
struct Recorder {
    log: Arc<Mutex<Vec<String>>>,
}

impl TaskObserver for Recorder {
    fn on_progress(&mut self, snapshot: &ProgressSnapshot) {
        self.log
            .lock()
            .unwrap()
            .push(format!("progress {}", snapshot.percent));
    }

    fn on_completed(&mut self, _task_id: &TaskId, outcome: &TaskOutcome, canceled: bool) {
        self.log
            .lock()
            .unwrap()
            .push(format!("completed {} {}", outcome.is_success(), canceled));
    }
}

#[test]
fn test_pump_notifies_observers() {
    let recorder = Recorder::default();
    let mut runner = BackgroundTaskRunner::new(AutoConfirm);
    runner.subscribe(recorder.clone());

    let (go_tx, go_rx) = std_mpsc::channel::<()>();
    runner
        .start(
            move |ctx| {
                go_rx.recv().map_err(|e| TaskError::failed(e.to_string()))?;
                ctx.report(25, "quarter");
                ctx.report(75, "three quarters");
                Ok(Value::Null)
            },
            ProgressTaskModel::new("pumped"),
        )
        .unwrap();

    assert!(runner.pump().is_empty());
    go_tx.send(()).unwrap();

    let mut events = Vec::new();
    for _ in 0..500 {
        events.extend(runner.pump());
        if runner.state() == RunnerState::Completed {
            break;
        }
        thread::sleep(Duration::from_millis(2));
    }

    assert_eq!(events.len(), 3);
    assert_eq!(
        *recorder.log.lock().unwrap(),
        vec![
            "progress 25%".to_string(),
            "progress 74%".to_string(),
            "completed true false".to_string(),
        ]
    );
}
