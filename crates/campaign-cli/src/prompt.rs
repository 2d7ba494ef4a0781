//! Interactive cancel confirmation.

use std::io::{self, BufRead, Write};
use std::thread;

use campaign_runner::ProgressTaskModel;
use tokio::sync::oneshot;
use tracing::warn;

/// Ask on the terminal whether the running task should be canceled.
///
/// The question is read on its own thread so the control loop keeps applying
/// progress. A failed read or a dropped prompt counts as "no".
pub fn ask(model: &ProgressTaskModel) -> oneshot::Receiver<bool> {
    let (tx, rx) = oneshot::channel();
    let question = question(model);

    let spawned = thread::Builder::new()
        .name("campaign-prompt".to_string())
        .spawn(move || {
            let mut stderr = io::stderr().lock();
            let _ = write!(stderr, "{}", question);
            let _ = stderr.flush();
            drop(stderr);

            let _ = tx.send(read_answer(io::stdin().lock()));
        });
    if let Err(e) = spawned {
        warn!(error = %e, "Failed to start prompt thread, keeping task running");
    }
    rx
}

fn question(model: &ProgressTaskModel) -> String {
    format!(
        "\n'{}' is {} done. Cancel task? [y/N] ",
        model.title(),
        model.percent()
    )
}

fn read_answer(mut reader: impl BufRead) -> bool {
    let mut answer = String::new();
    if let Err(e) = reader.read_line(&mut answer) {
        warn!(error = %e, "Failed to read confirmation, keeping task running");
        return false;
    }
    is_yes(&answer)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
