//! Replay a host event log through a mission session.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use campaign_session::{CollectingCore, HostEvent, MissionSession, SessionError, SessionReport};
use serde_json::json;
use thiserror::Error;
use tracing::info;

use crate::output::{JsonEventType, Output};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read {path}: {source}")]
    Io { path: String, source: io::Error },

    #[error("Line {line}: invalid host event: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },

    #[error("Line {line}: {source}")]
    Dispatch { line: usize, source: SessionError },

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Parse a JSON-lines event log. Blank lines and `#` comments are skipped.
pub fn read_events(reader: impl BufRead, path: &str) -> Result<Vec<(usize, HostEvent)>, ReplayError> {
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| ReplayError::Io {
            path: path.to_string(),
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let event = HostEvent::from_json(trimmed).map_err(|source| ReplayError::Parse {
            line: line_no,
            source,
        })?;
        events.push((line_no, event));
    }
    Ok(events)
}

/// Dispatch every event in order and finish the session.
pub async fn replay_events(events: Vec<(usize, HostEvent)>) -> Result<SessionReport, ReplayError> {
    let mut session = MissionSession::new();
    for (line, event) in events {
        session
            .dispatch(event)
            .map_err(|source| ReplayError::Dispatch { line, source })?;
    }

    let core = CollectingCore::new();
    Ok(session.finish(&core).await?)
}

/// Replay the log at `path` and print the resulting scoreboard.
pub async fn run_replay(path: &Path, output: Output) -> Result<SessionReport, ReplayError> {
    let path_str = path.display().to_string();
    let file = File::open(path).map_err(|source| ReplayError::Io {
        path: path_str.clone(),
        source,
    })?;

    let events = read_events(BufReader::new(file), &path_str)?;
    info!(path = %path_str, events = events.len(), "Replaying host events");

    let report = replay_events(events).await?;
    print_report(&report, output);
    Ok(report)
}

fn print_report(report: &SessionReport, output: Output) {
    if output.is_json() {
        for entry in &report.entries {
            output.emit("", JsonEventType::Entry, json!(entry));
        }
        output.emit(
            "",
            JsonEventType::SessionFinished,
            json!({
                "session_id": report.session_id,
                "mission": report.mission,
                "deaths_recorded": report.deaths_recorded,
                "deaths_skipped": report.deaths_skipped,
            }),
        );
        return;
    }

    println!(
        "Session {} ({})",
        report.session_id,
        report.mission.as_deref().unwrap_or("unnamed mission")
    );
    println!(
        "Deaths recorded: {}  skipped: {}",
        report.deaths_recorded, report.deaths_skipped
    );
    println!("{:<48}  {:>5}  {:>8}", "ACTOR", "HITS", "SCORE");
    println!("{}", "-".repeat(66));

    for entry in &report.entries {
        let total: f64 = entry.contributions.iter().map(|c| c.score).sum();
        println!(
            "{:<48}  {:>5}  {:>8.1}",
            entry.key.to_string(),
            entry.contributions.len(),
            total
        );
        for contribution in &entry.contributions {
            let who = contribution
                .initiator
                .as_ref()
                .map(|i| i.to_string())
                .unwrap_or_else(|| "anonymous".to_string());
            println!("    {:<44}  {:>15.1}", who, contribution.score);
        }
    }
}
