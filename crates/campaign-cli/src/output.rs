//! Text and JSON-lines output.

use serde::Serialize;
use std::io::{self, Write};

/// JSON event types written in `--json` mode.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonEventType {
    TaskStarted,
    Progress,
    CancelRequested,
    Completed,
    Entry,
    SessionFinished,
}

/// One JSON line.
#[derive(Debug, Clone, Serialize)]
pub struct JsonEvent {
    pub event: JsonEventType,
    pub timestamp: String,
    pub data: serde_json::Value,
}

impl JsonEvent {
    /// Create a new JSON event with the current timestamp.
    pub fn new(event: JsonEventType, data: serde_json::Value) -> Self {
        Self {
            event,
            timestamp: chrono::Utc::now().to_rfc3339(),
            data,
        }
    }
}

/// Writes either human-readable lines or JSON events to stdout.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Emit `text` in text mode, or the event in JSON mode.
    pub fn emit(&self, text: impl AsRef<str>, event: JsonEventType, data: serde_json::Value) {
        let mut stdout = io::stdout().lock();
        if self.json {
            if let Ok(json) = serde_json::to_string(&JsonEvent::new(event, data)) {
                let _ = writeln!(stdout, "{}", json);
            }
        } else {
            let _ = writeln!(stdout, "{}", text.as_ref());
        }
        let _ = stdout.flush();
    }
}
