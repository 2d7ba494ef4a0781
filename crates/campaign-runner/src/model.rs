//! Observable progress state of one background task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::progress::{bounds_or_default, format_percent, ProgressReport, DEFAULT_BOUNDS};

/// Final result stored in the model when a task completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// The work returned a value (possibly after stopping early on cancellation).
    Success(Value),
    /// The work returned an error or panicked.
    Failure(String),
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Visible progress of a task.
///
/// The runner that owns the model is its only writer. `is_canceled` and
/// `is_completed` only ever go from false to true within one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressTaskModel {
    title: String,
    status: String,
    minimum: i64,
    maximum: i64,
    value: i64,
    percent: String,
    context: Option<Value>,
    result: Option<TaskOutcome>,
    is_canceled: bool,
    is_completed: bool,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl Default for ProgressTaskModel {
    fn default() -> Self {
        let (minimum, maximum) = DEFAULT_BOUNDS;
        Self {
            title: String::new(),
            status: String::new(),
            minimum,
            maximum,
            value: minimum,
            percent: format_percent(minimum, minimum, maximum),
            context: None,
            result: None,
            is_canceled: false,
            is_completed: false,
            started_at: None,
            finished_at: None,
        }
    }
}

impl ProgressTaskModel {
    /// Create a model with default bounds `0..=100`.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Builder method to set the argument handed to the work.
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn minimum(&self) -> i64 {
        self.minimum
    }

    pub fn maximum(&self) -> i64 {
        self.maximum
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn percent(&self) -> &str {
        &self.percent
    }

    pub fn context(&self) -> Option<&Value> {
        self.context.as_ref()
    }

    pub fn result(&self) -> Option<&TaskOutcome> {
        self.result.as_ref()
    }

    pub fn is_canceled(&self) -> bool {
        self.is_canceled
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Copy of the fields observers care about.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            title: self.title.clone(),
            status: self.status.clone(),
            minimum: self.minimum,
            maximum: self.maximum,
            value: self.value,
            percent: self.percent.clone(),
            is_canceled: self.is_canceled,
            is_completed: self.is_completed,
        }
    }

    /// Reset the per-task flags before a worker is bound.
    pub(crate) fn begin(&mut self) {
        self.is_canceled = false;
        self.is_completed = false;
        self.result = None;
        self.started_at = Some(Utc::now());
        self.finished_at = None;
    }

    pub(crate) fn set_value(&mut self, value: i64) {
        self.value = value;
        self.percent = format_percent(self.value, self.minimum, self.maximum);
    }

    pub(crate) fn apply_report(&mut self, report: ProgressReport) {
        match report {
            ProgressReport::Status { value, status } => {
                self.set_value(value);
                self.status = status;
            }
            ProgressReport::ResetBounds { payload } => {
                let (minimum, maximum) = bounds_or_default(&payload);
                self.minimum = minimum;
                self.maximum = maximum;
                self.status.clear();
                self.set_value(0);
            }
        }
    }

    /// Returns false if the model was already canceled.
    pub(crate) fn mark_canceled(&mut self) -> bool {
        if self.is_canceled {
            return false;
        }
        self.is_canceled = true;
        true
    }

    /// Store the outcome and flag completion. Returns false, leaving the
    /// model untouched, if it was already completed.
    pub(crate) fn mark_completed(&mut self, outcome: TaskOutcome) -> bool {
        if self.is_completed {
            warn!(title = %self.title, "Ignoring duplicate completion");
            return false;
        }
        self.is_completed = true;
        self.result = Some(outcome);
        self.finished_at = Some(Utc::now());
        true
    }
}

/// Read-only view of a model delivered with progress events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub title: String,
    pub status: String,
    pub minimum: i64,
    pub maximum: i64,
    pub value: i64,
    pub percent: String,
    pub is_canceled: bool,
    pub is_completed: bool,
}
