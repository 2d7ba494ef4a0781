//! Confirmation policies consulted before a task is canceled.

use crate::ProgressTaskModel;

/// Yes/no decision asked once per task before cancellation goes through.
///
/// Implementations may prompt a user or apply a fixed policy. Closures of the
/// shape `FnMut(&ProgressTaskModel) -> bool` implement this trait.
pub trait CancelConfirmation: Send {
    /// Return true to cancel the task described by `model`.
    fn confirm(&mut self, model: &ProgressTaskModel) -> bool;
}

impl<F> CancelConfirmation for F
where
    F: FnMut(&ProgressTaskModel) -> bool + Send,
{
    fn confirm(&mut self, model: &ProgressTaskModel) -> bool {
        self(model)
    }
}

/// Confirms every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl CancelConfirmation for AutoConfirm {
    fn confirm(&mut self, _model: &ProgressTaskModel) -> bool {
        true
    }
}

/// Refuses every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclineAll;

impl CancelConfirmation for DeclineAll {
    fn confirm(&mut self, _model: &ProgressTaskModel) -> bool {
        false
    }
}
