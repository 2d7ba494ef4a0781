//! Session errors.

use campaign_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Domain error while keying an actor.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The scoring core rejected the session outcomes.
    #[error("Failed to submit outcomes to campaign core: {0}")]
    Submit(String),
}

impl SessionError {
    /// Returns true if the error stems from a caller breaking an API contract.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_contract_violation())
    }
}
