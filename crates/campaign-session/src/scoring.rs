//! Outbound interface to the campaign scoring core.

use async_trait::async_trait;
use campaign_core::{AggregateEntry, SessionId};
use tokio::sync::Mutex;
use tracing::info;

use crate::SessionError;

/// External component that turns actor outcomes into campaign scoring.
#[async_trait]
pub trait CampaignCore: Send + Sync {
    /// Receive the scoreboard of a finished session.
    async fn submit_outcomes(
        &self,
        session_id: &SessionId,
        entries: Vec<AggregateEntry>,
    ) -> Result<(), SessionError>;
}

/// In-memory core that keeps every submission.
#[derive(Debug, Default)]
pub struct CollectingCore {
    submissions: Mutex<Vec<(SessionId, Vec<AggregateEntry>)>>,
}

impl CollectingCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All submissions received so far, oldest first.
    pub async fn submissions(&self) -> Vec<(SessionId, Vec<AggregateEntry>)> {
        self.submissions.lock().await.clone()
    }
}

#[async_trait]
impl CampaignCore for CollectingCore {
    async fn submit_outcomes(
        &self,
        session_id: &SessionId,
        entries: Vec<AggregateEntry>,
    ) -> Result<(), SessionError> {
        info!(session_id = %session_id, entries = entries.len(), "Outcomes submitted");
        self.submissions
            .lock()
            .await
            .push((session_id.clone(), entries));
        Ok(())
    }
}
