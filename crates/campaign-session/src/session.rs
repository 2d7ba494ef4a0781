//! One mission session: dispatch of host callbacks and the session scoreboard.

use campaign_core::{ActorKey, ActorOutcomeAggregator, AggregateEntry, DamageScore, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::{ActorDescriptor, CampaignCore, DeathListener, HostEvent, SessionError};

/// Summary returned when a session is finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub mission: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Deaths forwarded to the scoreboard.
    pub deaths_recorded: u64,
    /// Deaths ignored because of their category or army.
    pub deaths_skipped: u64,
    pub entries: Vec<AggregateEntry>,
}

/// Live state of one mission run.
///
/// Owns the session's [`ActorOutcomeAggregator`]. Host callbacks arrive through
/// [`dispatch`](Self::dispatch) one at a time; tracked deaths go to the
/// aggregator, which is always the first [`DeathListener`], then to every
/// listener added with [`add_listener`](Self::add_listener).
pub struct MissionSession {
    id: SessionId,
    mission: Option<String>,
    mission_state: Option<String>,
    started_at: DateTime<Utc>,
    ended: bool,
    aggregator: ActorOutcomeAggregator,
    listeners: Vec<Box<dyn DeathListener>>,
    deaths_recorded: u64,
    deaths_skipped: u64,
}

impl Default for MissionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MissionSession {
    pub fn new() -> Self {
        Self::with_id(SessionId::generate())
    }

    /// Builder-style constructor with a fixed ID (useful for testing).
    pub fn with_id(id: SessionId) -> Self {
        Self {
            id,
            mission: None,
            mission_state: None,
            started_at: Utc::now(),
            ended: false,
            aggregator: ActorOutcomeAggregator::new(),
            listeners: Vec::new(),
            deaths_recorded: 0,
            deaths_skipped: 0,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn mission(&self) -> Option<&str> {
        self.mission.as_deref()
    }

    /// Last mission state reported by the host.
    pub fn mission_state(&self) -> Option<&str> {
        self.mission_state.as_deref()
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn aggregator(&self) -> &ActorOutcomeAggregator {
        &self.aggregator
    }

    /// Register an extra listener for tracked deaths.
    pub fn add_listener(&mut self, listener: impl DeathListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Current scoreboard snapshot.
    pub fn export(&self) -> Vec<AggregateEntry> {
        self.aggregator.export()
    }

    /// Handle one host callback.
    pub fn dispatch(&mut self, event: HostEvent) -> Result<(), SessionError> {
        if self.ended {
            warn!(session_id = %self.id, event = event.name(), "Event after mission end");
        }

        match event {
            HostEvent::MissionStarted { mission } => {
                info!(session_id = %self.id, mission = %mission, "Mission started");
                self.mission = Some(mission);
            }
            HostEvent::ActorCreated { actor } => {
                trace!(actor = %actor.short_name, category = ?actor.category, "Actor created");
            }
            HostEvent::ActorDamaged { actor, damage } => {
                trace!(
                    actor = %actor.short_name,
                    score = damage.score,
                    initiator = ?damage.initiator,
                    "Actor damaged"
                );
            }
            HostEvent::ActorDead { actor, damages } => {
                self.on_actor_dead(&actor, &damages)?;
            }
            HostEvent::MissionStateChanged { state } => {
                debug!(session_id = %self.id, state = %state, "Mission state changed");
                self.mission_state = Some(state);
            }
            HostEvent::MissionEnded => {
                info!(
                    session_id = %self.id,
                    actors = self.aggregator.len(),
                    "Mission ended"
                );
                self.ended = true;
            }
        }
        Ok(())
    }

    fn on_actor_dead(
        &mut self,
        actor: &ActorDescriptor,
        damages: &[DamageScore],
    ) -> Result<(), SessionError> {
        let Some(kind) = actor.category.tracked_kind() else {
            debug!(
                actor = %actor.short_name,
                category = ?actor.category,
                "Death of untracked category ignored"
            );
            self.deaths_skipped += 1;
            return Ok(());
        };
        let Some(faction) = actor.faction() else {
            warn!(actor = %actor.short_name, army = actor.army, "Death with unknown army ignored");
            self.deaths_skipped += 1;
            return Ok(());
        };

        let key = ActorKey::new(
            faction,
            kind,
            actor.short_name.as_str(),
            actor.internal_type_name.as_str(),
        )?;

        debug!(key = %key, damages = damages.len(), "Actor death recorded");
        self.aggregator.on_actor_dead(&key, damages);
        for listener in &mut self.listeners {
            listener.on_actor_dead(&key, damages);
        }
        self.deaths_recorded += 1;
        Ok(())
    }

    /// Close the session and hand its scoreboard to `core`.
    pub async fn finish(self, core: &dyn CampaignCore) -> Result<SessionReport, SessionError> {
        let entries = self.aggregator.export();
        core.submit_outcomes(&self.id, entries.clone()).await?;

        let report = SessionReport {
            session_id: self.id,
            mission: self.mission,
            started_at: self.started_at,
            finished_at: Utc::now(),
            deaths_recorded: self.deaths_recorded,
            deaths_skipped: self.deaths_skipped,
            entries,
        };
        info!(
            session_id = %report.session_id,
            recorded = report.deaths_recorded,
            skipped = report.deaths_skipped,
            "Session finished"
        );
        Ok(report)
    }
}
