//! Host simulation callbacks as typed events.

use campaign_core::{ActorKind, DamageScore, Faction};
use serde::{Deserialize, Serialize};

/// Host-side category of a simulated actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorCategory {
    Aircraft,
    GroundUnit,
    Person,
    Building,
    Stationary,
    #[serde(other)]
    Other,
}

impl ActorCategory {
    /// Scoring kind for this category. Only aircraft and ground units count
    /// toward campaign scoring.
    pub fn tracked_kind(&self) -> Option<ActorKind> {
        match self {
            Self::Aircraft => Some(ActorKind::Airborne),
            Self::GroundUnit => Some(ActorKind::Ground),
            Self::Person | Self::Building | Self::Stationary | Self::Other => None,
        }
    }
}

/// Actor description as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorDescriptor {
    /// Host army index (1 = Red, 2 = Blue).
    pub army: i32,
    pub category: ActorCategory,
    pub short_name: String,
    pub internal_type_name: String,
}

impl ActorDescriptor {
    pub fn new(
        army: i32,
        category: ActorCategory,
        short_name: impl Into<String>,
        internal_type_name: impl Into<String>,
    ) -> Self {
        Self {
            army,
            category,
            short_name: short_name.into(),
            internal_type_name: internal_type_name.into(),
        }
    }

    pub fn faction(&self) -> Option<Faction> {
        Faction::from_army(self.army)
    }
}

/// One host callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    MissionStarted {
        mission: String,
    },
    ActorCreated {
        actor: ActorDescriptor,
    },
    ActorDamaged {
        actor: ActorDescriptor,
        damage: DamageScore,
    },
    ActorDead {
        actor: ActorDescriptor,
        #[serde(default)]
        damages: Vec<DamageScore>,
    },
    MissionStateChanged {
        state: String,
    },
    MissionEnded,
}

impl HostEvent {
    /// Event name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MissionStarted { .. } => "mission_started",
            Self::ActorCreated { .. } => "actor_created",
            Self::ActorDamaged { .. } => "actor_damaged",
            Self::ActorDead { .. } => "actor_dead",
            Self::MissionStateChanged { .. } => "mission_state_changed",
            Self::MissionEnded => "mission_ended",
        }
    }

    /// Decode one JSON event.
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
