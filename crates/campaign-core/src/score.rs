//! Damage attribution values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity responsible for a damage contribution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Initiator {
    /// Human participant, by player name.
    Player(String),
    /// AI-controlled entity, by its host name.
    Ai(String),
}

impl Initiator {
    pub fn name(&self) -> &str {
        match self {
            Self::Player(name) | Self::Ai(name) => name,
        }
    }
}

impl fmt::Display for Initiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(name) => write!(f, "player:{}", name),
            Self::Ai(name) => write!(f, "ai:{}", name),
        }
    }
}

/// One attributed contribution to an actor's death.
///
/// An absent initiator means anonymous or environmental damage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageScore {
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiator: Option<Initiator>,
}

impl DamageScore {
    pub fn new(score: f64, initiator: Option<Initiator>) -> Self {
        Self { score, initiator }
    }

    /// Contribution credited to a human participant.
    pub fn by_player(score: f64, name: impl Into<String>) -> Self {
        Self::new(score, Some(Initiator::Player(name.into())))
    }

    /// Contribution credited to an AI entity.
    pub fn by_ai(score: f64, name: impl Into<String>) -> Self {
        Self::new(score, Some(Initiator::Ai(name.into())))
    }

    /// Contribution with no responsible entity.
    pub fn anonymous(score: f64) -> Self {
        Self::new(score, None)
    }
}
