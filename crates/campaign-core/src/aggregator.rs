//! Per-session scoreboard of actor deaths.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ActorKey, ActorKind, CoreError, DamageScore, Faction};

/// Exported scoreboard row: one actor key and every contribution recorded
/// against it, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateEntry {
    pub key: ActorKey,
    pub contributions: Vec<DamageScore>,
}

/// Merges death notifications into an order-preserving map keyed by actor.
///
/// Keys are kept in first-insertion order. Contributions for a key are
/// appended as they arrive and never reordered or deduplicated, so repeated
/// delivery of one logical event shows up twice. Mutation requires
/// `&mut self`; one instance belongs to one mission session.
#[derive(Debug, Default)]
pub struct ActorOutcomeAggregator {
    entries: Vec<AggregateEntry>,
    index: HashMap<ActorKey, usize>,
}

impl ActorOutcomeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the death of a tracked actor.
    ///
    /// Fails only when a name component contains the key separator, in which
    /// case nothing is recorded.
    pub fn record_death(
        &mut self,
        faction: Faction,
        kind: ActorKind,
        short_name: &str,
        internal_type_name: &str,
        contributions: Vec<DamageScore>,
    ) -> Result<(), CoreError> {
        let key = ActorKey::new(faction, kind, short_name, internal_type_name)?;
        self.record(key, contributions);
        Ok(())
    }

    /// Merge `contributions` under an already built key.
    pub fn record(&mut self, key: ActorKey, contributions: Vec<DamageScore>) {
        match self.index.get(&key) {
            Some(&slot) => {
                let entry = &mut self.entries[slot];
                debug!(
                    key = %key,
                    added = contributions.len(),
                    total = entry.contributions.len() + contributions.len(),
                    "Appending to existing actor entry"
                );
                entry.contributions.extend(contributions);
            }
            None => {
                debug!(key = %key, added = contributions.len(), "New actor entry");
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(AggregateEntry { key, contributions });
            }
        }
    }

    /// Contributions recorded so far for `key`.
    pub fn contributions(&self, key: &ActorKey) -> Option<&[DamageScore]> {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].contributions.as_slice())
    }

    /// Number of distinct actor keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Owned snapshot ordered by first insertion of each key.
    pub fn export(&self) -> Vec<AggregateEntry> {
        self.entries.clone()
    }
}
