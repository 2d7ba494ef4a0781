//! Death notification listeners.

use campaign_core::{ActorKey, ActorOutcomeAggregator, DamageScore};

/// Receives tracked actor deaths from a [`MissionSession`](crate::MissionSession).
///
/// Listeners are called on the dispatch context, one death at a time, in host
/// order.
pub trait DeathListener: Send {
    fn on_actor_dead(&mut self, key: &ActorKey, damages: &[DamageScore]);
}

impl DeathListener for ActorOutcomeAggregator {
    fn on_actor_dead(&mut self, key: &ActorKey, damages: &[DamageScore]) {
        self.record(key.clone(), damages.to_vec());
    }
}
