//! Campaign Live Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Threads or async runtimes
//! - The host simulation
//! - Scoring back-ends
//!
//! The [`ActorOutcomeAggregator`] lives here because it is plain data
//! manipulation driven by a single owner.

pub mod aggregator;
pub mod error;
pub mod ids;
pub mod key;
pub mod score;

// Re-export commonly used types
pub use aggregator::{ActorOutcomeAggregator, AggregateEntry};
pub use error::CoreError;
pub use ids::{SessionId, TaskId};
pub use key::{ActorKey, ActorKind, Faction, KEY_SEPARATOR};
pub use score::{DamageScore, Initiator};
