//! Campaign Live mission session.
//!
//! Receives host simulation callbacks as [`HostEvent`]s, forwards tracked
//! actor deaths to the session's aggregator and registered listeners, and
//! hands the final scoreboard to a [`CampaignCore`].

pub mod error;
pub mod event;
pub mod listener;
pub mod scoring;
pub mod session;

pub use error::SessionError;
pub use event::{ActorCategory, ActorDescriptor, HostEvent};
pub use listener::DeathListener;
pub use scoring::{CampaignCore, CollectingCore};
pub use session::{MissionSession, SessionReport};
