//! The session agent: an isolated Tokio task that owns the controller.
//!
//! Session state wants exactly one logical owner, with interaction
//! events, the periodic sweep, and explicit API calls all processed in
//! strict arrival order. This crate is that owner: a single
//! task holding the [`SessionController`] and its idle sweeper, driven
//! through an mpsc channel. No shared mutable state, just message passing.
//!
//! Consumers hold a cheap, cloneable [`SessionHandle`]. Dropping every
//! handle (or calling [`SessionHandle::shutdown`]) tears the task down,
//! which drops the sweeper with it — timers and listeners are scoped to
//! the agent and cannot leak across instances.
//!
//! [`SessionController`]: vigil_session::SessionController

mod agent;
mod error;

pub use agent::{spawn_agent, SessionHandle, SessionSnapshot};
pub use error::AgentError;
