//! Durable session record storage for Vigil.
//!
//! This crate persists exactly one thing: the current [`SessionRecord`],
//! under a single logical key. It is the piece that lets a session survive
//! a process restart without re-prompting for credentials.
//!
//! The failure contract is deliberately one-sided: **no storage failure is
//! ever surfaced to the caller**. An unreadable, unparsable, or over-age
//! record normalizes to "no session"; a failed write is logged and
//! swallowed. The session lifecycle must keep working when storage is
//! broken — it just stops being durable.
//!
//! Storage itself is behind the [`StorageBackend`] trait so the same store
//! logic runs over an in-memory slot in tests and a JSON file in
//! production.
//!
//! [`SessionRecord`]: vigil_model::SessionRecord

mod backend;
mod error;
mod store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use error::StoreError;
pub use store::{SessionStore, StoreConfig};
