//! Shared data model for Vigil's session lifecycle.
//!
//! This crate defines every type that crosses a component boundary:
//!
//! 1. **Identity** — [`UserRecord`] and the closed [`Role`] enumeration
//! 2. **The persisted record** — [`SessionRecord`], the exact JSON shape
//!    written to durable storage
//! 3. **Time** — [`Timestamp`] (wall-clock milliseconds) and the [`Clock`]
//!    seam that makes expiry logic deterministic in tests
//!
//! # How it fits in the stack
//!
//! ```text
//! Runtime agent (above)     ← owns the controller, serializes commands
//!     ↕
//! Session / Store / Activity ← lifecycle logic over these types
//!     ↕
//! Model (this crate)         ← types only, no I/O, no policy
//! ```

mod time;
mod types;

pub use time::{Clock, ManualClock, SystemClock, Timestamp};
pub use types::{Role, SessionRecord, UserRecord};
