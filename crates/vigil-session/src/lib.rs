//! Session lifecycle for Vigil.
//!
//! This crate is the core of the workspace. It handles:
//!
//! 1. **Credential validation** — who a visitor is
//!    ([`CredentialDirectory`] trait, [`StaticDirectory`])
//! 2. **The lifecycle state machine** — whether they are authenticated and
//!    whether their session went stale ([`SessionController`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Runtime agent (above)   ← serializes commands and the periodic sweep
//!     ↕
//! Session (this crate)    ← state machine, credential checks
//!     ↕
//! Store / Activity / Model ← persistence, staleness policy, types
//! ```

mod controller;
mod directory;
mod error;
mod state;

pub use controller::SessionController;
pub use directory::{CredentialDirectory, DirectoryEntry, StaticDirectory};
pub use error::AuthError;
pub use state::SessionPhase;
