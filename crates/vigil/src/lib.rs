//! # Vigil
//!
//! Session lifecycle framework: credential validation, idle expiry, and
//! durable restore.
//!
//! Vigil owns the full life of an interactive session — login against a
//! [`CredentialDirectory`], write-through persistence of the session
//! record, activity-driven idle tracking with a periodic sweep, and
//! restore on the next start — behind a single cloneable
//! [`SessionHandle`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vigil::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), VigilError> {
//!     let handle = VigilBuilder::new()
//!         .file_storage("session.json")
//!         .spawn(StaticDirectory::demo());
//!
//!     handle.login("user@fundinsight.com", "user123", true).await?;
//!     let snapshot = handle.snapshot().await?;
//!     assert!(snapshot.is_authenticated);
//!     Ok(())
//! }
//! ```
//!
//! [`CredentialDirectory`]: vigil_session::CredentialDirectory
//! [`SessionHandle`]: vigil_runtime::SessionHandle

mod builder;
mod error;

pub use builder::VigilBuilder;
pub use error::VigilError;

/// Initializes a global `tracing` subscriber, filtered by `RUST_LOG`
/// (default `info`). Call once, early in `main`; embedding applications
/// that install their own subscriber should skip this.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Everything an embedding application typically needs.
pub mod prelude {
    pub use vigil_activity::{IdlePolicy, Interaction, SweepConfig};
    pub use vigil_model::{Clock, ManualClock, Role, SessionRecord, SystemClock, Timestamp, UserRecord};
    pub use vigil_runtime::{spawn_agent, AgentError, SessionHandle, SessionSnapshot};
    pub use vigil_session::{
        AuthError, CredentialDirectory, DirectoryEntry, SessionController, SessionPhase,
        StaticDirectory,
    };
    pub use vigil_store::{
        FileBackend, MemoryBackend, SessionStore, StorageBackend, StoreConfig,
    };

    pub use crate::{init_tracing, VigilBuilder, VigilError};
}
