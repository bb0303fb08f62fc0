//! `VigilBuilder`: configures and spawns a session agent.
//!
//! This is the entry point for embedding Vigil. It ties together all the
//! layers: storage → store → controller → agent.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use vigil_activity::{IdlePolicy, SweepConfig};
use vigil_model::{Clock, SystemClock};
use vigil_runtime::{spawn_agent, SessionHandle};
use vigil_session::{CredentialDirectory, SessionController};
use vigil_store::{FileBackend, MemoryBackend, SessionStore, StorageBackend, StoreConfig};

/// Builder for configuring and starting a session agent.
///
/// # Example
///
/// ```rust,ignore
/// use vigil::prelude::*;
///
/// let handle = VigilBuilder::new()
///     .file_storage("/var/lib/myapp/session.json")
///     .inactivity_window(Duration::from_secs(30 * 60))
///     .spawn(my_directory);
/// ```
pub struct VigilBuilder {
    backend: Box<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    store_config: StoreConfig,
    policy: IdlePolicy,
    sweep: SweepConfig,
}

impl VigilBuilder {
    /// Creates a new builder with default settings: in-memory storage,
    /// the system clock, a 30-minute inactivity window, and a 60-second
    /// sweep.
    pub fn new() -> Self {
        Self {
            backend: Box::new(MemoryBackend::new()),
            clock: Arc::new(SystemClock),
            store_config: StoreConfig::default(),
            policy: IdlePolicy::default(),
            sweep: SweepConfig::default(),
        }
    }

    /// Persists the session record as a JSON file at `path`, so the
    /// session survives a process restart.
    pub fn file_storage(mut self, path: impl Into<PathBuf>) -> Self {
        self.backend = Box::new(FileBackend::new(path));
        self
    }

    /// Uses a custom storage backend.
    pub fn storage(mut self, backend: impl StorageBackend) -> Self {
        self.backend = Box::new(backend);
        self
    }

    /// Substitutes the time source. Tests pass a shared `ManualClock`
    /// here and advance it by hand.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Caps how old a persisted record may be before restore refuses it.
    pub fn max_record_age(mut self, age: Duration) -> Self {
        self.store_config.max_record_age = age;
        self
    }

    /// Sets the inactivity window after which an untouched session
    /// expires.
    pub fn inactivity_window(mut self, window: Duration) -> Self {
        self.policy.inactivity_window = window;
        self
    }

    /// Sets the idle-sweep period. A zero period disables the sweep;
    /// expiry then only happens lazily, on the next interaction.
    pub fn sweep_period(mut self, period: Duration) -> Self {
        self.sweep = SweepConfig::with_period(period);
        self
    }

    /// Builds the controller and spawns the agent task, validating
    /// credentials against `directory`.
    ///
    /// Must be called from within a Tokio runtime. The agent restores
    /// any persisted session before it processes its first command.
    pub fn spawn(self, directory: impl CredentialDirectory) -> SessionHandle {
        tracing::debug!(
            window_secs = self.policy.inactivity_window.as_secs(),
            sweep_secs = self.sweep.period.as_secs(),
            "spawning session agent"
        );
        let store = SessionStore::with_config(self.backend, self.store_config);
        let controller =
            SessionController::with_policy(Arc::new(directory), store, self.clock, self.policy);
        spawn_agent(controller, self.sweep)
    }
}

impl Default for VigilBuilder {
    fn default() -> Self {
        Self::new()
    }
}
