//! The session store: load/save/clear of the persisted record.

use std::time::Duration;

use tracing::{debug, warn};
use vigil_model::{SessionRecord, Timestamp};

use crate::{StorageBackend, StoreError};

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

/// Configuration for record persistence.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum absolute age of a persisted record, measured from its
    /// `login_time`. Anything older is purged on load, remember-me or not.
    ///
    /// Default: 7 days.
    pub max_record_age: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_record_age: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

/// Reads and writes the single persisted [`SessionRecord`].
///
/// All three operations are infallible at this surface: backend and parse
/// failures are logged and normalized per the crate-level failure contract.
/// The controller is the store's only writer; the store itself holds no
/// session state.
pub struct SessionStore {
    backend: Box<dyn StorageBackend>,
    config: StoreConfig,
}

impl SessionStore {
    /// Creates a store over `backend` with the default 7-day record cap.
    pub fn new(backend: impl StorageBackend) -> Self {
        Self::with_config(backend, StoreConfig::default())
    }

    pub fn with_config(backend: impl StorageBackend, config: StoreConfig) -> Self {
        Self {
            backend: Box::new(backend),
            config,
        }
    }

    /// Loads the persisted record, if a valid and fresh one exists.
    ///
    /// Returns `None` when the record is absent, unreadable, unparsable,
    /// or older than [`StoreConfig::max_record_age`] — an over-age record
    /// is also deleted so it isn't re-inspected on every startup.
    pub fn load(&self, now: Timestamp) -> Option<SessionRecord> {
        let raw = match self.backend.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "session record unreadable, treating as absent");
                return None;
            }
        };

        let record: SessionRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "session record unparsable, treating as absent");
                return None;
            }
        };

        let age = record.age(now);
        if age > self.config.max_record_age {
            debug!(age_secs = age.as_secs(), "session record over max age, purging");
            self.clear();
            return None;
        }

        Some(record)
    }

    /// Serializes and overwrites the persisted record.
    pub fn save(&self, record: &SessionRecord) {
        let raw = match serde_json::to_string(record) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "failed to serialize session record");
                return;
            }
        };
        if let Err(e) = self.backend.write(&raw) {
            warn!(error = %e, "failed to persist session record");
        }
    }

    /// Deletes the persisted record. Idempotent.
    pub fn clear(&self) {
        if let Err(e) = self.backend.remove() {
            warn!(error = %e, "failed to clear session record");
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
