//! The session controller: owner of the in-memory session state.
//!
//! This is the central piece of the lifecycle. It's responsible for:
//! - Validating credentials on login (through the directory)
//! - Restoring a persisted session at startup
//! - Registering interaction signals and write-through persistence
//! - Expiring the session when it goes stale
//! - Clearing everything on logout
//!
//! # Concurrency note
//!
//! `SessionController` is NOT thread-safe by itself — all methods take
//! `&mut self`. This is intentional: the controller is owned by a single
//! task (the runtime agent's command loop) and every mutation arrives
//! through that loop in strict order, so no locking is needed here.

use std::sync::Arc;

use tracing::{debug, info, trace};
use vigil_activity::{IdlePolicy, Interaction};
use vigil_model::{Clock, Role, SessionRecord, Timestamp, UserRecord};
use vigil_store::SessionStore;

use crate::{AuthError, CredentialDirectory, SessionPhase};

/// Owns the in-memory session state and drives the lifecycle state
/// machine.
///
/// ## Lifecycle
///
/// ```text
/// restore() ──→ [Active]  ←── login()
///                  │
///     record_interaction() / check_idle()
///                  │ (stale)
///                  ▼
///              [Expired] ──(automatic)──→ [LoggedOut]
///                                              ↑
///                                          logout()
/// ```
///
/// The controller is the **only writer** to the session store. Activity
/// signals and the periodic sweep are pure inputs; they hold no state of
/// their own.
pub struct SessionController {
    directory: Arc<dyn CredentialDirectory>,
    store: SessionStore,
    clock: Arc<dyn Clock>,
    policy: IdlePolicy,

    /// In-memory mirror of the persisted record. `Some` ⇔ Active.
    record: Option<SessionRecord>,

    /// Acting role. Defaults to the user's directory role on login, but
    /// independently settable while Active.
    role: Role,

    /// One-shot "session expired" notice. Set on the stale transition,
    /// cleared by the next successful login.
    expired: bool,

    /// Ephemeral fund selection. Never persisted; cleared on logout.
    selected_funds: Vec<String>,
}

impl SessionController {
    /// Creates a controller in the LoggedOut state with the default
    /// 30-minute inactivity window.
    pub fn new(
        directory: Arc<dyn CredentialDirectory>,
        store: SessionStore,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_policy(directory, store, clock, IdlePolicy::default())
    }

    pub fn with_policy(
        directory: Arc<dyn CredentialDirectory>,
        store: SessionStore,
        clock: Arc<dyn Clock>,
        policy: IdlePolicy,
    ) -> Self {
        Self {
            directory,
            store,
            clock,
            policy,
            record: None,
            role: Role::default(),
            expired: false,
            selected_funds: Vec::new(),
        }
    }

    // -- Transitions --------------------------------------------------------

    /// Restores a persisted session at startup.
    ///
    /// If the store yields a record (absent/corrupt/over-age all normalize
    /// to `None`), the controller goes directly to Active with the
    /// record's original timestamps. Deliberately **no** freshness
    /// re-check against the inactivity window here: a long-idle tab that
    /// reloads renders as authenticated immediately and only expires on
    /// the next interaction or sweep.
    pub fn restore(&mut self) {
        let now = self.clock.now();
        if let Some(record) = self.store.load(now) {
            info!(
                email = %record.user.email,
                login_time = %record.login_time,
                "session restored from store"
            );
            self.role = record.user.role;
            self.record = Some(record);
        } else {
            debug!("no persisted session to restore");
        }
    }

    /// Attempts to establish a session.
    ///
    /// On success: LoggedOut (or Active — a duplicate login overwrites,
    /// last call wins) → Active, timestamps set to now, record persisted,
    /// and the one-shot expired flag cleared.
    ///
    /// On rejection the state is left untouched and the reason is
    /// returned; it never distinguishes unknown identifier from wrong
    /// secret.
    pub fn login(
        &mut self,
        identifier: &str,
        secret: &str,
        remember_me: bool,
    ) -> Result<(), AuthError> {
        let user = self.directory.verify(identifier, secret)?;
        let now = self.clock.now();

        info!(email = %user.email, role = %user.role, "login succeeded");

        self.role = user.role;
        let record = SessionRecord::new(user, now, remember_me);
        self.store.save(&record);
        self.record = Some(record);
        self.expired = false;

        Ok(())
    }

    /// Clears the session and all ephemeral state. Idempotent — safe to
    /// call in any state, always leaves LoggedOut with the store cleared.
    pub fn logout(&mut self) {
        if let Some(record) = &self.record {
            info!(email = %record.user.email, "logout");
        }
        self.record = None;
        self.role = Role::default();
        self.selected_funds.clear();
        self.store.clear();
    }

    /// Registers a discrete interaction signal.
    ///
    /// While Active and fresh: advances `last_activity_time` and
    /// re-persists the record (write-through). If the session already went
    /// stale, the signal cannot manufacture activity — it triggers the
    /// expiry transition instead. No-op while LoggedOut.
    pub fn record_interaction(&mut self, interaction: Interaction) {
        let Some(record) = &mut self.record else {
            return;
        };

        let now = self.clock.now();
        if self.policy.is_stale(record.last_activity_time, now) {
            self.expire();
            return;
        }

        record.touch(now);
        self.store.save(record);
        trace!(%interaction, %now, "activity recorded");
    }

    /// The periodic sweep path: re-evaluates staleness without updating
    /// `last_activity_time`. No-op while LoggedOut.
    pub fn check_idle(&mut self) {
        let Some(record) = &self.record else {
            return;
        };

        let now = self.clock.now();
        if self.policy.is_stale(record.last_activity_time, now) {
            self.expire();
        }
    }

    /// Overrides the acting role. Permitted only while Active; updates
    /// both the in-memory role and the persisted record's embedded user
    /// role. No effect while LoggedOut.
    ///
    /// This is a demo affordance, not a security boundary.
    pub fn set_role(&mut self, role: Role) {
        let Some(record) = &mut self.record else {
            debug!(%role, "set_role ignored while logged out");
            return;
        };

        record.user.role = role;
        self.role = role;
        self.store.save(record);
        info!(%role, "role switched");
    }

    /// Active → Expired → LoggedOut, as one visible transition.
    fn expire(&mut self) {
        if let Some(record) = self.record.take() {
            info!(
                email = %record.user.email,
                last_activity = %record.last_activity_time,
                "session expired (inactivity window elapsed)"
            );
        }
        self.role = Role::default();
        self.expired = true;
        self.store.clear();
    }

    // -- Ephemeral selection state ------------------------------------------

    /// Adds the fund to the selection, or removes it if already selected.
    pub fn toggle_fund_selection(&mut self, fund_id: &str) {
        if let Some(pos) = self.selected_funds.iter().position(|f| f == fund_id) {
            self.selected_funds.remove(pos);
        } else {
            self.selected_funds.push(fund_id.to_owned());
        }
    }

    pub fn clear_selected_funds(&mut self) {
        self.selected_funds.clear();
    }

    // -- Read surface -------------------------------------------------------

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        if self.record.is_some() {
            SessionPhase::Active
        } else {
            SessionPhase::LoggedOut
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase().is_authenticated()
    }

    /// The authenticated user, if any.
    pub fn user(&self) -> Option<&UserRecord> {
        self.record.as_ref().map(|r| &r.user)
    }

    /// The acting role. Defaults to [`Role::RegularUser`] while
    /// LoggedOut.
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn login_time(&self) -> Option<Timestamp> {
        self.record.as_ref().map(|r| r.login_time)
    }

    pub fn last_activity_time(&self) -> Option<Timestamp> {
        self.record.as_ref().map(|r| r.last_activity_time)
    }

    /// Whether the last session ended by inactivity expiry. Stays set so
    /// the login view can show its notice; cleared by the next successful
    /// login.
    pub fn is_session_expired(&self) -> bool {
        self.expired
    }

    pub fn selected_funds(&self) -> &[String] {
        &self.selected_funds
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for the controller state machine.
    //!
    //! Time-dependent behavior is driven by a [`ManualClock`] — tests
    //! advance the clock by minutes or days and then poke the same entry
    //! points the runtime would (interaction signals, the sweep path).
    //! No sleeping, no real timers.

    use std::time::Duration;

    use vigil_model::ManualClock;
    use vigil_store::{MemoryBackend, SessionStore, StorageBackend};

    use super::*;
    use crate::StaticDirectory;

    const MINUTE: Duration = Duration::from_secs(60);
    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    // -- Helpers ----------------------------------------------------------

    struct Harness {
        controller: SessionController,
        clock: Arc<ManualClock>,
        backend: SharedBackend,
    }

    /// A memory backend that can be inspected from outside the controller
    /// (the controller consumes its `SessionStore` by value).
    #[derive(Clone, Default)]
    struct SharedBackend(Arc<MemoryBackend>);

    impl StorageBackend for SharedBackend {
        fn read(&self) -> Result<Option<String>, vigil_store::StoreError> {
            self.0.read()
        }
        fn write(&self, raw: &str) -> Result<(), vigil_store::StoreError> {
            self.0.write(raw)
        }
        fn remove(&self) -> Result<(), vigil_store::StoreError> {
            self.0.remove()
        }
    }

    fn harness() -> Harness {
        // Start the clock well past zero so age math never saturates.
        let clock = Arc::new(ManualClock::at(Timestamp::from_millis(1_000_000)));
        let backend = SharedBackend::default();
        let controller = SessionController::new(
            Arc::new(StaticDirectory::demo()),
            SessionStore::new(backend.clone()),
            Arc::clone(&clock) as Arc<dyn Clock>,
        );
        Harness {
            controller,
            clock,
            backend,
        }
    }

    fn login_user(h: &mut Harness) {
        h.controller
            .login("user@fundinsight.com", "user123", false)
            .expect("demo login should succeed");
    }

    fn stored_record(h: &Harness) -> Option<SessionRecord> {
        h.backend
            .read()
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    // =====================================================================
    // login()
    // =====================================================================

    #[test]
    fn test_login_valid_credentials_becomes_active() {
        let mut h = harness();

        login_user(&mut h);

        assert_eq!(h.controller.phase(), SessionPhase::Active);
        assert!(h.controller.is_authenticated());
        assert_eq!(h.controller.user().unwrap().name, "John Investor");
        assert_eq!(h.controller.role(), Role::RegularUser);
    }

    #[test]
    fn test_login_sets_both_timestamps_to_now() {
        let mut h = harness();

        login_user(&mut h);

        let now = h.clock.now();
        assert_eq!(h.controller.login_time(), Some(now));
        assert_eq!(h.controller.last_activity_time(), Some(now));
    }

    #[test]
    fn test_login_persists_record() {
        let mut h = harness();

        login_user(&mut h);

        let record = stored_record(&h).expect("record should be persisted");
        assert_eq!(record.user.email, "user@fundinsight.com");
        assert!(!record.remember_me);
    }

    #[test]
    fn test_login_invalid_credentials_stays_logged_out() {
        let mut h = harness();

        let result = h.controller.login("user@fundinsight.com", "wrong", false);

        assert_eq!(result, Err(AuthError::InvalidCredentials));
        assert_eq!(h.controller.phase(), SessionPhase::LoggedOut);
        assert!(h.controller.user().is_none());
        assert!(stored_record(&h).is_none());
    }

    #[test]
    fn test_login_while_active_overwrites_last_call_wins() {
        let mut h = harness();
        login_user(&mut h);
        h.clock.advance(5 * MINUTE);

        h.controller
            .login("admin@fundinsight.com", "admin123", true)
            .unwrap();

        assert_eq!(h.controller.role(), Role::Admin);
        assert_eq!(h.controller.login_time(), Some(h.clock.now()));
        let record = stored_record(&h).unwrap();
        assert_eq!(record.user.email, "admin@fundinsight.com");
        assert!(record.remember_me);
    }

    #[test]
    fn test_failed_login_while_active_keeps_session() {
        let mut h = harness();
        login_user(&mut h);

        let _ = h.controller.login("admin@fundinsight.com", "nope", false);

        assert!(h.controller.is_authenticated());
        assert_eq!(h.controller.user().unwrap().email, "user@fundinsight.com");
    }

    // =====================================================================
    // logout()
    // =====================================================================

    #[test]
    fn test_logout_clears_everything() {
        let mut h = harness();
        login_user(&mut h);
        h.controller.set_role(Role::Admin);
        h.controller.toggle_fund_selection("fund-1");

        h.controller.logout();

        assert_eq!(h.controller.phase(), SessionPhase::LoggedOut);
        assert!(h.controller.user().is_none());
        assert_eq!(h.controller.role(), Role::RegularUser);
        assert!(h.controller.selected_funds().is_empty());
        assert!(stored_record(&h).is_none());
    }

    #[test]
    fn test_logout_twice_is_idempotent() {
        let mut h = harness();
        login_user(&mut h);

        h.controller.logout();
        h.controller.logout();

        assert_eq!(h.controller.phase(), SessionPhase::LoggedOut);
        assert!(stored_record(&h).is_none());
    }

    #[test]
    fn test_logout_while_logged_out_is_harmless() {
        let mut h = harness();
        h.controller.logout();
        assert_eq!(h.controller.phase(), SessionPhase::LoggedOut);
    }

    // =====================================================================
    // Activity and expiry
    // =====================================================================

    #[test]
    fn test_interaction_advances_last_activity_and_persists() {
        let mut h = harness();
        login_user(&mut h);
        let login_time = h.controller.login_time().unwrap();

        h.clock.advance(10 * MINUTE);
        h.controller.record_interaction(Interaction::KeyDown);

        assert_eq!(h.controller.last_activity_time(), Some(h.clock.now()));
        assert_eq!(h.controller.login_time(), Some(login_time));
        // Write-through: the persisted record carries the new timestamp.
        let record = stored_record(&h).unwrap();
        assert_eq!(record.last_activity_time, h.clock.now());
    }

    #[test]
    fn test_interaction_while_logged_out_is_noop() {
        let mut h = harness();
        h.controller.record_interaction(Interaction::Scroll);
        assert_eq!(h.controller.phase(), SessionPhase::LoggedOut);
    }

    #[test]
    fn test_sweep_before_window_keeps_session_active() {
        let mut h = harness();
        login_user(&mut h);

        h.clock.advance(29 * MINUTE);
        h.controller.check_idle();

        assert!(h.controller.is_authenticated());
        assert!(!h.controller.is_session_expired());
    }

    #[test]
    fn test_sweep_after_window_expires_session() {
        let mut h = harness();
        login_user(&mut h);

        h.clock.advance(31 * MINUTE);
        h.controller.check_idle();

        assert_eq!(h.controller.phase(), SessionPhase::LoggedOut);
        assert!(!h.controller.is_authenticated());
        assert!(h.controller.is_session_expired());
        assert!(stored_record(&h).is_none(), "expiry must clear the store");
    }

    #[test]
    fn test_sweep_exactly_at_window_keeps_session() {
        // Strict inequality: exactly 30 minutes idle is still fresh.
        let mut h = harness();
        login_user(&mut h);

        h.clock.advance(30 * MINUTE);
        h.controller.check_idle();

        assert!(h.controller.is_authenticated());
    }

    #[test]
    fn test_sweep_does_not_manufacture_activity() {
        let mut h = harness();
        login_user(&mut h);
        let t0 = h.controller.last_activity_time().unwrap();

        h.clock.advance(10 * MINUTE);
        h.controller.check_idle();

        assert_eq!(h.controller.last_activity_time(), Some(t0));
    }

    #[test]
    fn test_stale_interaction_expires_instead_of_refreshing() {
        // An interaction arriving after the window has already elapsed
        // cannot revive the session.
        let mut h = harness();
        login_user(&mut h);

        h.clock.advance(31 * MINUTE);
        h.controller.record_interaction(Interaction::PointerDown);

        assert_eq!(h.controller.phase(), SessionPhase::LoggedOut);
        assert!(h.controller.is_session_expired());
    }

    #[test]
    fn test_activity_keeps_extending_the_window() {
        let mut h = harness();
        login_user(&mut h);

        // 25 minutes idle, then an interaction, then 25 more: the session
        // stays fresh because staleness diffs against last activity, not
        // login time.
        h.clock.advance(25 * MINUTE);
        h.controller.record_interaction(Interaction::Scroll);
        h.clock.advance(25 * MINUTE);
        h.controller.check_idle();

        assert!(h.controller.is_authenticated());
    }

    #[test]
    fn test_expired_flag_resets_on_next_successful_login() {
        let mut h = harness();
        login_user(&mut h);
        h.clock.advance(31 * MINUTE);
        h.controller.check_idle();
        assert!(h.controller.is_session_expired());

        login_user(&mut h);

        assert!(!h.controller.is_session_expired());
        assert!(h.controller.is_authenticated());
    }

    #[test]
    fn test_expired_flag_survives_failed_login() {
        let mut h = harness();
        login_user(&mut h);
        h.clock.advance(31 * MINUTE);
        h.controller.check_idle();

        let _ = h.controller.login("user@fundinsight.com", "wrong", false);

        assert!(h.controller.is_session_expired());
    }

    #[test]
    fn test_expiry_fires_at_most_once() {
        let mut h = harness();
        login_user(&mut h);
        h.clock.advance(31 * MINUTE);

        h.controller.check_idle();
        // Further sweeps and interactions after the transition are no-ops.
        h.controller.check_idle();
        h.controller.record_interaction(Interaction::KeyDown);

        assert_eq!(h.controller.phase(), SessionPhase::LoggedOut);
        assert!(h.controller.is_session_expired());
    }

    // =====================================================================
    // restore()
    // =====================================================================

    #[test]
    fn test_restore_without_record_stays_logged_out() {
        let mut h = harness();
        h.controller.restore();
        assert_eq!(h.controller.phase(), SessionPhase::LoggedOut);
    }

    #[test]
    fn test_restore_fresh_record_becomes_active() {
        let mut h = harness();
        login_user(&mut h);
        let login_time = h.controller.login_time().unwrap();

        // Simulate a reload: a new controller over the same backing store.
        let mut restored = SessionController::new(
            Arc::new(StaticDirectory::demo()),
            SessionStore::new(h.backend.clone()),
            Arc::clone(&h.clock) as Arc<dyn Clock>,
        );
        restored.restore();

        assert!(restored.is_authenticated());
        assert_eq!(restored.login_time(), Some(login_time));
        assert_eq!(restored.role(), Role::RegularUser);
    }

    #[test]
    fn test_restore_long_idle_record_is_active_until_next_sweep() {
        // A tab idle past the inactivity window but inside the 7-day cap
        // restores as Active — no freshness re-check at restore time —
        // and expires on the first sweep.
        let mut h = harness();
        login_user(&mut h);
        h.clock.advance(2 * DAY);

        let mut restored = SessionController::new(
            Arc::new(StaticDirectory::demo()),
            SessionStore::new(h.backend.clone()),
            Arc::clone(&h.clock) as Arc<dyn Clock>,
        );
        restored.restore();
        assert!(restored.is_authenticated());

        restored.check_idle();
        assert!(!restored.is_authenticated());
        assert!(restored.is_session_expired());
    }

    #[test]
    fn test_restore_eight_day_old_record_stays_logged_out() {
        let mut h = harness();
        login_user(&mut h);
        h.clock.advance(8 * DAY);

        let mut restored = SessionController::new(
            Arc::new(StaticDirectory::demo()),
            SessionStore::new(h.backend.clone()),
            Arc::clone(&h.clock) as Arc<dyn Clock>,
        );
        restored.restore();

        assert_eq!(restored.phase(), SessionPhase::LoggedOut);
        assert!(stored_record(&h).is_none(), "over-age record is purged");
    }

    #[test]
    fn test_restore_six_day_old_record_becomes_active() {
        let mut h = harness();
        login_user(&mut h);
        h.clock.advance(6 * DAY);

        let mut restored = SessionController::new(
            Arc::new(StaticDirectory::demo()),
            SessionStore::new(h.backend.clone()),
            Arc::clone(&h.clock) as Arc<dyn Clock>,
        );
        restored.restore();

        assert!(restored.is_authenticated());
    }

    // =====================================================================
    // set_role()
    // =====================================================================

    #[test]
    fn test_set_role_while_active_updates_memory_and_store() {
        let mut h = harness();
        login_user(&mut h);

        h.controller.set_role(Role::Admin);

        assert_eq!(h.controller.role(), Role::Admin);
        assert_eq!(h.controller.user().unwrap().role, Role::Admin);
        let record = stored_record(&h).unwrap();
        assert_eq!(record.user.role, Role::Admin);
    }

    #[test]
    fn test_set_role_while_logged_out_is_noop() {
        let mut h = harness();

        h.controller.set_role(Role::Admin);

        assert_eq!(h.controller.role(), Role::RegularUser);
        assert_eq!(h.controller.phase(), SessionPhase::LoggedOut);
        assert!(stored_record(&h).is_none());
    }

    // =====================================================================
    // Fund selection (ephemeral state)
    // =====================================================================

    #[test]
    fn test_toggle_fund_selection_adds_then_removes() {
        let mut h = harness();

        h.controller.toggle_fund_selection("fund-1");
        h.controller.toggle_fund_selection("fund-2");
        assert_eq!(h.controller.selected_funds(), ["fund-1", "fund-2"]);

        h.controller.toggle_fund_selection("fund-1");
        assert_eq!(h.controller.selected_funds(), ["fund-2"]);
    }

    #[test]
    fn test_clear_selected_funds() {
        let mut h = harness();
        h.controller.toggle_fund_selection("fund-1");
        h.controller.clear_selected_funds();
        assert!(h.controller.selected_funds().is_empty());
    }

    // =====================================================================
    // Full lifecycle scenario
    // =====================================================================

    #[test]
    fn test_full_lifecycle_login_idle_expire_relogin() {
        // The end-to-end scenario: login, go idle past the window, one
        // sweep expires the session, logging in again clears the notice.
        let mut h = harness();

        login_user(&mut h);
        assert!(h.controller.is_authenticated());
        assert_eq!(h.controller.role(), Role::RegularUser);

        h.clock.advance(31 * MINUTE);
        h.controller.check_idle();
        assert!(!h.controller.is_authenticated());
        assert!(h.controller.is_session_expired());

        login_user(&mut h);
        assert!(h.controller.is_authenticated());
        assert!(!h.controller.is_session_expired());
    }
}
