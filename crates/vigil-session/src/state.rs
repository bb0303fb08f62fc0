//! The lifecycle phase of a session.

/// The state machine has three conceptual states:
///
/// ```text
///   LoggedOut ──(login ok)──→ Active ──(stale)──→ Expired
///       ↑                        │                   │
///       └───────(logout)─────────┘←──(automatic)─────┘
/// ```
///
/// **Expired** is transient: the controller performs
/// Active → Expired → LoggedOut as one atomic visible transition, leaving
/// behind only the one-shot expired flag. Observers therefore only ever
/// see the two phases below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session. Initial state, and the terminal state after logout or
    /// expiry.
    LoggedOut,

    /// A user is authenticated and the inactivity clock is running.
    Active,
}

impl SessionPhase {
    /// Returns `true` when a user is authenticated.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoggedOut => write!(f, "LoggedOut"),
            Self::Active => write!(f, "Active"),
        }
    }
}
