//! Identity types and the persisted session record.
//!
//! [`SessionRecord`] is the one structure that survives a process restart —
//! it is serialized to JSON and written to durable storage under a single
//! key. Its field names are part of the on-disk format and must not change
//! without a migration story.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Timestamp;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// The role a user acts under.
///
/// A closed enumeration — unknown role strings in a persisted record fail
/// deserialization, which the store layer normalizes to "no session".
///
/// The serialized names are the human-facing strings the persisted format
/// uses (`"Financial Advisor"`, not `"FinancialAdvisor"`), so records
/// written by earlier builds keep parsing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
pub enum Role {
    Admin,

    #[serde(rename = "Financial Advisor")]
    FinancialAdvisor,

    #[serde(rename = "Data Analyst")]
    DataAnalyst,

    /// An ordinary authenticated visitor. The default role whenever no
    /// user is present.
    #[default]
    #[serde(rename = "User")]
    RegularUser,
}

impl Role {
    /// The role's serialized/display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::FinancialAdvisor => "Financial Advisor",
            Self::DataAnalyst => "Data Analyst",
            Self::RegularUser => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UserRecord
// ---------------------------------------------------------------------------

/// A user as issued by the credential directory.
///
/// Immutable once issued, except for `role`, which the controller may
/// override locally (role switching is a demo affordance, not a security
/// boundary).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique identifier (an email address).
    pub email: String,

    /// Display name.
    pub name: String,

    /// Current role. Defaults into the controller's `role` field on login.
    pub role: Role,

    /// Directory-assigned ID, if the directory provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl UserRecord {
    /// Convenience constructor for the required fields; optional fields
    /// start empty.
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            role,
            id: None,
            avatar: None,
            phone: None,
            created_at: None,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionRecord
// ---------------------------------------------------------------------------

/// The unit persisted to durable storage.
///
/// Invariant: `last_activity_time >= login_time`. A record on disk is
/// either fully valid or treated as absent — the store never surfaces a
/// partially-parsed record.
///
/// `#[serde(rename_all = "camelCase")]` pins the on-disk field names
/// (`loginTime`, `lastActivityTime`, `rememberMe`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub user: UserRecord,

    /// When the session was established.
    pub login_time: Timestamp,

    /// The most recent observed user interaction.
    pub last_activity_time: Timestamp,

    /// Whether the user asked to be remembered across reloads. Persisted
    /// verbatim; the lifecycle itself does not branch on it.
    pub remember_me: bool,
}

impl SessionRecord {
    /// A fresh record for a session established at `now`.
    pub fn new(user: UserRecord, now: Timestamp, remember_me: bool) -> Self {
        Self {
            user,
            login_time: now,
            last_activity_time: now,
            remember_me,
        }
    }

    /// Absolute age of the record: time since login.
    pub fn age(&self, now: Timestamp) -> Duration {
        now.since(self.login_time)
    }

    /// Registers an interaction at `now`, preserving the
    /// `last_activity_time >= login_time` invariant even if the wall clock
    /// stepped backwards.
    pub fn touch(&mut self, now: Timestamp) {
        self.last_activity_time = now.max(self.last_activity_time);
    }
}

// =========================================================================
// Tests
// =========================================================================
