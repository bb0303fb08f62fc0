//! Credential validation against an external directory.
//!
//! Vigil doesn't own a user database — the directory is an external
//! collaborator. The lifecycle depends only on the [`CredentialDirectory`]
//! trait: one method that takes an identifier and a secret and returns a
//! user record or a rejection. Wire it to a static table, a remote API,
//! whatever — the state machine doesn't care.

use tracing::debug;
use vigil_model::{Role, UserRecord};

use crate::AuthError;

/// Maps `(identifier, secret)` to a user record.
///
/// `Send + Sync + 'static` because the directory is shared with the
/// long-lived session owner.
///
/// # Matching rules
///
/// Implementations must follow the canonical comparison contract:
/// - the identifier is matched case-insensitively after trimming
///   whitespace
/// - the secret is matched exactly (case-sensitive)
/// - rejection is always [`AuthError::InvalidCredentials`], never anything
///   that distinguishes an unknown identifier from a wrong secret
pub trait CredentialDirectory: Send + Sync + 'static {
    /// Validates the pair and returns the matching user.
    fn verify(&self, identifier: &str, secret: &str) -> Result<UserRecord, AuthError>;
}

// ---------------------------------------------------------------------------
// StaticDirectory
// ---------------------------------------------------------------------------

/// One entry in a [`StaticDirectory`].
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    /// The plaintext secret. This directory exists for demos and tests;
    /// hashing credentials is explicitly out of scope for the core.
    pub secret: String,
    pub user: UserRecord,
}

impl DirectoryEntry {
    pub fn new(secret: impl Into<String>, user: UserRecord) -> Self {
        Self {
            secret: secret.into(),
            user,
        }
    }
}

/// A fixed in-memory credential table.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    entries: Vec<DirectoryEntry>,
}

impl StaticDirectory {
    pub fn new(entries: Vec<DirectoryEntry>) -> Self {
        Self { entries }
    }

    /// The three demo accounts (admin, advisor, regular user). Handy for
    /// demos and tests; nothing in the lifecycle refers to it.
    pub fn demo() -> Self {
        let account = |email: &str, secret: &str, name: &str, role: Role, id: &str, avatar: &str| {
            DirectoryEntry::new(
                secret,
                UserRecord {
                    id: Some(id.into()),
                    avatar: Some(avatar.into()),
                    ..UserRecord::new(email, name, role)
                },
            )
        };

        Self::new(vec![
            account(
                "admin@fundinsight.com",
                "admin123",
                "Admin User",
                Role::Admin,
                "admin-001",
                "👨‍💼",
            ),
            account(
                "advisor@fundinsight.com",
                "advisor123",
                "Jane Advisor",
                Role::FinancialAdvisor,
                "advisor-001",
                "👩‍💼",
            ),
            account(
                "user@fundinsight.com",
                "user123",
                "John Investor",
                Role::RegularUser,
                "user-001",
                "👤",
            ),
        ])
    }
}

impl CredentialDirectory for StaticDirectory {
    fn verify(&self, identifier: &str, secret: &str) -> Result<UserRecord, AuthError> {
        let normalized = identifier.trim().to_lowercase();

        let found = self
            .entries
            .iter()
            .find(|e| e.user.email.to_lowercase() == normalized && e.secret == secret);

        match found {
            Some(entry) => Ok(entry.user.clone()),
            None => {
                debug!("credential verification failed");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
