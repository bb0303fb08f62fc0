//! Error types for the session layer.

/// Errors surfaced through the `login` path.
///
/// This is the only user-visible error in the lifecycle. Storage failures
/// are swallowed by the store layer and expiry is a state transition, not
/// an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No matching identifier/secret pair in the directory.
    ///
    /// Deliberately one message for both "unknown identifier" and "wrong
    /// secret", so the login form can't be used to probe which
    /// identifiers are registered.
    #[error("Invalid email or password")]
    InvalidCredentials,
}
