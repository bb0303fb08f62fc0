//! Error types for the runtime layer.

use vigil_session::AuthError;

/// Errors returned through a [`SessionHandle`](crate::SessionHandle).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// A credential rejection, passed through from the controller.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The agent task is gone — it was shut down or its handle channel
    /// closed.
    #[error("session agent unavailable")]
    Unavailable,
}
