//! Unified error type for the Vigil framework.

use vigil_runtime::AgentError;
use vigil_session::AuthError;
use vigil_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `vigil` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum VigilError {
    /// A credential rejection. Its message is the only thing a login
    /// form should display.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A storage backend error (read, write, remove).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An agent error (rejection passed through the handle, or the
    /// agent task is gone).
    #[error(transparent)]
    Agent(#[from] AgentError),
}
