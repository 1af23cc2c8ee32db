//! Domain errors for the Changeling extraction system.

use thiserror::Error;

/// Errors surfaced by an extraction run or one of its collaborators.
///
/// The first four variants end a run in the `Error` state. `SyncFailure`
/// is logged and swallowed so the run still reaches `Complete`.
/// `Cancelled` is control flow: `stop` already forced the session to
/// `Idle`, the background task just unwinds.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no supported host application is installed")]
    HostAppUnavailable,

    #[error("required UI element not found: {0}")]
    TargetNotFound(String),

    #[error("UI tree unavailable: {0}")]
    UiUnavailable(String),

    #[error("contact directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("sync failed: {0}")]
    SyncFailure(String),

    #[error("a run is already in progress")]
    RunInProgress,

    #[error("run cancelled")]
    Cancelled,
}

pub type DomainResult<T> = Result<T, ExtractionError>;

impl From<serde_json::Error> for ExtractionError {
    fn from(err: serde_json::Error) -> Self {
        ExtractionError::SyncFailure(err.to_string())
    }
}
