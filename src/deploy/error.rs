// ABOUTME: Error types for the deployment engine.
// ABOUTME: Any of these absorbs the run; the orchestrator reports it once.

use crate::archive::ArchiveError;

use super::uploader::UploadFailure;

/// Errors that end a deployment run.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The input artifact stream could not be opened.
    #[error("artifact fetch failed: {0}")]
    ArtifactFetch(String),

    /// The archive was malformed or truncated mid-decode.
    #[error("archive decode failed: {0}")]
    ArchiveDecode(#[from] ArchiveError),

    /// One or more puts failed. Every entry was still attempted.
    #[error("{failed} of {attempted} uploads failed, first: {first}",
        failed = .failures.len(),
        first = .failures.first().map(ToString::to_string).unwrap_or_default())]
    Upload {
        attempted: usize,
        failures: Vec<UploadFailure>,
    },

    /// The archive yielded no deployable files.
    #[error("archive contained no deployable files")]
    EmptyDeployment,

    /// Listing or batch delete failed after the deploy itself succeeded.
    #[error("cleanup failed: {0}")]
    Reconciliation(String),
}
