// ABOUTME: Unified invocation error with SNAFU pattern.
// ABOUTME: kind() feeds the failure-type tag on the job report.

use snafu::Snafu;

use crate::deploy::DeployError;
use crate::event::EventError;
use crate::report::ReportError;
use crate::request::RequestError;

/// Unified error for one Lambda invocation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("malformed pipeline event: {source}"))]
    Event { source: EventError },

    #[snafu(display("invalid user parameters: {source}"))]
    Request { source: RequestError },

    #[snafu(display("{source}"))]
    Deploy { source: DeployError },

    #[snafu(display("job report failed: {source}"))]
    Report { source: ReportError },
}

/// Error kind for programmatic handling and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The event envelope was missing required pieces.
    BadEvent,
    /// The UserParameters string did not parse.
    BadRequest,
    /// The artifact stream could not be opened.
    ArtifactFetch,
    /// The archive was malformed or truncated.
    ArchiveDecode,
    /// One or more uploads failed.
    Upload,
    /// The archive held nothing deployable.
    EmptyDeployment,
    /// Stale-object cleanup failed after the deploy.
    Cleanup,
    /// The terminal job report itself failed.
    Report,
}

impl Error {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Event { .. } => ErrorKind::BadEvent,
            Error::Request { .. } => ErrorKind::BadRequest,
            Error::Deploy { source } => match source {
                DeployError::ArtifactFetch(_) => ErrorKind::ArtifactFetch,
                DeployError::ArchiveDecode(_) => ErrorKind::ArchiveDecode,
                DeployError::Upload { .. } => ErrorKind::Upload,
                DeployError::EmptyDeployment => ErrorKind::EmptyDeployment,
                DeployError::Reconciliation(_) => ErrorKind::Cleanup,
            },
            Error::Report { .. } => ErrorKind::Report,
        }
    }
}

impl From<EventError> for Error {
    fn from(source: EventError) -> Self {
        Error::Event { source }
    }
}

impl From<RequestError> for Error {
    fn from(source: RequestError) -> Self {
        Error::Request { source }
    }
}

impl From<DeployError> for Error {
    fn from(source: DeployError) -> Self {
        Error::Deploy { source }
    }
}

impl From<ReportError> for Error {
    fn from(source: ReportError) -> Self {
        Error::Report { source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
