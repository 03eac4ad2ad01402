// ABOUTME: Deployment engine using the type state pattern.
// ABOUTME: Exports state markers, Deployment struct, uploader, and reconciler.

mod deployment;
mod error;
mod reconcile;
mod state;
mod transitions;
mod uploader;

pub use deployment::Deployment;
pub use error::DeployError;
pub use reconcile::{ReconciliationResult, sweep_stale_objects};
pub use state::{Completed, Fetched, Initialized, Uploaded};
pub use uploader::{DeployedFileSet, MAX_CONCURRENT_UPLOADS, UploadFailure, object_key};
