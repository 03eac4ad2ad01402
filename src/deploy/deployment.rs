// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::request::DeploymentRequest;

use super::state::{Completed, Initialized, Uploaded};

/// A deployment run in progress, parameterized by its current state.
///
/// Transitions consume the value and hand back the next state on success;
/// the error arm of each transition is the run's absorbing failure state.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) request: DeploymentRequest,
    pub(crate) state: S,
}

impl Deployment<Initialized> {
    pub fn new(request: DeploymentRequest) -> Self {
        Deployment {
            request,
            state: Initialized,
        }
    }
}

impl<S> Deployment<S> {
    pub fn request(&self) -> &DeploymentRequest {
        &self.request
    }
}

impl Deployment<Uploaded> {
    /// Keys attempted this run, in archive order, deduplicated.
    pub fn deployed_keys(&self) -> &[String] {
        &self.state.deployed
    }
}

impl Deployment<Completed> {
    pub fn uploaded_count(&self) -> usize {
        self.state.uploaded
    }

    pub fn deleted_count(&self) -> usize {
        self.state
            .reconciliation
            .as_ref()
            .map(|r| r.deleted)
            .unwrap_or(0)
    }

    /// Human-readable terminal message for the job report.
    pub fn summary(&self) -> String {
        match &self.state.reconciliation {
            Some(result) => format!(
                "Deployed {} file(s), removed {} stale object(s).",
                self.state.uploaded, result.deleted
            ),
            None => format!("Deployed {} file(s).", self.state.uploaded),
        }
    }
}
