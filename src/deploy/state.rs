// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: State types carry their own data so transitions cannot skip it.

use crate::archive::EntryStream;

use super::reconcile::ReconciliationResult;

/// Initial state: request parsed, nothing fetched yet.
/// Available actions: `fetch()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Artifact stream open, decoder running.
/// Available actions: `upload_all()`
#[derive(Debug)]
pub struct Fetched {
    pub(crate) entries: EntryStream,
}

/// Every entry attempted and every outcome collected.
/// Available actions: `reconcile()`
#[derive(Debug)]
pub struct Uploaded {
    pub(crate) deployed: Vec<String>,
}

/// Terminal success state.
/// Available actions: `summary()`
#[derive(Debug)]
pub struct Completed {
    pub(crate) uploaded: usize,
    pub(crate) reconciliation: Option<ReconciliationResult>,
}
