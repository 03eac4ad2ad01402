// ABOUTME: Stale-object reconciliation for the website bucket.
// ABOUTME: Drains the paginated listing, diffs against keepKeys, one batch delete.

use std::collections::HashSet;

use crate::store::{DeleteFailure, ObjectStore, StoreError};

/// Outcome of a reconciliation sweep.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationResult {
    pub deleted: usize,
    pub failures: Vec<DeleteFailure>,
}

/// Delete every key under `prefix` that is not in `keep`.
///
/// `keep` membership is the sole authority: a key that was just deployed
/// or explicitly ignored is never deleted, whatever the listing says.
/// The listing is fully drained, one page at a time, before the diff; the
/// store API does not allow concurrent pagination of one listing. An empty
/// stale set issues no delete call at all.
pub async fn sweep_stale_objects<S: ObjectStore + ?Sized>(
    store: &S,
    prefix: &str,
    keep: &HashSet<String>,
) -> Result<ReconciliationResult, StoreError> {
    let mut stale: Vec<String> = Vec::new();
    let mut continuation: Option<String> = None;

    loop {
        let page = store.list_page(prefix, continuation.as_deref()).await?;

        stale.extend(page.keys.into_iter().filter(|key| !keep.contains(key)));

        match page.continuation {
            Some(token) => continuation = Some(token),
            None => break,
        }
    }

    if stale.is_empty() {
        tracing::info!(prefix = %prefix, "no stale objects to remove");
        return Ok(ReconciliationResult::default());
    }

    tracing::info!(prefix = %prefix, stale = stale.len(), "removing stale objects");

    let failures = store.delete_many(&stale).await?;
    let deleted = stale.len() - failures.len();

    Ok(ReconciliationResult { deleted, failures })
}
