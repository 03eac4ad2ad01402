// ABOUTME: Per-entry upload: key normalization, content type, single put.
// ABOUTME: Tracks every attempted key in the shared DeployedFileSet.

use parking_lot::Mutex;
use thiserror::Error;

use crate::archive::ArchiveEntry;
use crate::content_type::content_type_for;
use crate::store::{ObjectStore, ObjectVisibility, StoreError};

/// Upper bound on puts in flight at once.
pub const MAX_CONCURRENT_UPLOADS: usize = 8;

/// One put the store rejected or failed.
#[derive(Debug, Clone, Error)]
#[error("{key}: {detail}")]
pub struct UploadFailure {
    pub key: String,
    pub detail: String,
}

/// Derive the final object key for an archive path.
///
/// Strips a leading `./`, then prepends the prefix verbatim. No separator
/// is inserted between prefix and path; callers wanting one must end their
/// prefix with it. This mirrors the configured contract, not an oversight
/// to fix here.
pub fn object_key(path: &str, prefix: &str) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);

    if prefix.is_empty() {
        stripped.to_string()
    } else {
        format!("{prefix}{stripped}")
    }
}

/// Ordered set of keys attempted this run.
///
/// Append-only and safe under concurrent upload completions; a key is held
/// at most once per literal path (duplicate archive paths last-win at the
/// store).
#[derive(Debug, Default)]
pub struct DeployedFileSet {
    keys: Mutex<Vec<String>>,
}

impl DeployedFileSet {
    /// Record an attempted key. Returns false if it was already present.
    pub fn record(&self, key: &str) -> bool {
        let mut keys = self.keys.lock();
        if keys.iter().any(|k| k == key) {
            return false;
        }
        keys.push(key.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.keys.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.lock().is_empty()
    }

    pub fn into_keys(self) -> Vec<String> {
        self.keys.into_inner()
    }
}

/// Upload one fully buffered entry under its final key.
///
/// Visibility is always public-read; the bucket serves a website. A
/// failure is returned for collection, not propagated as fatal.
pub async fn upload_entry<S: ObjectStore + ?Sized>(
    store: &S,
    entry: ArchiveEntry,
    key: String,
) -> Result<String, UploadFailure> {
    let content_type = content_type_for(&key);
    let size = entry.body.len();

    match store
        .put(&key, entry.body, content_type, ObjectVisibility::PublicRead)
        .await
    {
        Ok(()) => {
            tracing::debug!(key = %key, size, content_type = ?content_type, "uploaded file");
            Ok(key)
        }
        Err(error) => {
            tracing::error!(key = %key, error = %error, "upload failed");
            Err(UploadFailure {
                detail: match error {
                    StoreError::Put { detail, .. } => detail,
                    other => other.to_string(),
                },
                key,
            })
        }
    }
}
