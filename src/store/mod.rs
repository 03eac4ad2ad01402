// ABOUTME: Object store trait seam consumed by the deploy engine.
// ABOUTME: S3 implementations live in s3.rs; tests supply mocks.

mod s3;

pub use s3::{S3ArtifactSource, S3WebsiteStore};

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Boxed artifact byte stream handed to the archive decoder.
pub type ArtifactReader = Pin<Box<dyn AsyncRead + Send>>;

/// Object visibility applied on upload.
///
/// The deploy engine always uploads website assets as `PublicRead`; this is
/// a fixed policy, not configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectVisibility {
    Private,
    PublicRead,
}

/// Where an input artifact lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation {
    pub bucket: String,
    pub key: String,
}

/// One page of a key listing.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub keys: Vec<String>,
    /// Token for the next page; `None` means the listing is drained.
    pub continuation: Option<String>,
}

/// A single key the store refused to delete.
#[derive(Debug, Clone)]
pub struct DeleteFailure {
    pub key: String,
    pub detail: String,
}

/// Errors from object store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("put failed for {key}: {detail}")]
    Put { key: String, detail: String },

    #[error("listing failed under '{prefix}': {detail}")]
    List { prefix: String, detail: String },

    #[error("batch delete failed: {0}")]
    Delete(String),

    #[error("artifact read failed: {0}")]
    Fetch(String),
}

/// Write/list/delete operations against the target website bucket.
///
/// Implementations own the bucket they operate on; the engine only deals in
/// object keys.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store one object. `content_type` of `None` omits the header.
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
        visibility: ObjectVisibility,
    ) -> Result<(), StoreError>;

    /// Fetch one page of keys under `prefix`, continuing from the given
    /// token. The same listing must not be paginated concurrently.
    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<&str>,
    ) -> Result<ListPage, StoreError>;

    /// Delete the given keys, returning per-key failures. Implementations
    /// chunk to the store's batch limit.
    async fn delete_many(&self, keys: &[String]) -> Result<Vec<DeleteFailure>, StoreError>;
}

/// Read access to the input artifact, typically with scoped credentials
/// distinct from the website store's.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Open the artifact as a byte stream. The stream may fail mid-read;
    /// such failures surface through the archive decoder.
    async fn open(&self, location: &ArtifactLocation) -> Result<ArtifactReader, StoreError>;
}
