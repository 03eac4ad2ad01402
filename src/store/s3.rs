// ABOUTME: aws-sdk-s3 implementations of the store traits.
// ABOUTME: One client per invocation, handed in by the Lambda entrypoint.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectCannedAcl, ObjectIdentifier};
use bytes::Bytes;

use super::{
    ArtifactLocation, ArtifactReader, ArtifactSource, DeleteFailure, ListPage, ObjectStore,
    ObjectVisibility, StoreError,
};
use crate::types::BucketName;

/// DeleteObjects accepts at most this many keys per request.
const DELETE_BATCH_LIMIT: usize = 1000;

/// Website bucket backed by S3.
#[derive(Debug, Clone)]
pub struct S3WebsiteStore {
    client: aws_sdk_s3::Client,
    bucket: BucketName,
}

impl S3WebsiteStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: BucketName) -> Self {
        Self { client, bucket }
    }

    pub fn bucket(&self) -> &BucketName {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3WebsiteStore {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
        visibility: ObjectVisibility,
    ) -> Result<(), StoreError> {
        let acl = match visibility {
            ObjectVisibility::PublicRead => ObjectCannedAcl::PublicRead,
            ObjectVisibility::Private => ObjectCannedAcl::Private,
        };

        self.client
            .put_object()
            .bucket(self.bucket.as_str())
            .key(key)
            .body(ByteStream::from(body))
            .set_content_type(content_type.map(String::from))
            .acl(acl)
            .send()
            .await
            .map(|_| ())
            .map_err(|error| StoreError::Put {
                key: key.to_string(),
                detail: error.to_string(),
            })
    }

    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<&str>,
    ) -> Result<ListPage, StoreError> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(self.bucket.as_str())
            .prefix(prefix)
            .set_continuation_token(continuation.map(String::from))
            .send()
            .await
            .map_err(|error| StoreError::List {
                prefix: prefix.to_string(),
                detail: error.to_string(),
            })?;

        let keys = response
            .contents()
            .iter()
            .filter_map(|object| object.key().map(String::from))
            .collect();

        Ok(ListPage {
            keys,
            continuation: response.next_continuation_token().map(String::from),
        })
    }

    async fn delete_many(&self, keys: &[String]) -> Result<Vec<DeleteFailure>, StoreError> {
        let mut failures = Vec::new();

        for chunk in keys.chunks(DELETE_BATCH_LIMIT) {
            let objects: Vec<ObjectIdentifier> = chunk
                .iter()
                .map(|key| {
                    ObjectIdentifier::builder()
                        .key(key)
                        .build()
                        .map_err(|error| StoreError::Delete(error.to_string()))
                })
                .collect::<Result<_, _>>()?;

            let delete = Delete::builder()
                .set_objects(Some(objects))
                .quiet(true)
                .build()
                .map_err(|error| StoreError::Delete(error.to_string()))?;

            let response = self
                .client
                .delete_objects()
                .bucket(self.bucket.as_str())
                .delete(delete)
                .send()
                .await
                .map_err(|error| StoreError::Delete(error.to_string()))?;

            failures.extend(response.errors().iter().map(|error| DeleteFailure {
                key: error.key().unwrap_or_default().to_string(),
                detail: error
                    .message()
                    .unwrap_or("delete rejected without detail")
                    .to_string(),
            }));
        }

        Ok(failures)
    }
}

/// Input artifact reader using the job's scoped credentials.
#[derive(Debug, Clone)]
pub struct S3ArtifactSource {
    client: aws_sdk_s3::Client,
}

impl S3ArtifactSource {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArtifactSource for S3ArtifactSource {
    async fn open(&self, location: &ArtifactLocation) -> Result<ArtifactReader, StoreError> {
        let response = self
            .client
            .get_object()
            .bucket(&location.bucket)
            .key(&location.key)
            .send()
            .await
            .map_err(|error| StoreError::Fetch(error.to_string()))?;

        Ok(Box::pin(response.body.into_async_read()))
    }
}
