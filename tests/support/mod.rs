// ABOUTME: Shared mocks and fixtures for integration tests.
// ABOUTME: In-memory store, artifact source, reporter, and a zip builder.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io::Write;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use pagelift::report::{JobReporter, ReportError};
use pagelift::store::{
    ArtifactLocation, ArtifactReader, ArtifactSource, DeleteFailure, ListPage, ObjectStore,
    ObjectVisibility, StoreError,
};

/// One recorded put call.
#[derive(Debug, Clone)]
pub struct RecordedPut {
    pub key: String,
    pub body: Bytes,
    pub content_type: Option<String>,
    pub visibility: ObjectVisibility,
}

/// In-memory object store with scripted failures and listings.
#[derive(Default)]
pub struct MockStore {
    pub puts: Mutex<Vec<RecordedPut>>,
    pub list_calls: Mutex<Vec<(String, Option<String>)>>,
    pub delete_calls: Mutex<Vec<Vec<String>>>,
    fail_put_keys: Mutex<HashSet<String>>,
    fail_delete_keys: Mutex<HashSet<String>>,
    pages: Mutex<Vec<Vec<String>>>,
    objects: Mutex<HashMap<String, Bytes>>,
    put_delays: Mutex<HashMap<String, u64>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make puts for `key` fail.
    pub fn fail_put(&self, key: &str) {
        self.fail_put_keys.lock().insert(key.to_string());
    }

    /// Make batch deletes report a per-key failure for `key`.
    pub fn fail_delete(&self, key: &str) {
        self.fail_delete_keys.lock().insert(key.to_string());
    }

    /// Script the listing as a sequence of pages.
    pub fn set_pages(&self, pages: Vec<Vec<&str>>) {
        *self.pages.lock() = pages
            .into_iter()
            .map(|page| page.into_iter().map(String::from).collect())
            .collect();
    }

    pub fn put_keys(&self) -> Vec<String> {
        self.puts.lock().iter().map(|p| p.key.clone()).collect()
    }

    /// Stall the next put for `key` by `millis` before it lands.
    pub fn delay_next_put(&self, key: &str, millis: u64) {
        self.put_delays.lock().insert(key.to_string(), millis);
    }

    /// Body currently stored under `key`, if any put for it succeeded.
    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.objects.lock().get(key).cloned()
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
        visibility: ObjectVisibility,
    ) -> Result<(), StoreError> {
        self.puts.lock().push(RecordedPut {
            key: key.to_string(),
            body: body.clone(),
            content_type: content_type.map(String::from),
            visibility,
        });

        let delay = self.put_delays.lock().remove(key);
        if let Some(millis) = delay {
            tokio::time::sleep(std::time::Duration::from_millis(millis)).await;
        }

        if self.fail_put_keys.lock().contains(key) {
            return Err(StoreError::Put {
                key: key.to_string(),
                detail: "access denied".to_string(),
            });
        }

        self.objects.lock().insert(key.to_string(), body);

        Ok(())
    }

    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<&str>,
    ) -> Result<ListPage, StoreError> {
        self.list_calls
            .lock()
            .push((prefix.to_string(), continuation.map(String::from)));

        let pages = self.pages.lock();
        let index = match continuation {
            None => 0,
            Some(token) => token.parse::<usize>().map_err(|_| StoreError::List {
                prefix: prefix.to_string(),
                detail: format!("bad continuation token '{token}'"),
            })?,
        };

        let keys = pages.get(index).cloned().unwrap_or_default();
        let continuation = (index + 1 < pages.len()).then(|| (index + 1).to_string());

        Ok(ListPage { keys, continuation })
    }

    async fn delete_many(&self, keys: &[String]) -> Result<Vec<DeleteFailure>, StoreError> {
        self.delete_calls.lock().push(keys.to_vec());

        let failing = self.fail_delete_keys.lock();
        Ok(keys
            .iter()
            .filter(|key| failing.contains(*key))
            .map(|key| DeleteFailure {
                key: key.clone(),
                detail: "access denied".to_string(),
            })
            .collect())
    }
}

/// Artifact source serving fixed bytes.
pub struct MockArtifactSource {
    bytes: Vec<u8>,
}

impl MockArtifactSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

#[async_trait]
impl ArtifactSource for MockArtifactSource {
    async fn open(&self, _location: &ArtifactLocation) -> Result<ArtifactReader, StoreError> {
        Ok(Box::pin(std::io::Cursor::new(self.bytes.clone())))
    }
}

/// Artifact source whose open always fails.
pub struct BrokenArtifactSource;

#[async_trait]
impl ArtifactSource for BrokenArtifactSource {
    async fn open(&self, location: &ArtifactLocation) -> Result<ArtifactReader, StoreError> {
        Err(StoreError::Fetch(format!(
            "no such object {}/{}",
            location.bucket, location.key
        )))
    }
}

/// Records terminal reports.
#[derive(Default)]
pub struct MockReporter {
    pub successes: Mutex<Vec<(String, String)>>,
    pub failures: Mutex<Vec<(String, String, String)>>,
}

impl MockReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report_count(&self) -> usize {
        self.successes.lock().len() + self.failures.lock().len()
    }
}

#[async_trait]
impl JobReporter for MockReporter {
    async fn report_success(&self, job_id: &str, message: &str) -> Result<(), ReportError> {
        self.successes
            .lock()
            .push((job_id.to_string(), message.to_string()));
        Ok(())
    }

    async fn report_failure(
        &self,
        job_id: &str,
        message: &str,
        execution_id: &str,
    ) -> Result<(), ReportError> {
        self.failures.lock().push((
            job_id.to_string(),
            message.to_string(),
            execution_id.to_string(),
        ));
        Ok(())
    }
}

/// Build a deflate zip archive in memory. Paths ending in `/` become
/// directory records.
pub fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::FileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    for (path, contents) in entries {
        if path.ends_with('/') {
            writer
                .add_directory(path.trim_end_matches('/'), options)
                .expect("add directory");
        } else {
            writer.start_file(*path, options).expect("start file");
            writer
                .write_all(contents.as_bytes())
                .expect("write file body");
        }
    }

    writer.finish().expect("finish archive").into_inner()
}

pub fn artifact_location() -> ArtifactLocation {
    ArtifactLocation {
        bucket: "codepipeline-artifacts".to_string(),
        key: "BuildOutput/abc123.zip".to_string(),
    }
}
