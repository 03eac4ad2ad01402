// ABOUTME: State transition methods for the deployment run.
// ABOUTME: Each method consumes self and returns the next state on success.

use std::collections::HashSet;

use futures::StreamExt;
use futures::stream::FuturesUnordered;

use crate::archive::{ArchiveError, decode_entries};
use crate::store::{ArtifactLocation, ArtifactSource, ObjectStore};

use super::Deployment;
use super::error::DeployError;
use super::reconcile::sweep_stale_objects;
use super::state::{Completed, Fetched, Initialized, Uploaded};
use super::uploader::{
    DeployedFileSet, MAX_CONCURRENT_UPLOADS, UploadFailure, object_key, upload_entry,
};

// =============================================================================
// Initialized -> Fetched
// =============================================================================

impl Deployment<Initialized> {
    /// Open the artifact stream and start the decoder.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::ArtifactFetch` if the stream cannot be opened.
    #[must_use = "deployment state must be used"]
    pub async fn fetch<F: ArtifactSource + ?Sized>(
        self,
        source: &F,
        location: &ArtifactLocation,
    ) -> Result<Deployment<Fetched>, DeployError> {
        tracing::info!(
            bucket = %location.bucket,
            key = %location.key,
            "fetching build artifact"
        );

        let reader = source
            .open(location)
            .await
            .map_err(|error| DeployError::ArtifactFetch(error.to_string()))?;

        Ok(Deployment {
            request: self.request,
            state: Fetched {
                entries: decode_entries(reader),
            },
        })
    }
}

// =============================================================================
// Fetched -> Uploaded
// =============================================================================

impl Deployment<Fetched> {
    /// Upload every file entry the decoder emits.
    ///
    /// Entries are dispatched as they become decodable, with at most
    /// `MAX_CONCURRENT_UPLOADS` puts in flight. Every outcome is collected
    /// before this returns: a decode error stops pulling entries but still
    /// waits for in-flight puts, and any put failure fails the run after
    /// all entries were attempted.
    ///
    /// # Errors
    ///
    /// `ArchiveDecode` on a broken archive, `EmptyDeployment` when nothing
    /// was deployable, `Upload` when one or more puts failed.
    #[must_use = "deployment state must be used"]
    pub async fn upload_all<S: ObjectStore + ?Sized>(
        self,
        store: &S,
    ) -> Result<Deployment<Uploaded>, DeployError> {
        let mut entries = self.state.entries;
        let deployed = DeployedFileSet::default();
        let mut failures: Vec<UploadFailure> = Vec::new();
        let mut decode_error: Option<ArchiveError> = None;
        let mut in_flight = FuturesUnordered::new();

        while let Some(item) = entries.next().await {
            match item {
                Ok(entry) => {
                    // The format declares directories as entries too.
                    if entry.path.is_empty() || entry.path.ends_with('/') {
                        continue;
                    }

                    let key = object_key(&entry.path, &self.request.key_prefix);

                    // A repeated path overwrites what came before it, so its
                    // put must not race the earlier one: drain in-flight
                    // puts before dispatching the overwrite.
                    if !deployed.record(&key) {
                        while let Some(outcome) = in_flight.next().await {
                            if let Err(failure) = outcome {
                                failures.push(failure);
                            }
                        }
                    }

                    in_flight.push(upload_entry(store, entry, key));

                    if in_flight.len() >= MAX_CONCURRENT_UPLOADS
                        && let Some(Err(failure)) = in_flight.next().await
                    {
                        failures.push(failure);
                    }
                }
                Err(error) => {
                    decode_error = Some(error);
                    break;
                }
            }
        }

        // Join every outstanding put before judging the run.
        while let Some(outcome) = in_flight.next().await {
            if let Err(failure) = outcome {
                failures.push(failure);
            }
        }

        if let Some(error) = decode_error {
            return Err(DeployError::ArchiveDecode(error));
        }

        if deployed.is_empty() {
            return Err(DeployError::EmptyDeployment);
        }

        let attempted = deployed.len();
        if !failures.is_empty() {
            return Err(DeployError::Upload {
                attempted,
                failures,
            });
        }

        tracing::info!(files = attempted, "all uploads complete");

        Ok(Deployment {
            request: self.request,
            state: Uploaded {
                deployed: deployed.into_keys(),
            },
        })
    }
}

// =============================================================================
// Uploaded -> Completed
// =============================================================================

impl Deployment<Uploaded> {
    /// Remove stale objects if the request asked for it, then complete.
    ///
    /// With `clean_absent_files` unset this is a pure transition with no
    /// network calls. Deployed files are never rolled back; a cleanup
    /// failure happens strictly after the deploy itself succeeded.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Reconciliation` on a listing or delete
    /// failure, citing the first per-key failure when there is one.
    #[must_use = "deployment state must be used"]
    pub async fn reconcile<S: ObjectStore + ?Sized>(
        self,
        store: &S,
    ) -> Result<Deployment<Completed>, DeployError> {
        let uploaded = self.state.deployed.len();

        if !self.request.clean_absent_files {
            return Ok(Deployment {
                request: self.request,
                state: Completed {
                    uploaded,
                    reconciliation: None,
                },
            });
        }

        let mut keep: HashSet<String> = self.state.deployed.iter().cloned().collect();
        keep.extend(self.request.ignore_keys.iter().cloned());

        let result = sweep_stale_objects(store, &self.request.key_prefix, &keep)
            .await
            .map_err(|error| DeployError::Reconciliation(error.to_string()))?;

        if let Some(first) = result.failures.first() {
            return Err(DeployError::Reconciliation(format!(
                "could not delete '{}': {}",
                first.key, first.detail
            )));
        }

        Ok(Deployment {
            request: self.request,
            state: Completed {
                uploaded,
                reconciliation: Some(result),
            },
        })
    }
}
