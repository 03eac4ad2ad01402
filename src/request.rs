// ABOUTME: Per-invocation deployment request parsed from UserParameters.
// ABOUTME: Format is "bucket,cleanFlag,ignoreList(pipe-delimited),keyPrefix".

use std::collections::HashSet;
use thiserror::Error;

use crate::types::{BucketName, BucketNameError};

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("user parameters are empty; expected at least a bucket name")]
    Empty,

    #[error("invalid target bucket: {0}")]
    Bucket(#[from] BucketNameError),
}

/// Everything one invocation needs to know, parsed once from the event's
/// delimited parameter string. Immutable after construction.
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    pub target_bucket: BucketName,
    pub clean_absent_files: bool,
    pub ignore_keys: HashSet<String>,
    pub key_prefix: String,
}

impl DeploymentRequest {
    /// Parse `bucket,cleanFlag,ignoreList,keyPrefix`.
    ///
    /// Only the bucket is mandatory. The clean flag is the literal string
    /// `"true"`; anything else (or absence) disables reconciliation. The
    /// ignore list is pipe-delimited full object keys. The prefix is taken
    /// verbatim, including any trailing delimiter the caller wants.
    pub fn parse(user_parameters: &str) -> Result<Self, RequestError> {
        let mut fields = user_parameters.split(',').map(str::trim);

        let bucket = fields.next().filter(|b| !b.is_empty()).ok_or(RequestError::Empty)?;
        let clean = fields.next().map(|f| f == "true").unwrap_or(false);
        let ignore_keys: HashSet<String> = fields
            .next()
            .unwrap_or("")
            .split('|')
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        let key_prefix = fields.next().unwrap_or("").to_string();

        Ok(Self {
            target_bucket: BucketName::new(bucket)?,
            clean_absent_files: clean,
            ignore_keys,
            key_prefix,
        })
    }
}
