// ABOUTME: S3 bucket name validation.
// ABOUTME: Enforces the general-purpose bucket naming rules.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BucketNameError {
    #[error("bucket name cannot be empty")]
    Empty,

    #[error("bucket name must be between 3 and 63 characters")]
    BadLength,

    #[error("bucket name must start and end with a letter or digit")]
    BadBoundary,

    #[error("bucket name must be lowercase")]
    NotLowercase,

    #[error("invalid character in bucket name: '{0}'")]
    InvalidChar(char),
}

/// A validated S3 bucket name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketName(String);

impl BucketName {
    pub fn new(value: &str) -> Result<Self, BucketNameError> {
        if value.is_empty() {
            return Err(BucketNameError::Empty);
        }

        if value.len() < 3 || value.len() > 63 {
            return Err(BucketNameError::BadLength);
        }

        let first = value.chars().next().unwrap_or('-');
        let last = value.chars().next_back().unwrap_or('-');
        if !first.is_ascii_alphanumeric() || !last.is_ascii_alphanumeric() {
            return Err(BucketNameError::BadBoundary);
        }

        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(BucketNameError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' && c != '.' {
                return Err(BucketNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
