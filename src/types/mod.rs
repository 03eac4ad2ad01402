// ABOUTME: Validated domain types for pagelift.
// ABOUTME: Newtypes catch bad input at the edge instead of deep in a deploy.

mod bucket_name;

pub use bucket_name::{BucketName, BucketNameError};
