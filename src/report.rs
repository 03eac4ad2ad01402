// ABOUTME: Job reporter seam for the pipeline control plane.
// ABOUTME: CodePipelineReporter delivers the single terminal job result.

use async_trait::async_trait;
use aws_sdk_codepipeline::types::{FailureDetails, FailureType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("success report failed: {0}")]
    Success(String),

    #[error("failure report failed: {0}")]
    Failure(String),
}

/// Terminal job-status reporting. Exactly one of these calls happens per
/// invocation.
#[async_trait]
pub trait JobReporter: Send + Sync {
    async fn report_success(&self, job_id: &str, message: &str) -> Result<(), ReportError>;

    /// `execution_id` correlates the failure with this Lambda invocation.
    async fn report_failure(
        &self,
        job_id: &str,
        message: &str,
        execution_id: &str,
    ) -> Result<(), ReportError>;
}

/// Reporter backed by the CodePipeline API.
#[derive(Debug, Clone)]
pub struct CodePipelineReporter {
    client: aws_sdk_codepipeline::Client,
}

impl CodePipelineReporter {
    pub fn new(client: aws_sdk_codepipeline::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobReporter for CodePipelineReporter {
    async fn report_success(&self, job_id: &str, message: &str) -> Result<(), ReportError> {
        tracing::info!(job_id, message, "reporting job success");

        self.client
            .put_job_success_result()
            .job_id(job_id)
            .send()
            .await
            .map(|_| ())
            .map_err(|error| ReportError::Success(error.to_string()))
    }

    async fn report_failure(
        &self,
        job_id: &str,
        message: &str,
        execution_id: &str,
    ) -> Result<(), ReportError> {
        tracing::warn!(job_id, message, "reporting job failure");

        let details = FailureDetails::builder()
            .r#type(FailureType::JobFailed)
            .message(message)
            .external_execution_id(execution_id)
            .build()
            .map_err(|error| ReportError::Failure(error.to_string()))?;

        self.client
            .put_job_failure_result()
            .job_id(job_id)
            .failure_details(details)
            .send()
            .await
            .map(|_| ())
            .map_err(|error| ReportError::Failure(error.to_string()))
    }
}
