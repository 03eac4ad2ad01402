// ABOUTME: Serde types for the CodePipeline job event envelope.
// ABOUTME: Only the fields this action consumes are modeled.

use serde::Deserialize;
use thiserror::Error;

use crate::store::ArtifactLocation;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("event carries no input artifact")]
    MissingInputArtifact,
}

/// Top-level Lambda payload for a CodePipeline custom action.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineEvent {
    #[serde(rename = "CodePipeline.job")]
    pub job: PipelineJob,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineJob {
    pub id: String,
    #[serde(default)]
    pub account_id: Option<String>,
    pub data: JobData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobData {
    pub action_configuration: ActionConfiguration,
    #[serde(default)]
    pub input_artifacts: Vec<InputArtifact>,
    pub artifact_credentials: ArtifactCredentials,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionConfiguration {
    pub configuration: ActionSettings,
}

/// Action settings are PascalCase on the wire, unlike the rest of the job.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActionSettings {
    #[serde(default)]
    pub function_name: Option<String>,
    pub user_parameters: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputArtifact {
    #[serde(default)]
    pub name: Option<String>,
    pub location: InputArtifactLocation,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputArtifactLocation {
    pub s3_location: S3Location,
    #[serde(default, rename = "type")]
    pub location_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Location {
    pub bucket_name: String,
    pub object_key: String,
}

/// Temporary credentials scoped to reading the input artifact.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
}

impl PipelineJob {
    /// The S3 location of the artifact this action deploys.
    ///
    /// CodePipeline delivers the configured input artifacts in order; the
    /// first one is the deployment source.
    pub fn artifact_location(&self) -> Result<ArtifactLocation, EventError> {
        let artifact = self
            .data
            .input_artifacts
            .first()
            .ok_or(EventError::MissingInputArtifact)?;

        Ok(ArtifactLocation {
            bucket: artifact.location.s3_location.bucket_name.clone(),
            key: artifact.location.s3_location.object_key.clone(),
        })
    }

    pub fn user_parameters(&self) -> &str {
        &self.data.action_configuration.configuration.user_parameters
    }
}
