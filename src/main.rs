// ABOUTME: Lambda entry point for the pagelift CodePipeline action.
// ABOUTME: Builds per-invocation AWS clients and dispatches to the handler.

use aws_config::BehaviorVersion;
use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use pagelift::error::Error;
use pagelift::event::PipelineEvent;
use pagelift::handler::{JobContext, execute_job};
use pagelift::report::{CodePipelineReporter, JobReporter};
use pagelift::request::DeploymentRequest;
use pagelift::store::{S3ArtifactSource, S3WebsiteStore};

#[derive(Debug, Serialize)]
struct DeploymentResponse {
    message: String,
}

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_ansi(false)
        .init();

    lambda_runtime::run(service_fn(handle_request)).await
}

async fn handle_request(
    event: LambdaEvent<PipelineEvent>,
) -> Result<DeploymentResponse, LambdaError> {
    let job = event.payload.job;
    let ctx = JobContext {
        job_id: job.id.clone(),
        execution_id: event.context.request_id.clone(),
    };

    let base_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let reporter = CodePipelineReporter::new(aws_sdk_codepipeline::Client::new(&base_config));

    // Configuration problems still get their one failure report.
    let request = match DeploymentRequest::parse(job.user_parameters()) {
        Ok(request) => request,
        Err(error) => return Err(fail_job(&reporter, &ctx, error.into()).await),
    };
    let location = match job.artifact_location() {
        Ok(location) => location,
        Err(error) => return Err(fail_job(&reporter, &ctx, error.into()).await),
    };

    // The artifact lives in the pipeline's bucket and is only readable with
    // the scoped credentials the event carries.
    let credentials = aws_sdk_s3::config::Credentials::new(
        job.data.artifact_credentials.access_key_id.clone(),
        job.data.artifact_credentials.secret_access_key.clone(),
        Some(job.data.artifact_credentials.session_token.clone()),
        None,
        "codepipeline-artifact",
    );
    let artifact_config = aws_sdk_s3::config::Builder::from(&base_config)
        .credentials_provider(credentials)
        .build();
    let source = S3ArtifactSource::new(aws_sdk_s3::Client::from_conf(artifact_config));

    let store = S3WebsiteStore::new(
        aws_sdk_s3::Client::new(&base_config),
        request.target_bucket.clone(),
    );

    let message = execute_job(&ctx, request, &location, &source, &store, &reporter)
        .await
        .map_err(|error| LambdaError::from(error.to_string()))?;

    Ok(DeploymentResponse { message })
}

/// Report a pre-run failure and convert it for the runtime.
async fn fail_job(reporter: &CodePipelineReporter, ctx: &JobContext, error: Error) -> LambdaError {
    tracing::error!(job_id = %ctx.job_id, kind = ?error.kind(), error = %error, "invocation failed");

    if let Err(report_error) = reporter
        .report_failure(&ctx.job_id, &error.to_string(), &ctx.execution_id)
        .await
    {
        tracing::error!(error = %report_error, "failure report did not go through");
    }

    LambdaError::from(error.to_string())
}
