// ABOUTME: Drives one deployment run and emits the single terminal report.
// ABOUTME: Pure over the store/source/reporter seams; AWS wiring is in main.

use crate::deploy::{Completed, DeployError, Deployment};
use crate::error::Error;
use crate::report::JobReporter;
use crate::request::DeploymentRequest;
use crate::store::{ArtifactLocation, ArtifactSource, ObjectStore};

/// Identity of the pipeline job this invocation answers to.
#[derive(Debug, Clone)]
pub struct JobContext {
    pub job_id: String,
    /// Lambda request id, attached to failure reports for correlation.
    pub execution_id: String,
}

/// Run the deployment and report exactly one terminal outcome.
///
/// On success the success message is reported and returned. On any run
/// failure a single failure report carries the cause, and the underlying
/// error is surfaced to the caller; a failure of the failure report itself
/// is logged but does not mask the run error.
pub async fn execute_job<F, S, R>(
    ctx: &JobContext,
    request: DeploymentRequest,
    location: &ArtifactLocation,
    source: &F,
    store: &S,
    reporter: &R,
) -> Result<String, Error>
where
    F: ArtifactSource + ?Sized,
    S: ObjectStore + ?Sized,
    R: JobReporter + ?Sized,
{
    tracing::info!(
        job_id = %ctx.job_id,
        bucket = %request.target_bucket,
        prefix = %request.key_prefix,
        clean = request.clean_absent_files,
        "starting deployment"
    );

    match run(request, location, source, store).await {
        Ok(done) => {
            let message = done.summary();
            reporter.report_success(&ctx.job_id, &message).await?;
            Ok(message)
        }
        Err(error) => {
            tracing::error!(job_id = %ctx.job_id, error = %error, "deployment failed");

            if let Err(report_error) = reporter
                .report_failure(&ctx.job_id, &error.to_string(), &ctx.execution_id)
                .await
            {
                // The run error stays the authoritative outcome.
                tracing::error!(error = %report_error, "failure report did not go through");
            }

            Err(error.into())
        }
    }
}

async fn run<F, S>(
    request: DeploymentRequest,
    location: &ArtifactLocation,
    source: &F,
    store: &S,
) -> Result<Deployment<Completed>, DeployError>
where
    F: ArtifactSource + ?Sized,
    S: ObjectStore + ?Sized,
{
    Deployment::new(request)
        .fetch(source, location)
        .await?
        .upload_all(store)
        .await?
        .reconcile(store)
        .await
}
