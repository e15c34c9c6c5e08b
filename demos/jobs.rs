//! Job API explorer: health check, job creation, listing, and cleanup.
//!
//! Points at a locally running UltraSinger web backend.
//!
//! Run with tracing enabled:
//! ```sh
//! RUST_LOG=info,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example jobs --features jobs,tracing
//! ```

use tracing::{debug, info};
use ultrasinger_client_sdk::jobs::types::request::{CreateJobRequest, ListJobsRequest};
use ultrasinger_client_sdk::jobs::{Client, JobSource, QualityPreset};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let client = Client::default();

    match client.health().await {
        Ok(health) => info!(
            endpoint = "health",
            status = %health.status,
            active = health.jobs_active,
            queued = health.jobs_queued,
            total = health.jobs_total
        ),
        Err(e) => debug!(endpoint = "health", error = %e),
    }

    // Create a job from a YouTube URL
    let request = CreateJobRequest::builder()
        .source(JobSource::Youtube)
        .youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        .language("en")
        .quality(QualityPreset::Fast)
        .build();

    let job_id = match client.create_job(&request).await {
        Ok(job) => {
            info!(endpoint = "create_job", job_id = %job.job_id, status = ?job.status);
            Some(job.job_id)
        }
        Err(e) => {
            debug!(endpoint = "create_job", error = %e);
            None
        }
    };

    // List recent jobs
    match client.jobs(&ListJobsRequest::builder().limit(10).build()).await {
        Ok(listing) => {
            info!(endpoint = "jobs", total = listing.total);
            for job in &listing.jobs {
                info!(
                    endpoint = "jobs",
                    job_id = %job.job_id,
                    status = ?job.status,
                    title = job.title.as_deref().unwrap_or("<unknown>")
                );
            }
        }
        Err(e) => debug!(endpoint = "jobs", error = %e),
    }

    // Fetch, then cancel and delete the job we just created
    if let Some(job_id) = job_id {
        match client.job(&job_id).await {
            Ok(job) => {
                info!(endpoint = "job", job_id = %job.job_id, status = ?job.status);
                if let Some(progress) = &job.progress {
                    info!(
                        endpoint = "job",
                        step = ?progress.step,
                        percentage = progress.percentage
                    );
                }
                info!(endpoint = "download_url", url = %client.download_url(&job.job_id));
            }
            Err(e) => debug!(endpoint = "job", error = %e),
        }

        match client.cancel_job(&job_id).await {
            Ok(ack) => info!(endpoint = "cancel_job", message = %ack.message),
            Err(e) => debug!(endpoint = "cancel_job", error = %e),
        }

        match client.delete_job(&job_id).await {
            Ok(ack) => info!(endpoint = "delete_job", message = %ack.message),
            Err(e) => debug!(endpoint = "delete_job", error = %e),
        }
    }

    Ok(())
}
