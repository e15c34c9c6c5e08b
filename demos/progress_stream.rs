//! Live progress streaming for a processing job.
//!
//! Creates a job from a YouTube URL, then follows it over the WebSocket
//! until it reaches a terminal state.
//!
//! Run with tracing enabled:
//! ```sh
//! RUST_LOG=info cargo run --example progress_stream --features jobs,ws,tracing
//! ```

use std::time::Duration;

use futures::StreamExt as _;
use tokio::time::timeout;
use tracing::{debug, info};
use ultrasinger_client_sdk::jobs::types::request::CreateJobRequest;
use ultrasinger_client_sdk::jobs::{self, JobSource, QualityPreset};
use ultrasinger_client_sdk::progress;
use ultrasinger_client_sdk::ws::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let jobs_client = jobs::Client::default();

    let request = CreateJobRequest::builder()
        .source(JobSource::Youtube)
        .youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        .language("en")
        .quality(QualityPreset::Fast)
        .build();

    let job = jobs_client.create_job(&request).await?;
    info!(job_id = %job.job_id, "Job created, streaming progress");

    // Connects immediately; drops of the connection are retried with backoff
    let client = progress::Client::new(
        ultrasinger_client_sdk::DEFAULT_WS_ENDPOINT,
        &job.job_id,
        Config::default(),
    )?;

    let mut updates = Box::pin(client.updates());

    while let Ok(Some(result)) = timeout(Duration::from_secs(120), updates.next()).await {
        match result {
            Ok(update) => {
                info!(
                    job_id = %update.job_id,
                    status = ?update.status,
                    step = ?update.step,
                    percentage = update.percentage,
                    message = %update.message
                );
                if update.status.is_terminal() {
                    break;
                }
            }
            Err(e) => debug!(stream = "progress", error = %e),
        }
    }

    info!(connected = client.is_connected(), state = ?client.state());
    if let Some(error) = client.last_error() {
        debug!(last_error = %error);
    }

    // Completed jobs expose a download URL for the UltraStar file
    if client
        .last_update()
        .is_some_and(|u| u.status == ultrasinger_client_sdk::types::JobStatus::Completed)
    {
        info!(url = %jobs_client.download_url(&job.job_id), "Result ready");
    }

    client.disconnect();

    Ok(())
}
