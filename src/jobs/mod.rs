//! UltraSinger job API client and types.
//!
//! **Feature flag:** `jobs` (required to use this module)
//!
//! This module provides a client for the UltraSinger web backend's HTTP API:
//! uploading audio files, creating processing jobs, querying job state, and
//! downloading generated UltraStar files.
//!
//! ## Available Endpoints
//!
//! | Endpoint | Description |
//! |----------|-------------|
//! | `/health` | Backend health summary |
//! | `/api/upload` | Upload an audio file |
//! | `/api/jobs/create` | Create a processing job |
//! | `/api/jobs/{id}` | Get or delete a job |
//! | `/api/jobs` | List jobs with pagination |
//! | `/api/jobs/{id}/cancel` | Cancel a job |
//! | `/api/jobs/{id}/download` | Download the result (URL only, not fetched) |
//!
//! Real-time progress arrives over a separate WebSocket channel; see the
//! `progress` module (feature `ws`).
//!
//! # Example
//!
//! ```no_run
//! use ultrasinger_client_sdk::jobs::{Client, types::request::CreateJobRequest};
//! use ultrasinger_client_sdk::jobs::types::{JobSource, QualityPreset};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::default();
//!
//! let upload = client.upload("song.mp3", std::fs::read("song.mp3")?).await?;
//!
//! let job = client
//!     .create_job(
//!         &CreateJobRequest::builder()
//!             .source(JobSource::Upload)
//!             .upload_filename(upload.filename)
//!             .language("en")
//!             .quality(QualityPreset::Balanced)
//!             .build(),
//!     )
//!     .await?;
//!
//! println!("created {}", job.job_id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod types;

pub use client::Client;
pub use types::{JobSource, JobStatus, ProcessingStep, QualityPreset};
