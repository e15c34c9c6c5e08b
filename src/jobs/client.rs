//! Client for the UltraSinger job API.
//!
//! This module provides an HTTP client for interacting with the UltraSinger
//! web backend, which offers endpoints for uploading audio, creating and
//! querying processing jobs, and downloading generated UltraStar files.
//!
//! # Example
//!
//! ```no_run
//! use ultrasinger_client_sdk::jobs::{Client, types::request::ListJobsRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::default();
//!
//! let listing = client.jobs(&ListJobsRequest::builder().limit(10).build()).await?;
//! for job in listing.jobs {
//!     println!("{}: {:?}", job.job_id, job.status);
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use futures::stream;
use reqwest::{
    Body, Client as ReqwestClient, Method,
    header::{HeaderMap, HeaderValue},
    multipart::{Form, Part},
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::types::request::{CreateJobRequest, ListJobsRequest};
use super::types::response::{
    AckResponse, HealthResponse, JobListResponse, JobResponse, UploadResponse,
};
use crate::error::Error;
use crate::{Result, ToQueryParams as _};

/// Fixed request timeout; generous because uploads can be large.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Upload bodies are streamed in chunks of this size so transfer progress
/// can be observed as the bytes go out.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// HTTP client for the UltraSinger job API.
///
/// All operations are simple request/response calls with a fixed 5-minute
/// timeout and no retry. Job-state updates arriving over these endpoints are
/// out of band from the WebSocket progress stream.
///
/// # API Base URL
///
/// The default endpoint is `http://localhost:8000`.
///
/// # Example
///
/// ```no_run
/// use ultrasinger_client_sdk::jobs::Client;
///
/// // Create client with default endpoint
/// let client = Client::default();
///
/// // Or with a custom endpoint
/// let client = Client::new("https://sing.example.com").unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    host: Url,
    client: ReqwestClient,
}

impl Default for Client {
    fn default() -> Self {
        Client::new(crate::DEFAULT_API_ENDPOINT)
            .expect("Client with default endpoint should succeed")
    }
}

impl Client {
    /// Creates a new job API client with a custom host URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be created.
    pub fn new(host: &str) -> Result<Client> {
        let mut headers = HeaderMap::new();

        headers.insert("User-Agent", HeaderValue::from_static("ultrasinger-client-sdk"));
        headers.insert("Accept", HeaderValue::from_static("*/*"));
        headers.insert("Connection", HeaderValue::from_static("keep-alive"));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = ReqwestClient::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            host: Url::parse(host)?,
            client,
        })
    }

    /// Returns the base URL of the API.
    #[must_use]
    pub fn host(&self) -> &Url {
        &self.host
    }

    async fn get<Req: Serialize, Res: DeserializeOwned>(&self, path: &str, req: &Req) -> Result<Res> {
        let query = req.query_params();
        let request = self
            .client
            .request(Method::GET, format!("{}{path}{query}", self.host))
            .build()?;
        crate::request(&self.client, request, None).await
    }

    /// Uploads an audio file for processing.
    ///
    /// The returned [`UploadResponse::filename`] is what a subsequent
    /// [`create_job`](Self::create_job) with
    /// [`JobSource::Upload`](super::types::JobSource::Upload) must reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the file type or size is rejected, or the request fails.
    pub async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<UploadResponse> {
        let part = Part::bytes(bytes).file_name(filename.to_owned());
        let form = Form::new().part("file", part);

        let request = self
            .client
            .request(Method::POST, format!("{}api/upload", self.host))
            .multipart(form)
            .build()?;
        crate::request(&self.client, request, None).await
    }

    /// Uploads an audio file, observing transfer progress.
    ///
    /// `on_progress` is invoked with `(bytes_sent, bytes_total)` per chunk
    /// as the multipart body streams out, finishing at `(total, total)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file type or size is rejected, or the request fails.
    pub async fn upload_with_progress<F>(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        mut on_progress: F,
    ) -> Result<UploadResponse>
    where
        F: FnMut(u64, u64) + Send + 'static,
    {
        let total = bytes.len() as u64;
        let mut sent = 0_u64;

        let chunks: Vec<Vec<u8>> = bytes.chunks(UPLOAD_CHUNK_SIZE).map(<[u8]>::to_vec).collect();
        // The iterator is polled lazily, one chunk per body poll, so the
        // callback tracks the transfer rather than firing up front.
        let body = Body::wrap_stream(stream::iter(chunks.into_iter().map(move |chunk| {
            sent = sent.saturating_add(chunk.len() as u64);
            on_progress(sent, total);
            Ok::<Vec<u8>, std::convert::Infallible>(chunk)
        })));

        let part = Part::stream_with_length(body, total).file_name(filename.to_owned());
        let form = Form::new().part("file", part);

        let request = self
            .client
            .request(Method::POST, format!("{}api/upload", self.host))
            .multipart(form)
            .build()?;
        crate::request(&self.client, request, None).await
    }

    /// Creates a new processing job.
    ///
    /// The job starts processing immediately; follow it over the WebSocket
    /// progress stream or by polling [`job`](Self::job).
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails server-side (bad YouTube URL,
    /// missing upload) or the request fails.
    pub async fn create_job(&self, request: &CreateJobRequest) -> Result<JobResponse> {
        let request = self
            .client
            .request(Method::POST, format!("{}api/jobs/create", self.host))
            .json(request)
            .build()?;
        crate::request(&self.client, request, None).await
    }

    /// Retrieves a single job by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the job does not exist or the request fails.
    pub async fn job(&self, job_id: &str) -> Result<JobResponse> {
        Self::validate_job_id(job_id)?;
        self.get(&format!("api/jobs/{job_id}"), &()).await
    }

    /// Lists jobs, newest first, with pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn jobs(&self, request: &ListJobsRequest) -> Result<JobListResponse> {
        self.get("api/jobs", request).await
    }

    /// Cancels a queued or processing job.
    ///
    /// # Errors
    ///
    /// Returns an error if the job does not exist, already finished, or the
    /// request fails.
    pub async fn cancel_job(&self, job_id: &str) -> Result<AckResponse> {
        Self::validate_job_id(job_id)?;
        let request = self
            .client
            .request(Method::POST, format!("{}api/jobs/{job_id}/cancel", self.host))
            .build()?;
        crate::request(&self.client, request, None).await
    }

    /// Cancels (if needed) and deletes a job together with its artifacts.
    ///
    /// # Errors
    ///
    /// Returns an error if the job does not exist or the request fails.
    pub async fn delete_job(&self, job_id: &str) -> Result<AckResponse> {
        Self::validate_job_id(job_id)?;
        let request = self
            .client
            .request(Method::DELETE, format!("{}api/jobs/{job_id}", self.host))
            .build()?;
        crate::request(&self.client, request, None).await
    }

    /// Builds the download URL for a completed job's UltraStar file.
    ///
    /// The URL is returned without being fetched; hand it to a browser or
    /// download it with any HTTP client.
    #[must_use]
    pub fn download_url(&self, job_id: &str) -> String {
        format!("{}api/jobs/{job_id}/download", self.host)
    }

    /// Performs a health check on the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or returns a non-200
    /// status code.
    pub async fn health(&self) -> Result<HealthResponse> {
        self.get("health", &()).await
    }

    fn validate_job_id(job_id: &str) -> Result<()> {
        if job_id.trim().is_empty() {
            return Err(Error::validation("job id must not be blank"));
        }
        Ok(())
    }
}
