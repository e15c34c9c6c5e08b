//! Request types for the UltraSinger job API.
//!
//! This module contains builder-pattern structs for each API endpoint.
//! All request types use the [`bon`](https://docs.rs/bon) crate for the builder pattern.

#![allow(
    clippy::module_name_repetitions,
    reason = "Request suffix is intentional for clarity"
)]

use bon::Builder;
use serde::Serialize;
use serde_with::skip_serializing_none;

use super::{JobSource, QualityPreset};

/// Request body for the `/api/jobs/create` endpoint.
///
/// # Required Parameters
///
/// - `source`: Where the input audio comes from.
/// - `language`: Language code for transcription (`it`, `en`, or `pl`).
///
/// # Optional Parameters
///
/// - `youtube_url`: Required by the server when `source` is
///   [`JobSource::Youtube`].
/// - `upload_filename`: Required by the server when `source` is
///   [`JobSource::Upload`]; the filename returned by a prior upload.
/// - `quality`: Quality preset (server default: balanced).
/// - `manual_lyrics`: Lyrics to use instead of transcription.
///
/// # Example
///
/// ```
/// use ultrasinger_client_sdk::jobs::types::{JobSource, QualityPreset};
/// use ultrasinger_client_sdk::jobs::types::request::CreateJobRequest;
///
/// let request = CreateJobRequest::builder()
///     .source(JobSource::Upload)
///     .upload_filename("song.mp3")
///     .language("en")
///     .quality(QualityPreset::Accurate)
///     .build();
/// ```
#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Serialize)]
#[non_exhaustive]
pub struct CreateJobRequest {
    /// Where the input audio comes from (required).
    pub source: JobSource,
    /// YouTube URL; required when `source` is youtube.
    #[builder(into)]
    pub youtube_url: Option<String>,
    /// Uploaded filename; required when `source` is upload.
    #[builder(into)]
    pub upload_filename: Option<String>,
    /// Transcription language code: `it`, `en`, or `pl` (required).
    #[builder(into)]
    pub language: String,
    /// Quality preset (server default: balanced).
    pub quality: Option<QualityPreset>,
    /// Lyrics to use instead of speech recognition.
    #[builder(into)]
    pub manual_lyrics: Option<String>,
}

/// Query parameters for the `/api/jobs` listing endpoint.
///
/// # Example
///
/// ```
/// use ultrasinger_client_sdk::jobs::types::request::ListJobsRequest;
///
/// let request = ListJobsRequest::builder().limit(10).offset(20).build();
/// ```
#[skip_serializing_none]
#[derive(Debug, Clone, Builder, Serialize)]
#[non_exhaustive]
pub struct ListJobsRequest {
    /// Maximum number of jobs to return (server default: 50).
    pub limit: Option<i32>,
    /// Pagination offset (server default: 0).
    pub offset: Option<i32>,
}

impl Default for ListJobsRequest {
    fn default() -> Self {
        Self::builder().build()
    }
}
