//! Response types for the UltraSinger job API.

#![allow(
    clippy::module_name_repetitions,
    reason = "Response suffix is intentional for clarity"
)]

use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{JobSource, JobStatus, ProcessingStep, QualityPreset};

/// Progress information for a running job.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize, Builder)]
pub struct JobProgress {
    /// Current processing step
    pub step: ProcessingStep,
    /// Completion percentage, 0-100
    pub percentage: i32,
    /// Human-readable progress message
    pub message: String,
    /// Seconds elapsed since processing started
    pub elapsed_seconds: f64,
}

/// A job record as returned by the API.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize, Builder)]
pub struct JobResponse {
    /// Unique job identifier
    pub job_id: String,
    /// Where the input audio came from
    pub source: JobSource,
    /// Current status
    pub status: JobStatus,
    /// Transcription language code
    pub language: String,
    /// Quality preset used for processing
    pub quality: QualityPreset,
    /// Song title, once known
    #[serde(default)]
    pub title: Option<String>,
    /// When the job was created
    pub created_at: DateTime<Utc>,
    /// When the job was last updated
    pub updated_at: DateTime<Utc>,
    /// Progress of the current step, while processing
    #[serde(default)]
    pub progress: Option<JobProgress>,
    /// Failure reason, when status is failed
    #[serde(default)]
    pub error_message: Option<String>,
    /// Server-side path of the generated UltraStar file, once completed
    #[serde(default)]
    pub result_file_path: Option<String>,
}

/// Paged job listing.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize, Builder)]
pub struct JobListResponse {
    /// Jobs in this page, newest first
    pub jobs: Vec<JobResponse>,
    /// Total number of jobs before pagination
    pub total: i64,
}

/// Response after a successful file upload.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize, Builder)]
pub struct UploadResponse {
    /// Sanitized filename to reference in a create-job request
    pub filename: String,
    /// Size of the stored file in bytes
    pub size: u64,
    /// Server-side upload identifier
    pub upload_id: String,
}

/// Acknowledgement for cancel and delete operations.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize, Builder)]
pub struct AckResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// Backend health summary.
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize, Serialize, Builder)]
pub struct HealthResponse {
    /// Health indicator, `"healthy"` when operational
    pub status: String,
    /// Jobs currently processing
    pub jobs_active: i64,
    /// Jobs waiting for a processing slot
    pub jobs_queued: i64,
    /// Total jobs known to the backend
    pub jobs_total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_response_deserializes_full_record() {
        let json = serde_json::json!({
            "job_id": "0b7e4a52-77b8-4d3a-b7cc-9f1f29c3a1d0",
            "source": "youtube",
            "status": "processing",
            "language": "en",
            "quality": "balanced",
            "title": "Never Gonna Give You Up",
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:01:30Z",
            "progress": {
                "step": "transcribing",
                "percentage": 45,
                "message": "Transcribing lyrics...",
                "elapsed_seconds": 90.5
            },
            "error_message": null,
            "result_file_path": null
        });

        let job: JobResponse = serde_json::from_value(json).expect("deserialize");
        assert_eq!(job.status, JobStatus::Processing);
        let progress = job.progress.expect("progress present");
        assert_eq!(progress.step, ProcessingStep::Transcribing);
        assert_eq!(progress.percentage, 45);
    }

    #[test]
    fn job_response_tolerates_missing_optionals() {
        let json = serde_json::json!({
            "job_id": "abc",
            "source": "upload",
            "status": "queued",
            "language": "pl",
            "quality": "fast",
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:00:00Z"
        });

        let job: JobResponse = serde_json::from_value(json).expect("deserialize");
        assert!(job.progress.is_none(), "no progress while queued");
        assert!(job.title.is_none(), "title unknown until processed");
    }
}
