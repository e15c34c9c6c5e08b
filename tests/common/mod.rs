#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    reason = "Do not need additional syntax for setting up tests"
)]
#![allow(
    unused,
    reason = "Each integration test binary uses a different subset of these helpers"
)]

use serde_json::{Value, json};

pub const JOB_ID: &str = "0b7e4a52-77b8-4d3a-b7cc-9f1f29c3a1d0";
pub const OTHER_JOB_ID: &str = "7d1c9e04-2f5b-4a80-9c2e-55aa0c3d81f2";

/// A job record as the backend serializes it.
#[must_use]
pub fn job_record(job_id: &str, status: &str) -> Value {
    json!({
        "job_id": job_id,
        "source": "youtube",
        "status": status,
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
    })
}

/// A progress frame as the backend pushes it over the WebSocket.
#[must_use]
pub fn progress_frame(job_id: &str, step: &str, percentage: i32) -> Value {
    json!({
        "job_id": job_id,
        "status": "processing",
        "step": step,
        "percentage": percentage,
        "message": format!("{step} at {percentage}%"),
        "elapsed_seconds": 12.5
    })
}
