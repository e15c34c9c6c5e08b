//! Domain types shared across the REST and WebSocket surfaces.

use serde::{Deserialize, Serialize};

/// Date and time types for timestamps in API responses.
pub use chrono::{DateTime, Utc};

/// Source type for a processing job.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobSource {
    /// Download the input audio from a YouTube URL
    Youtube,
    /// Use a previously uploaded audio file
    Upload,
}

/// Job processing status.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Waiting for a processing slot
    Queued,
    /// Currently being processed
    Processing,
    /// Finished successfully; the result file can be downloaded
    Completed,
    /// Processing failed
    Failed,
    /// Cancelled by the user
    Cancelled,
}

impl JobStatus {
    /// Whether the job has reached a terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

/// Current processing step within a running job.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStep {
    /// Fetching the input audio
    Downloading,
    /// Separating vocals from the instrumental
    Separating,
    /// Transcribing lyrics from the vocal track
    Transcribing,
    /// Detecting pitch for each syllable
    Pitching,
    /// Writing the UltraStar output file
    Generating,
}

/// Quality presets trading processing time for accuracy.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    /// Tiny whisper, tiny crepe
    Fast,
    /// Small whisper, medium crepe
    Balanced,
    /// Medium whisper, full crepe
    Accurate,
}
