use serde::{Deserialize, Serialize};

use crate::Result;
use crate::types::{JobStatus, ProcessingStep};
use crate::ws::WsError;
use crate::ws::traits::MessageParser;

/// A progress update pushed by the server for one job.
///
/// The server sends one JSON object per WebSocket text frame.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Identifier of the job this update belongs to
    pub job_id: String,
    /// Current job status
    pub status: JobStatus,
    /// Current processing step, absent while queued or after completion
    #[serde(default)]
    pub step: Option<ProcessingStep>,
    /// Overall completion percentage, 0 to 100
    pub percentage: i32,
    /// Human-readable description of the current activity
    #[serde(default)]
    pub message: String,
    /// Seconds elapsed since processing started
    #[serde(default)]
    pub elapsed_seconds: f64,
}

/// Parser for per-job progress frames.
///
/// Each text frame carries exactly one [`ProgressUpdate`] object. Frames that
/// fail to decode surface as [`WsError::MessageParse`], which the connection
/// layer logs and skips without disturbing the stream.
#[derive(Debug, Clone)]
pub struct ProgressParser;

impl MessageParser<ProgressUpdate> for ProgressParser {
    fn parse(&self, bytes: &[u8]) -> Result<Vec<ProgressUpdate>> {
        let update: ProgressUpdate =
            serde_json::from_slice(bytes).map_err(WsError::MessageParse)?;
        Ok(vec![update])
    }
}
