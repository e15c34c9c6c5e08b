//! Core traits for generic WebSocket infrastructure.

use serde::de::DeserializeOwned;

/// Message parser trait for converting raw bytes to messages.
///
/// This abstracts the parsing strategy so the connection manager stays
/// generic over the wire payload. The progress channel uses a plain
/// single-object JSON parse; other channels may filter or batch.
///
/// # Example
///
/// ```ignore
/// pub struct ProgressParser;
///
/// impl MessageParser<ProgressUpdate> for ProgressParser {
///     fn parse(&self, bytes: &[u8]) -> crate::Result<Vec<ProgressUpdate>> {
///         let msg: ProgressUpdate = serde_json::from_slice(bytes)?;
///         Ok(vec![msg])
///     }
/// }
/// ```
pub trait MessageParser<M: DeserializeOwned>: Send + Sync + 'static {
    /// Parse incoming bytes into messages.
    ///
    /// May return an empty vec if messages are filtered out.
    /// Handles both single objects and arrays of messages.
    fn parse(&self, bytes: &[u8]) -> crate::Result<Vec<M>>;
}
