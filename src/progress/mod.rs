//! Live job progress over WebSocket.
//!
//! The server pushes one [`ProgressUpdate`] JSON object per text frame on
//! `/api/ws/{job_id}`. [`Client`] wraps the reconnecting connection layer
//! and exposes the job's progress as observable fields plus a broadcast
//! update stream.
//!
//! # Example
//!
//! ```rust, no_run
//! use futures::StreamExt;
//! use ultrasinger_client_sdk::progress::Client;
//! use ultrasinger_client_sdk::ws::config::Config;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = Client::new("ws://localhost:8000", "job-42", Config::default())?;
//!
//! let mut updates = Box::pin(client.updates());
//! while let Some(update) = updates.next().await {
//!     let update = update?;
//!     println!("{}% {}", update.percentage, update.message);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod types;

pub use client::Client;
pub use types::{ProgressParser, ProgressUpdate};
