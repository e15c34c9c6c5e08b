use async_stream::try_stream;
use futures::Stream;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;

use super::types::{ProgressParser, ProgressUpdate};
use crate::Result;
use crate::ws::config::{Config, WS_PATH_PREFIX};
use crate::ws::connection::{ConnectionError, ConnectionManager, ConnectionState};
use crate::ws::error::WsError;

/// Client streaming live progress for one processing job.
///
/// Creating a client immediately starts connecting to the job's progress
/// socket; unexpected losses are retried with exponential backoff until the
/// retry budget runs out. Connection faults never surface as errors from
/// this API: they land in [`last_error`](Self::last_error) while
/// [`is_connected`](Self::is_connected) flips accordingly.
///
/// A client built with a blank job id is inert: it never connects and all
/// lifecycle calls are no-ops.
///
/// # Examples
///
/// ```rust, no_run
/// use futures::StreamExt;
/// use ultrasinger_client_sdk::progress::Client;
/// use ultrasinger_client_sdk::ws::config::Config;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = Client::new("ws://localhost:8000", "job-42", Config::default())?;
///
///     let stream = client.updates();
///     let mut stream = Box::pin(stream);
///
///     while let Some(update) = stream.next().await {
///         println!("Progress: {:?}", update?);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    job_id: String,
    connection: Option<ConnectionManager<ProgressUpdate, ProgressParser>>,
}

impl Client {
    /// Create a client for a job's progress socket and start connecting.
    ///
    /// The socket address is `{endpoint}/api/ws/{job_id}`; a trailing slash
    /// on `endpoint` is tolerated. A blank `job_id` yields an inert client
    /// that never attempts a connection.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Validation`](crate::error::Kind) error when the
    /// resulting address is not a valid URL. This is the only failure
    /// reported directly; connection faults after construction are absorbed
    /// into observable state.
    pub fn new(endpoint: &str, job_id: &str, config: Config) -> Result<Self> {
        if job_id.trim().is_empty() {
            return Ok(Self {
                job_id: job_id.to_owned(),
                connection: None,
            });
        }

        let base = endpoint.trim_end_matches('/');
        let address = format!("{base}{WS_PATH_PREFIX}/{job_id}");
        let connection = ConnectionManager::new(address, config, ProgressParser)?;
        connection.connect();

        Ok(Self {
            job_id: job_id.to_owned(),
            connection: Some(connection),
        })
    }

    /// Identifier of the job this client observes.
    #[must_use]
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Whether the progress socket is currently open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connection
            .as_ref()
            .is_some_and(ConnectionManager::is_connected)
    }

    /// Current connection state. Inert clients report `Disconnected`.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.connection
            .as_ref()
            .map_or(ConnectionState::Disconnected, ConnectionManager::state)
    }

    /// Most recently received progress update, if any.
    ///
    /// A malformed frame does not clear this; the previous update stays
    /// observable.
    #[must_use]
    pub fn last_update(&self) -> Option<ProgressUpdate> {
        self.connection.as_ref().and_then(ConnectionManager::last_message)
    }

    /// Last connection error seen, cleared on the next successful open.
    #[must_use]
    pub fn last_error(&self) -> Option<ConnectionError> {
        self.connection.as_ref().and_then(ConnectionManager::last_error)
    }

    /// Start connecting, or restart after a disconnect or a failed cycle.
    ///
    /// No-op while a connection attempt is already live, and always a no-op
    /// on an inert client.
    pub fn connect(&self) {
        if let Some(connection) = &self.connection {
            connection.connect();
        }
    }

    /// Tear the connection down without scheduling a reconnect.
    ///
    /// Idempotent, and a no-op on an inert client.
    pub fn disconnect(&self) {
        if let Some(connection) = &self.connection {
            connection.disconnect();
        }
    }

    /// Subscribe to connection state changes.
    ///
    /// Inert clients return a receiver that stays `Disconnected` forever.
    #[must_use]
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.connection.as_ref().map_or_else(
            || watch::channel(ConnectionState::Disconnected).1,
            ConnectionManager::state_receiver,
        )
    }

    /// Stream of progress updates for this job.
    ///
    /// Each call returns an independent stream; multiple subscribers receive
    /// updates concurrently. A deliberate [`disconnect`](Self::disconnect)
    /// closes the channel: pending updates drain and then the stream ends.
    /// Reconnection cycles do not end it. A slow consumer that falls behind
    /// ends its stream with a [`WsError::Lagged`] error; call this again for
    /// a fresh stream. Inert clients return a stream that yields nothing.
    pub fn updates(&self) -> impl Stream<Item = Result<ProgressUpdate>> + use<> {
        let mut rx = self.connection.as_ref().map(ConnectionManager::subscribe);

        try_stream! {
            let Some(rx) = rx.as_mut() else {
                return;
            };

            loop {
                match rx.recv().await {
                    Ok(update) => yield update,
                    Err(RecvError::Lagged(n)) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!("Progress stream lagged, missed {n} updates");
                        Err(WsError::Lagged { count: n })?;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_job_id_yields_inert_client() {
        let client =
            Client::new("ws://localhost:8000", "", Config::default()).expect("inert client");

        assert!(!client.is_connected(), "inert client is never connected");
        assert_eq!(client.state(), ConnectionState::Disconnected);
        assert_eq!(client.last_update(), None);
        assert!(client.last_error().is_none(), "inert client has no errors");

        // Lifecycle calls must be harmless no-ops.
        client.connect();
        client.disconnect();
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn whitespace_job_id_is_treated_as_blank() {
        let client =
            Client::new("ws://localhost:8000", "   ", Config::default()).expect("inert client");
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn invalid_endpoint_fails_at_construction() {
        let result = Client::new("not a url", "job-42", Config::default());
        let error = result.expect_err("invalid URL must fail construction");
        assert_eq!(error.kind(), crate::error::Kind::Validation);
    }

    #[tokio::test]
    async fn trailing_slash_is_tolerated() {
        // Construction succeeds; the dial itself happens in the background.
        let client = Client::new("ws://localhost:8000/", "job-42", Config::default())
            .expect("valid endpoint");
        assert_eq!(client.job_id(), "job-42");
        client.disconnect();
    }
}
