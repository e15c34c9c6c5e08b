#![expect(
    clippy::module_name_repetitions,
    reason = "Connection types expose their domain in the name for clarity"
)]

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff as _;
use futures::StreamExt as _;
use serde::de::DeserializeOwned;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, watch};
use tokio::time::sleep;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;

use super::config::Config;
use super::error::WsError;
use super::traits::MessageParser;
use crate::error::{Error, Kind};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Broadcast channel capacity for incoming messages.
const BROADCAST_CAPACITY: usize = 1024;

/// Connection state tracking.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected
    Disconnected,
    /// Attempting to connect
    Connecting,
    /// Successfully connected
    Connected {
        /// When the connection was established
        since: Instant,
    },
    /// Waiting to reconnect after an unexpected loss
    Reconnecting {
        /// Current reconnection attempt number
        attempt: u32,
    },
    /// Gave up after exhausting the retry budget; requires a manual
    /// [`ConnectionManager::connect`] to resume
    Failed {
        /// Number of attempts that were made
        attempts: u32,
    },
}

impl ConnectionState {
    /// Check if the connection is currently active.
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected { .. })
    }
}

/// Last error observed on the connection.
///
/// Cleared on every successful open. Errors never propagate as faults to the
/// consumer; they are absorbed into this observable field.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// The transport reported a fault or could not be reached
    Transport(String),
    /// Automatic reconnection gave up after exhausting the retry budget
    RetriesExhausted {
        /// Number of attempts that were made
        attempts: u32,
    },
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(reason) => write!(f, "Connection error: {reason}"),
            Self::RetriesExhausted { attempts } => {
                write!(f, "Failed to connect after {attempts} attempts")
            }
        }
    }
}

/// Observable state shared between the manager handle and its connection task.
///
/// Every write carries the generation of the task performing it; writes from a
/// superseded generation are dropped so a stale transport's late events cannot
/// overwrite state owned by a newer connection. The mutex serializes the
/// generation check against the send.
#[derive(Debug)]
struct Shared<M> {
    write_lock: Mutex<()>,
    generation: AtomicU64,
    state_tx: watch::Sender<ConnectionState>,
    message_tx: watch::Sender<Option<M>>,
    error_tx: watch::Sender<Option<ConnectionError>>,
    /// Replaced on shutdown so existing subscribers observe channel close.
    broadcast_tx: Mutex<broadcast::Sender<M>>,
}

impl<M: Clone> Shared<M> {
    fn new(
        state_tx: watch::Sender<ConnectionState>,
        message_tx: watch::Sender<Option<M>>,
        error_tx: watch::Sender<Option<ConnectionError>>,
        broadcast_tx: broadcast::Sender<M>,
    ) -> Self {
        Self {
            write_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
            state_tx,
            message_tx,
            error_tx,
            broadcast_tx: Mutex::new(broadcast_tx),
        }
    }

    /// Start a new connection generation, invalidating all prior writers.
    fn begin_generation(&self) -> u64 {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Invalidate all writers and force the state to `Disconnected`.
    ///
    /// Replaces the broadcast sender, dropping the old one so every
    /// subscribed update stream observes channel close and ends.
    fn shutdown(&self) {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::SeqCst);
        _ = self.state_tx.send(ConnectionState::Disconnected);
        *self
            .broadcast_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = broadcast::channel(BROADCAST_CAPACITY).0;
    }

    /// Returns false when the writer's generation has been superseded.
    fn set_state(&self, generation: u64, state: ConnectionState) -> bool {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        _ = self.state_tx.send(state);
        true
    }

    fn set_error(&self, generation: u64, error: Option<ConnectionError>) -> bool {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        _ = self.error_tx.send(error);
        true
    }

    fn record_message(&self, generation: u64, message: M) -> bool {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        _ = self.message_tx.send(Some(message.clone()));
        _ = self
            .broadcast_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .send(message);
        true
    }

    fn subscribe(&self) -> broadcast::Receiver<M> {
        self.broadcast_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribe()
    }
}

/// Manages WebSocket connection lifecycle and reconnection.
///
/// This generic connection manager handles all WebSocket connection concerns:
/// - Establishing and re-establishing connections with exponential backoff,
///   bounded by the configured retry budget
/// - Exposing connection state, the latest decoded message, and the last
///   error as observable fields
/// - Broadcasting messages to multiple subscribers
///
/// Malformed inbound payloads are tolerated: they are logged and skipped
/// without touching the observable fields or the connection.
///
/// # Type Parameters
///
/// - `M`: Message type that implements [`DeserializeOwned`] among other "helper" types
/// - `P`: Parser type that implements [`MessageParser<M>`]
///
/// # Example
///
/// ```ignore
/// let manager = ConnectionManager::new(
///     "ws://localhost:8000/api/ws/job-42".to_owned(),
///     Config::default(),
///     ProgressParser,
/// )?;
/// manager.connect();
///
/// // Subscribe to messages
/// let mut rx = manager.subscribe();
/// while let Ok(msg) = rx.recv().await {
///     println!("Received: {:?}", msg);
/// }
/// ```
#[derive(Debug)]
pub struct ConnectionManager<M, P>
where
    M: DeserializeOwned + Debug + Clone + Send + Sync + 'static,
    P: MessageParser<M>,
{
    /// Full endpoint address, validated at construction
    endpoint: String,
    config: Config,
    parser: Arc<P>,
    shared: Arc<Shared<M>>,
    /// Watch channel receiver for state changes
    state_rx: watch::Receiver<ConnectionState>,
    /// Watch channel receiver holding the most recent decoded message
    message_rx: watch::Receiver<Option<M>>,
    /// Watch channel receiver holding the last error seen
    error_rx: watch::Receiver<Option<ConnectionError>>,
    /// Token cancelling the live connection task, if any
    cancel: Arc<Mutex<Option<CancellationToken>>>,
}

impl<M, P> Clone for ConnectionManager<M, P>
where
    M: DeserializeOwned + Debug + Clone + Send + Sync + 'static,
    P: MessageParser<M>,
{
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            config: self.config.clone(),
            parser: Arc::clone(&self.parser),
            shared: Arc::clone(&self.shared),
            state_rx: self.state_rx.clone(),
            message_rx: self.message_rx.clone(),
            error_rx: self.error_rx.clone(),
            cancel: Arc::clone(&self.cancel),
        }
    }
}

impl<M, P> ConnectionManager<M, P>
where
    M: DeserializeOwned + Debug + Clone + Send + Sync + 'static,
    P: MessageParser<M>,
{
    /// Create a new connection manager without connecting.
    ///
    /// The `parser` is used to deserialize incoming WebSocket messages.
    /// Call [`connect`](Self::connect) to start the connection task.
    ///
    /// # Errors
    ///
    /// Returns a [`Kind::Validation`](crate::error::Kind) error when the
    /// endpoint is not a valid URL. This is the only failure that is never
    /// retried; everything after construction is absorbed into observable
    /// state.
    pub fn new(endpoint: String, config: Config, parser: P) -> crate::Result<Self> {
        url::Url::parse(&endpoint)?;

        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (message_tx, message_rx) = watch::channel(None);
        let (error_tx, error_rx) = watch::channel(None);
        let (broadcast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);

        Ok(Self {
            endpoint,
            config,
            parser: Arc::new(parser),
            shared: Arc::new(Shared::new(state_tx, message_tx, error_tx, broadcast_tx)),
            state_rx,
            message_rx,
            error_rx,
            cancel: Arc::new(Mutex::new(None)),
        })
    }

    /// Start the connection task.
    ///
    /// No-op while a connection task is already live, so the manager never
    /// holds two simultaneous connection attempts. After the retry budget is
    /// exhausted or a [`disconnect`](Self::disconnect), calling this starts a
    /// fresh cycle with a reset attempt counter.
    pub fn connect(&self) {
        let mut guard = self.cancel.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(token) = guard.as_ref()
            && !token.is_cancelled()
            && !matches!(
                self.state(),
                ConnectionState::Disconnected | ConnectionState::Failed { .. }
            )
        {
            return;
        }

        if let Some(previous) = guard.take() {
            previous.cancel();
        }

        let token = CancellationToken::new();
        *guard = Some(token.clone());
        let generation = self.shared.begin_generation();
        drop(guard);

        let endpoint = self.endpoint.clone();
        let config = self.config.clone();
        let parser = Arc::clone(&self.parser);
        let shared = Arc::clone(&self.shared);

        tokio::spawn(async move {
            Self::connection_loop(endpoint, config, parser, shared, generation, token).await;
        });
    }

    /// Tear the connection down.
    ///
    /// Cancels any pending reconnect timer, closes the transport, ends every
    /// subscribed message stream, and leaves the state `Disconnected`.
    /// Idempotent: safe to call with nothing live.
    /// A deliberate disconnect never schedules a reconnect, and events from
    /// the old transport arriving after this call cannot mutate state.
    pub fn disconnect(&self) {
        let mut guard = self.cancel.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = guard.take() {
            token.cancel();
        }
        drop(guard);

        self.shared.shutdown();
    }

    /// Main connection loop with automatic reconnection.
    async fn connection_loop(
        endpoint: String,
        config: Config,
        parser: Arc<P>,
        shared: Arc<Shared<M>>,
        generation: u64,
        token: CancellationToken,
    ) {
        let mut attempt = 0_u32;
        let mut backoff: ExponentialBackoff = config.reconnect.clone().into();

        loop {
            if !shared.set_state(generation, ConnectionState::Connecting) {
                return;
            }

            let dialed = tokio::select! {
                () = token.cancelled() => return,
                dialed = connect_async(&endpoint) => dialed,
            };

            match dialed {
                Ok((ws_stream, _)) => {
                    attempt = 0;
                    backoff.reset();
                    shared.set_state(
                        generation,
                        ConnectionState::Connected {
                            since: Instant::now(),
                        },
                    );
                    shared.set_error(generation, None);

                    if let Err(e) =
                        Self::handle_connection(ws_stream, &shared, generation, &parser, &token)
                            .await
                    {
                        #[cfg(feature = "tracing")]
                        tracing::debug!("Connection lost: {e:?}");
                        #[cfg(not(feature = "tracing"))]
                        let _ = &e;
                    }

                    if token.is_cancelled() {
                        return;
                    }
                }
                Err(e) => {
                    // A failed dial behaves like an unexpected close: the
                    // error is recorded and the backoff cycle runs.
                    #[cfg(feature = "tracing")]
                    tracing::warn!("Unable to connect: {e:?}");
                    shared.set_error(
                        generation,
                        Some(ConnectionError::Transport(e.to_string())),
                    );
                }
            }

            if !shared.set_state(generation, ConnectionState::Disconnected) {
                return;
            }

            if let Some(max) = config.reconnect.max_attempts
                && attempt >= max
            {
                shared.set_error(
                    generation,
                    Some(ConnectionError::RetriesExhausted { attempts: attempt }),
                );
                shared.set_state(generation, ConnectionState::Failed { attempts: attempt });
                return;
            }

            attempt = attempt.saturating_add(1);
            shared.set_state(generation, ConnectionState::Reconnecting { attempt });

            if let Some(delay) = backoff.next_backoff() {
                #[cfg(feature = "tracing")]
                tracing::debug!(attempt, ?delay, "Reconnecting after delay");

                tokio::select! {
                    () = token.cancelled() => return,
                    () = sleep(delay) => {}
                }
            }
        }
    }

    /// Handle an active WebSocket connection until it closes or is cancelled.
    async fn handle_connection(
        mut ws_stream: WsStream,
        shared: &Arc<Shared<M>>,
        generation: u64,
        parser: &Arc<P>,
        token: &CancellationToken,
    ) -> crate::Result<()> {
        loop {
            let msg = tokio::select! {
                () = token.cancelled() => return Ok(()),
                msg = ws_stream.next() => msg,
            };

            match msg {
                Some(Ok(Message::Text(text))) => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(%text, "Received WebSocket text message");

                    match parser.parse(text.as_bytes()) {
                        Ok(messages) => {
                            for message in messages {
                                shared.record_message(generation, message);
                            }
                        }
                        Err(e) => {
                            // Malformed payloads are tolerated and skipped;
                            // the previous message stays observable and the
                            // connection stays up.
                            #[cfg(feature = "tracing")]
                            tracing::warn!(%text, error = %e, "Failed to parse WebSocket message");
                            #[cfg(not(feature = "tracing"))]
                            let _ = (&text, &e);
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    return Err(Error::with_source(Kind::WebSocket, WsError::ConnectionClosed));
                }
                Some(Err(e)) => {
                    shared.set_error(
                        generation,
                        Some(ConnectionError::Transport(e.to_string())),
                    );
                    return Err(Error::with_source(Kind::WebSocket, WsError::Connection(e)));
                }
                Some(Ok(_)) => {
                    // Ignore binary and control frames.
                }
            }
        }
    }

    /// Get the current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Whether the underlying transport currently reports itself open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    /// Most recently decoded message, if any.
    ///
    /// A decode failure does not clear this; it keeps the previous value.
    #[must_use]
    pub fn last_message(&self) -> Option<M> {
        self.message_rx.borrow().clone()
    }

    /// Last error seen on the connection.
    ///
    /// Cleared by the next successful open.
    #[must_use]
    pub fn last_error(&self) -> Option<ConnectionError> {
        self.error_rx.borrow().clone()
    }

    /// Subscribe to incoming messages.
    ///
    /// Each call returns a new independent receiver. Multiple subscribers can
    /// receive messages concurrently without blocking each other. A
    /// [`disconnect`](Self::disconnect) closes the channel for every
    /// receiver taken before it.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<M> {
        self.shared.subscribe()
    }

    /// Subscribe to connection state changes.
    ///
    /// Returns a receiver that notifies when the connection state changes.
    /// This is useful for reacting to reconnections and terminal failure.
    #[must_use]
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }
}
