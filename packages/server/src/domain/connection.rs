//! Connection: one client's duplex transport with a serialized write path.
//!
//! Every `deliver` call is pushed onto a private FIFO queue that is drained
//! by a single write worker, so at most one write is ever in flight on the
//! transport. The read loop runs as its own task and reports inbound text
//! and closure through caller-supplied callbacks; a connection never knows
//! which room it belongs to.

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::sync::{mpsc, watch};

use super::{
    SessionId, Timestamp, User, UserDirectory,
    error::{AuthError, ConnectionError, TransportError},
    factory::SessionIdFactory,
    lock,
    transport::{MessageSink, MessageSource, Transport},
};

/// How long queued writes may keep the transport open after `close()`.
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Called once per inbound text message, in receipt order.
pub type MessageHandler = Arc<dyn Fn(String, &SessionId) + Send + Sync>;

/// Called exactly once when the connection closes.
pub type CloseHandler = Box<dyn FnOnce() + Send>;

enum Outbound {
    Text(String),
    Close,
}

/// Transport halves parked between `open` and `start`.
struct PendingIo {
    sink: Box<dyn MessageSink>,
    source: Box<dyn MessageSource>,
    outbound_rx: mpsc::UnboundedReceiver<Outbound>,
}

pub struct Connection {
    session_id: SessionId,
    connected_at: Timestamp,
    user: Mutex<Option<User>>,
    outbound: mpsc::UnboundedSender<Outbound>,
    pending: Mutex<Option<PendingIo>>,
    closed: AtomicBool,
    closed_tx: watch::Sender<bool>,
    on_message: Mutex<Option<MessageHandler>>,
    on_close: Mutex<Option<CloseHandler>>,
}

impl Connection {
    /// Wrap an accepted transport. No I/O happens until [`Connection::start`].
    pub fn open<T: Transport>(transport: T) -> Self {
        let (sink, source) = transport.split();
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        let (closed_tx, _) = watch::channel(false);

        Self {
            session_id: SessionIdFactory::generate(),
            connected_at: Timestamp::now(),
            user: Mutex::new(None),
            outbound,
            pending: Mutex::new(Some(PendingIo {
                sink: Box::new(sink),
                source: Box::new(source),
                outbound_rx,
            })),
            closed: AtomicBool::new(false),
            closed_tx,
            on_message: Mutex::new(None),
            on_close: Mutex::new(None),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn connected_at(&self) -> Timestamp {
        self.connected_at
    }

    pub fn display_name(&self) -> Option<String> {
        lock(&self.user)
            .as_ref()
            .map(|user| user.display_name.as_str().to_string())
    }

    pub fn is_open(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }

    /// Register the inbound-message callback, replacing any previous one.
    pub fn set_message_handler<F>(&self, handler: F)
    where
        F: Fn(String, &SessionId) + Send + Sync + 'static,
    {
        *lock(&self.on_message) = Some(Arc::new(handler));
    }

    /// Register the close callback.
    ///
    /// If the connection is already closed the callback runs immediately, so
    /// a late registration still observes the closure exactly once.
    pub fn set_close_handler<F>(&self, handler: F)
    where
        F: FnOnce() + Send + 'static,
    {
        *lock(&self.on_close) = Some(Box::new(handler));
        if !self.is_open() {
            self.fire_close_handler();
        }
    }

    /// Attach an identity issued by `directory`.
    ///
    /// A second call on an authenticated connection is rejected rather than
    /// swapping the identity under a live session.
    pub fn authenticate(
        &self,
        directory: &dyn UserDirectory,
        display_name: &str,
    ) -> Result<User, AuthError> {
        if display_name.trim().is_empty() {
            return Err(AuthError::EmptyDisplayName);
        }

        let mut user = lock(&self.user);
        if let Some(existing) = user.as_ref() {
            return Err(AuthError::AlreadyAuthenticated(
                existing.display_name.as_str().to_string(),
            ));
        }

        let issued = directory.register(display_name)?;
        tracing::debug!(
            "Session '{}' authenticated as '{}' ({})",
            self.session_id,
            issued.display_name,
            issued.id
        );
        *user = Some(issued.clone());
        Ok(issued)
    }

    /// Spawn the read loop and the write worker on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// `AlreadyStarted` on a second call, `Closed` if the connection was
    /// closed before it ever started.
    pub fn start(self: &Arc<Self>) -> Result<(), ConnectionError> {
        let Some(io) = lock(&self.pending).take() else {
            if self.is_open() {
                return Err(ConnectionError::AlreadyStarted(self.session_id.to_string()));
            }
            return Err(ConnectionError::Closed(self.session_id.to_string()));
        };

        tokio::spawn(write_loop(Arc::clone(self), io.sink, io.outbound_rx));
        tokio::spawn(read_loop(Arc::clone(self), io.source));
        tracing::debug!("Session '{}' started", self.session_id);
        Ok(())
    }

    /// Queue `message` for this connection.
    ///
    /// Never blocks and never fails: a closed connection drops the message.
    pub fn deliver(&self, message: impl Into<String>) {
        if !self.is_open() {
            tracing::trace!("Dropping delivery to closed session '{}'", self.session_id);
            return;
        }
        if self.outbound.send(Outbound::Text(message.into())).is_err() {
            tracing::trace!("Write worker for '{}' is gone", self.session_id);
        }
    }

    /// Close the connection. Idempotent and safe from any task, including
    /// this connection's own callbacks.
    ///
    /// Messages queued before the call are still written ahead of the
    /// transport close.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        tracing::debug!("Closing session '{}'", self.session_id);

        let _ = self.outbound.send(Outbound::Close);
        self.closed_tx.send_replace(true);

        // Never started: nothing will drain the queue, close the sink here.
        let pending = lock(&self.pending).take();
        if let Some(io) = pending {
            drop(io.source);
            let mut sink = io.sink;
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(async move {
                        let _ = tokio::time::timeout(CLOSE_GRACE, sink.close()).await;
                    });
                }
                Err(_) => tracing::debug!(
                    "No runtime to close transport of '{}'; dropping it",
                    self.session_id
                ),
            }
        }

        lock(&self.on_message).take();
        self.fire_close_handler();
    }

    /// Resolves once the connection has closed.
    pub async fn closed(&self) {
        wait_until_closed(&mut self.closed_tx.subscribe()).await;
    }

    fn fire_close_handler(&self) {
        let handler = lock(&self.on_close).take();
        if let Some(handler) = handler {
            handler();
        }
    }

    fn dispatch(&self, text: String) {
        let handler = lock(&self.on_message).clone();
        match handler {
            Some(handler) => handler(text, &self.session_id),
            None => tracing::debug!(
                "No message handler on '{}'; dropping inbound text",
                self.session_id
            ),
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("user", &self.display_name())
            .field("open", &self.is_open())
            .finish()
    }
}

async fn wait_until_closed(closed_rx: &mut watch::Receiver<bool>) {
    // The sender lives as long as the connection, so this only returns once closed.
    let _ = closed_rx.wait_for(|closed| *closed).await;
}

async fn read_loop(connection: Arc<Connection>, mut source: Box<dyn MessageSource>) {
    let mut closed_rx = connection.closed_tx.subscribe();

    loop {
        let next = tokio::select! {
            _ = wait_until_closed(&mut closed_rx) => break,
            next = source.next_text() => next,
        };

        match next {
            Ok(Some(text)) => connection.dispatch(text),
            Ok(None) => {
                tracing::info!("Session '{}' closed by peer", connection.session_id);
                break;
            }
            Err(e) => {
                tracing::warn!("Read error on session '{}': {}", connection.session_id, e);
                break;
            }
        }
    }

    connection.close();
}

async fn write_loop(
    connection: Arc<Connection>,
    mut sink: Box<dyn MessageSink>,
    mut outbound_rx: mpsc::UnboundedReceiver<Outbound>,
) {
    let mut closed_rx = connection.closed_tx.subscribe();

    while let Some(item) = outbound_rx.recv().await {
        let text = match item {
            Outbound::Text(text) => text,
            Outbound::Close => break,
        };

        // Writes are unbounded while open; after close() each queued write
        // gets CLOSE_GRACE before the transport is torn down anyway.
        let sent = tokio::select! {
            sent = sink.send_text(text) => Some(sent),
            _ = close_grace_elapsed(&mut closed_rx) => None,
        };
        match sent {
            Some(Ok(())) => {}
            Some(Err(e)) => {
                if e != TransportError::Closed {
                    tracing::warn!(
                        "Write error on session '{}': {}",
                        connection.session_id,
                        e
                    );
                }
                connection.close();
                break;
            }
            None => {
                tracing::warn!(
                    "Write on closed session '{}' stalled, abandoning queue",
                    connection.session_id
                );
                break;
            }
        }
    }

    match tokio::time::timeout(CLOSE_GRACE, sink.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::debug!(
            "Transport close on session '{}' failed: {}",
            connection.session_id,
            e
        ),
        Err(_) => tracing::debug!(
            "Transport close on session '{}' timed out",
            connection.session_id
        ),
    }
}

async fn close_grace_elapsed(closed_rx: &mut watch::Receiver<bool>) {
    wait_until_closed(closed_rx).await;
    tokio::time::sleep(CLOSE_GRACE).await;
}
