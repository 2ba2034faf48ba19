use std::{fmt, net::SocketAddr, sync::Arc};

use serde::{Deserialize, Serialize};
use tarpc::context;
use tracing::info;

/// Payload exchanged by the [`Echo`] service.
///
/// Both fields are opaque: any string, including the empty string, is valid
/// and is passed through unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// Caller-assigned identifier.
    pub id: String,
    /// Text payload.
    pub msg: String,
}

impl Message {
    pub fn new(id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            msg: msg.into(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id:{:?} msg:{:?}", self.id, self.msg)
    }
}

/// Tarpc service that returns its input unchanged.
#[tarpc::service]
pub trait Echo {
    /// Echoes `message` back to the caller.
    async fn echo(message: Message) -> Message;
}

/// Sink for the "message received" event raised by [`EchoService`].
pub trait ReceiptLog: Send + Sync + 'static {
    fn received(&self, peer: Option<SocketAddr>, message: &Message);
}

/// [`ReceiptLog`] that emits one `tracing` event per received message.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLog;

impl ReceiptLog for TracingLog {
    fn received(&self, peer: Option<SocketAddr>, message: &Message) {
        match peer {
            Some(peer) => info!(%peer, id = %message.id, msg = %message.msg, "received"),
            None => info!(id = %message.id, msg = %message.msg, "received"),
        }
    }
}

/// Server-side implementation of the [`Echo`] service.
///
/// One instance is built per connection so the receipt log can name the peer.
#[derive(Clone)]
pub struct EchoService {
    log: Arc<dyn ReceiptLog>,
    peer: Option<SocketAddr>,
}

impl EchoService {
    pub fn new(log: Arc<dyn ReceiptLog>) -> Self {
        Self { log, peer: None }
    }

    pub fn with_peer(mut self, peer: SocketAddr) -> Self {
        self.peer = Some(peer);
        self
    }
}

impl fmt::Debug for EchoService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EchoService")
            .field("peer", &self.peer)
            .finish_non_exhaustive()
    }
}

impl Echo for EchoService {
    async fn echo(self, _: context::Context, message: Message) -> Message {
        self.log.received(self.peer, &message);
        message
    }
}
