//! TCP server for the echo service.
//!
//! Every accepted connection is served by its own tarpc channel on a spawned
//! task, and every request on that channel runs on a task of its own.

use std::{io, net::SocketAddr, sync::Arc};

use futures::StreamExt;
use tarpc::server::{BaseChannel, Channel};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::{
    bincode_transport,
    echo::{Echo, EchoService, ReceiptLog},
    error::{Error, Result},
};

/// Echo server bound to a TCP endpoint.
pub struct EchoServer {
    listener: TcpListener,
    log: Arc<dyn ReceiptLog>,
}

impl EchoServer {
    /// Binds the listening socket.
    ///
    /// Fails with [`Error::Bind`] if the address cannot be acquired, e.g. when
    /// another process is already listening on it.
    pub async fn bind(addr: &str, log: Arc<dyn ReceiptLog>) -> Result<Self> {
        let listener = TcpListener::bind(addr).await.map_err(|source| Error::Bind {
            addr: addr.to_string(),
            source,
        })?;
        Ok(Self { listener, log })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the surrounding task is dropped.
    pub async fn run(self) {
        if let Ok(addr) = self.local_addr() {
            info!(%addr, "echo server listening");
        }

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    debug!(%peer, "new connection");
                    let service = EchoService::new(Arc::clone(&self.log)).with_peer(peer);
                    tokio::spawn(serve_connection(stream, service));
                }
                Err(err) => {
                    warn!(error = %err, "failed to accept connection");
                }
            }
        }
    }
}

async fn serve_connection(stream: TcpStream, service: EchoService) {
    BaseChannel::with_defaults(bincode_transport(stream))
        .execute(service.serve())
        .for_each(|fut| async move {
            tokio::spawn(fut);
        })
        .await;
}
